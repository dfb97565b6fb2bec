use std::fmt::Write;

use rug::Integer;
use smallvec::SmallVec;
use smartstring::{LazyCompact, SmartString};

use crate::{
    atom::Atom,
    error::Error,
    state::{State, Symbol},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Add => f.write_char('+'),
            Operator::Sub | Operator::Neg => f.write_char('-'),
            Operator::Mul => f.write_char('*'),
            Operator::Div => f.write_char('/'),
            Operator::Pow => f.write_char('^'),
        }
    }
}

impl Operator {
    #[inline]
    pub fn get_precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 7,
            Operator::Mul | Operator::Div => 8,
            Operator::Neg => 10,
            Operator::Pow => 11,
        }
    }

    #[inline]
    pub fn right_associative(&self) -> bool {
        matches!(self, Operator::Pow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(SmartString<LazyCompact>),
    Identifier(SmartString<LazyCompact>),
    Op(Operator),
    LeftParenthesis,
    RightParenthesis,
    Comma,
    End,
}

impl Token {
    /// Returns `true` iff the token can start an operand, so that
    /// `2x` and `2(x+1)` are read as products.
    fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Identifier(_) | Token::LeftParenthesis
        )
    }
}

/// Split the input into tokens, tagged with their byte position.
fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, Error> {
    let mut tokens = vec![];
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut num = SmartString::new();
                let mut seen_exponent = false;
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        num.push(c);
                        chars.next();
                    } else if (c == 'e' || c == 'E') && !seen_exponent {
                        // only an exponent when followed by a digit or a signed digit
                        let rest = &input[pos + num.len() + 1..];
                        let mut it = rest.chars();
                        let valid = match it.next() {
                            Some(d) if d.is_ascii_digit() => true,
                            Some('+') | Some('-') => it.next().is_some_and(|d| d.is_ascii_digit()),
                            _ => false,
                        };
                        if !valid {
                            break;
                        }
                        seen_exponent = true;
                        num.push(c);
                        chars.next();
                        if let Some(&(_, s)) = chars.peek() {
                            if s == '+' || s == '-' {
                                num.push(s);
                                chars.next();
                            }
                        }
                    } else {
                        break;
                    }
                }
                tokens.push((pos, Token::Number(num)));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = SmartString::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((pos, Token::Identifier(name)));
            }
            '*' => {
                chars.next();
                if let Some(&(_, '*')) = chars.peek() {
                    chars.next();
                    tokens.push((pos, Token::Op(Operator::Pow)));
                } else {
                    tokens.push((pos, Token::Op(Operator::Mul)));
                }
            }
            '+' | '-' | '/' | '^' | '(' | ')' | ',' => {
                chars.next();
                let t = match c {
                    '+' => Token::Op(Operator::Add),
                    '-' => Token::Op(Operator::Sub),
                    '/' => Token::Op(Operator::Div),
                    '^' => Token::Op(Operator::Pow),
                    '(' => Token::LeftParenthesis,
                    ')' => Token::RightParenthesis,
                    _ => Token::Comma,
                };
                tokens.push((pos, t));
            }
            c => return Err(Error::parse(pos, format!("unexpected character '{}'", c))),
        }
    }

    tokens.push((input.len(), Token::End));
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].1
    }

    fn position(&self) -> usize {
        self.tokens[self.pos].0
    }

    fn next(&mut self) -> Token {
        let t = self.tokens[self.pos].1.clone();
        if t != Token::End {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<(), Error> {
        if *self.peek() == token {
            self.next();
            Ok(())
        } else {
            Err(Error::parse(self.position(), format!("expected {}", what)))
        }
    }

    /// Parse operators with a precedence of at least `min_precedence`.
    fn parse_expression(&mut self, min_precedence: u8) -> Result<Atom, Error> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let op = match self.peek() {
                Token::Op(op) => *op,
                t if t.starts_operand() => Operator::Mul,
                _ => break,
            };

            let precedence = op.get_precedence();
            if precedence < min_precedence {
                break;
            }

            if let Token::Op(_) = self.peek() {
                self.next();
            }

            let next_min = if op.right_associative() {
                precedence
            } else {
                precedence + 1
            };
            let rhs = self.parse_expression(next_min)?;

            lhs = match op {
                Operator::Add => lhs + rhs,
                Operator::Sub => lhs - rhs,
                Operator::Mul => lhs * rhs,
                Operator::Div => lhs / rhs,
                Operator::Pow => lhs.pow(&rhs),
                Operator::Neg => unreachable!(),
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Atom, Error> {
        let position = self.position();
        match self.next() {
            Token::Op(Operator::Sub) => {
                let operand = self.parse_expression(Operator::Neg.get_precedence())?;
                Ok(-operand)
            }
            Token::Op(Operator::Add) => self.parse_expression(Operator::Neg.get_precedence()),
            Token::Number(n) => parse_number(&n, position),
            Token::Identifier(name) => {
                if *self.peek() == Token::LeftParenthesis {
                    self.next();
                    let args = self.parse_arguments()?;
                    make_function(&name, args, position)
                } else {
                    Ok(Atom::var(State::get_symbol(name.as_str())))
                }
            }
            Token::LeftParenthesis => {
                let inner = self.parse_expression(0)?;
                self.expect(Token::RightParenthesis, "')'")?;
                Ok(inner)
            }
            Token::End => Err(Error::parse(position, "unexpected end of input")),
            t => Err(Error::parse(position, format!("unexpected token {:?}", t))),
        }
    }

    /// Parse a comma-separated argument list after the opening parenthesis.
    fn parse_arguments(&mut self) -> Result<SmallVec<[Atom; 4]>, Error> {
        let mut args = SmallVec::new();
        if *self.peek() == Token::RightParenthesis {
            self.next();
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression(0)?);
            match self.next() {
                Token::Comma => {}
                Token::RightParenthesis => return Ok(args),
                _ => {
                    return Err(Error::parse(
                        self.tokens[self.pos.saturating_sub(1)].0,
                        "expected ',' or ')'",
                    ))
                }
            }
        }
    }
}

fn parse_number(n: &str, position: usize) -> Result<Atom, Error> {
    if n.contains(['.', 'e', 'E']) {
        let f = n
            .parse::<f64>()
            .map_err(|e| Error::parse(position, format!("invalid number '{}': {}", n, e)))?;
        if !f.is_finite() {
            return Err(Error::parse(
                position,
                format!("number '{}' is out of range", n),
            ));
        }
        Ok(Atom::num(f))
    } else {
        n.parse::<Integer>()
            .map(Atom::num)
            .map_err(|e| Error::parse(position, format!("invalid number '{}': {}", n, e)))
    }
}

fn make_function(name: &str, args: SmallVec<[Atom; 4]>, position: usize) -> Result<Atom, Error> {
    if name == "sqrt" {
        let args_len = args.len();
        return match args.into_iter().next() {
            Some(a) if args_len == 1 => Ok(a.sqrt()),
            _ => Err(Error::parse(position, "sqrt takes one argument")),
        };
    }

    let symbol: Symbol = State::get_symbol(name);
    if symbol.is_builtin() && symbol != State::DERIVATIVE && args.len() != 1 {
        return Err(Error::parse(
            position,
            format!("{} takes one argument", name),
        ));
    }

    Ok(Atom::fun(symbol, args.into_vec()))
}

impl Atom {
    /// Parse an expression. Integers are read as exact rationals and numbers
    /// with a decimal point or exponent as floating point. Both `^` and `**`
    /// denote exponentiation and juxtaposition denotes multiplication.
    ///
    /// ```
    /// use symcalc::atom::Atom;
    ///
    /// let a = Atom::parse("2x^2 + 3*x - 1").unwrap();
    /// assert_eq!(a.to_string(), "2*x^2 + 3*x - 1");
    /// ```
    pub fn parse(input: &str) -> Result<Atom, Error> {
        let mut parser = Parser {
            tokens: tokenize(input)?,
            pos: 0,
        };

        let atom = parser.parse_expression(0)?;
        match parser.peek() {
            Token::End => Ok(atom),
            t => Err(Error::parse(
                parser.position(),
                format!("unexpected token {:?}", t),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{atom::Atom, coefficient::Coefficient, error::Error, state::Symbol};

    #[test]
    fn numbers() {
        assert_eq!(Atom::parse("3").unwrap(), Atom::num(3));
        assert_eq!(Atom::parse("5.0").unwrap(), Atom::Num(Coefficient::from(5.0)));
        assert_eq!(Atom::parse("1e3").unwrap(), Atom::num(1000.0));
        assert_eq!(Atom::parse("3/4").unwrap(), Atom::num((3, 4)));
        assert_eq!(
            Atom::parse("123456789012345678901234567890").unwrap().to_string(),
            "123456789012345678901234567890"
        );
    }

    #[test]
    fn precedence() {
        let x = Atom::var(Symbol::new("x"));
        let y = Atom::var(Symbol::new("y"));

        assert_eq!(Atom::parse("-x^2").unwrap(), -x.npow(2));
        assert_eq!(Atom::parse("x^-1").unwrap(), x.npow(-1));
        assert_eq!(Atom::parse("2^3^2").unwrap(), Atom::num(512));
        assert_eq!(Atom::parse("x**2").unwrap(), x.npow(2));
        assert_eq!(Atom::parse("x - y - x").unwrap(), -&y);
        assert_eq!(Atom::parse("x/y/x").unwrap(), y.npow(-1));
        assert_eq!(Atom::parse("2x y").unwrap(), &x * &y * 2);
        assert_eq!(Atom::parse("2(x+1)").unwrap(), &x * 2 + 2);
    }

    #[test]
    fn functions() {
        let x = Atom::var(Symbol::new("x"));

        assert_eq!(Atom::parse("sin(x)^2").unwrap(), x.sin().npow(2));
        assert_eq!(Atom::parse("sqrt(x)").unwrap(), x.sqrt());
        assert_eq!(Atom::parse("e^x").unwrap(), x.exp());

        let f = Atom::parse("f(x, 2*x)").unwrap();
        match f {
            Atom::Fun(s, args) => {
                assert_eq!(s, Symbol::new("f"));
                assert_eq!(args, vec![x.clone(), &x * 2]);
            }
            _ => panic!("expected a function"),
        }
    }

    #[test]
    fn errors() {
        assert!(matches!(Atom::parse("x +"), Err(Error::Parse { .. })));
        assert!(matches!(
            Atom::parse("(x"),
            Err(Error::Parse { position: 2, .. })
        ));
        assert!(matches!(
            Atom::parse("x $ y"),
            Err(Error::Parse { position: 2, .. })
        ));
        assert!(Atom::parse("sin(x, y)").is_err());
        assert!(Atom::parse("").is_err());
        assert!(matches!(
            Atom::parse("2*1e400"),
            Err(Error::Parse { position: 2, .. })
        ));
    }
}
