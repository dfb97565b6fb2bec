use std::f64::consts::{E, PI};

use ahash::HashMap;

use crate::{
    atom::Atom,
    error::Error,
    state::{State, Symbol},
};

impl Atom {
    /// Evaluate the expression in double precision. Every variable except
    /// `pi` and `e` must be assigned a value.
    ///
    /// ```
    /// use ahash::HashMap;
    /// use symcalc::{atom::Atom, symbol};
    ///
    /// let x = symbol!("x");
    /// let a = Atom::parse("x^2 + sin(pi*x)").unwrap();
    /// let mut values = HashMap::default();
    /// values.insert(x, 2.0);
    /// assert!((a.evaluate(&values).unwrap() - 4.0).abs() < 1e-12);
    /// ```
    pub fn evaluate(&self, values: &HashMap<Symbol, f64>) -> Result<f64, Error> {
        match self {
            Atom::Num(n) => Ok(n.to_f64()),
            Atom::Var(s) => match values.get(s) {
                Some(v) => Ok(*v),
                None if *s == State::PI => Ok(PI),
                None if *s == State::E => Ok(E),
                None => Err(Error::UnboundSymbol(s.get_name().into())),
            },
            Atom::Fun(s, args) => {
                if args.len() != 1 || !s.is_builtin() {
                    return Err(Error::UnknownFunction(s.get_name().into()));
                }

                let v = args[0].evaluate(values)?;
                match *s {
                    State::EXP => Ok(v.exp()),
                    State::LOG => Ok(v.ln()),
                    State::SIN => Ok(v.sin()),
                    State::COS => Ok(v.cos()),
                    State::TAN => Ok(v.tan()),
                    State::ABS => Ok(v.abs()),
                    _ => Err(Error::UnknownFunction(s.get_name().into())),
                }
            }
            Atom::Pow(b, e) => {
                let b = b.evaluate(values)?;
                match e.as_num().and_then(|n| n.to_i64()) {
                    Some(n) if i32::try_from(n).is_ok() => Ok(b.powi(n as i32)),
                    _ => Ok(b.powf(e.evaluate(values)?)),
                }
            }
            Atom::Mul(factors) => factors
                .iter()
                .try_fold(1.0, |acc, f| Ok(acc * f.evaluate(values)?)),
            Atom::Add(terms) => terms
                .iter()
                .try_fold(0.0, |acc, t| Ok(acc + t.evaluate(values)?)),
        }
    }
}

#[cfg(test)]
mod test {
    use ahash::HashMap;

    use crate::{atom::Atom, error::Error, state::Symbol};

    #[test]
    fn evaluate() {
        let (x, y) = (Symbol::new("x"), Symbol::new("y"));
        let a = Atom::parse("x^2*y + exp(log(y)) + 3/4 + abs(-x)").unwrap();

        let mut values = HashMap::default();
        values.insert(x, 2.0);
        values.insert(y, 0.5);
        let r = a.evaluate(&values).unwrap();
        assert!((r - (2.0 + 0.5 + 0.75 + 2.0)).abs() < 1e-14);
    }

    #[test]
    fn errors() {
        let values = HashMap::default();
        assert_eq!(
            Atom::parse("x + 1").unwrap().evaluate(&values),
            Err(Error::UnboundSymbol("x".into()))
        );
        assert_eq!(
            Atom::parse("f(1)").unwrap().evaluate(&values),
            Err(Error::UnknownFunction("f".into()))
        );
        assert!((Atom::parse("cos(pi/3)").unwrap().evaluate(&values).unwrap() - 0.5).abs() < 1e-15);
    }
}
