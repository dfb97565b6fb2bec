use std::fmt;

use smallvec::SmallVec;

use crate::{
    atom::Atom,
    coefficient::Coefficient,
    error::Error,
    state::{State, Symbol},
};

impl Atom {
    /// Take a derivative of the expression with respect to `x`.
    ///
    /// The derivative of a user-defined function `f(a_1, ..., a_k)` is written
    /// with the chain rule in terms of `der(n_1, ..., n_k, f(a_1, ..., a_k))`,
    /// where `n_i` counts the derivatives taken in the `i`-th argument.
    pub fn derivative(&self, x: Symbol) -> Atom {
        match self {
            Atom::Num(_) => Atom::zero(),
            Atom::Var(s) => {
                if *s == x {
                    Atom::one()
                } else {
                    Atom::zero()
                }
            }
            Atom::Add(terms) => Atom::add_all(terms.iter().map(|t| t.derivative(x)).collect()),
            Atom::Mul(factors) => {
                let mut terms = Vec::with_capacity(factors.len());
                for (i, f) in factors.iter().enumerate() {
                    let df = f.derivative(x);
                    if df.is_zero() {
                        continue;
                    }

                    let mut product = Vec::with_capacity(factors.len());
                    product.extend(factors[..i].iter().cloned());
                    product.push(df);
                    product.extend(factors[i + 1..].iter().cloned());
                    terms.push(Atom::mul_all(product));
                }
                Atom::add_all(terms)
            }
            Atom::Pow(base, exp) => {
                let base_der = base.derivative(x);
                let exp_der = exp.derivative(x);

                if exp_der.is_zero() {
                    if base_der.is_zero() {
                        return Atom::zero();
                    }

                    // e*b^(e-1)*b'
                    let new_exp = &**exp - 1;
                    return Atom::mul_all(vec![(**exp).clone(), base.pow(&new_exp), base_der]);
                }

                // b^e*(e'*log(b) + e*b'/b)
                let exp_contrib = &exp_der * base.log();
                let base_contrib = if base_der.is_zero() {
                    Atom::zero()
                } else {
                    Atom::mul_all(vec![(**exp).clone(), base_der, base.npow(-1)])
                };
                self * (exp_contrib + base_contrib)
            }
            Atom::Fun(f, args) => {
                if *f == State::DERIVATIVE {
                    return derivative_of_der(args, x);
                }

                if args.len() == 1 && f.is_builtin() {
                    let arg = &args[0];
                    let arg_der = arg.derivative(x);
                    if arg_der.is_zero() {
                        return Atom::zero();
                    }

                    let fn_der = match *f {
                        State::EXP => Some(self.clone()),
                        State::LOG => Some(arg.npow(-1)),
                        State::SIN => Some(arg.cos()),
                        State::COS => Some(-arg.sin()),
                        State::TAN => Some(arg.tan().npow(2) + 1),
                        State::ABS => Some(arg / self),
                        _ => None,
                    };

                    if let Some(fn_der) = fn_der {
                        return fn_der * arg_der;
                    }
                }

                let orders = vec![Atom::zero(); args.len()];
                chain_rule(self, &orders, args, x)
            }
        }
    }

    /// Take the `n`-th derivative with respect to `x`.
    pub fn derivative_n(&self, x: Symbol, n: u32) -> Atom {
        let mut out = self.clone();
        for _ in 0..n {
            if out.is_zero() {
                break;
            }
            out = out.derivative(x);
        }
        out
    }

    /// Take the derivatives in order, `n_i` times with respect to each `x_i`.
    pub fn derivative_multi(&self, variables: &[(Symbol, u32)]) -> Atom {
        variables
            .iter()
            .fold(self.clone(), |acc, (x, n)| acc.derivative_n(*x, *n))
    }
}

/// Differentiate `der(n_1, ..., n_k, f(a_1, ..., a_k))`.
fn derivative_of_der(args: &[Atom], x: Symbol) -> Atom {
    let Some((Atom::Fun(_, f_args), orders)) = args.split_last() else {
        return Atom::zero();
    };

    if orders.len() != f_args.len() {
        return Atom::zero();
    }

    chain_rule(&args[args.len() - 1], orders, f_args, x)
}

/// Sum over all arguments `a_i` of `der(..., n_i + 1, ..., f) * a_i'`.
fn chain_rule(f: &Atom, orders: &[Atom], f_args: &[Atom], x: Symbol) -> Atom {
    let mut terms = vec![];
    for (i, arg) in f_args.iter().enumerate() {
        let arg_der = arg.derivative(x);
        if arg_der.is_zero() {
            continue;
        }

        let mut der_args = Vec::with_capacity(orders.len() + 1);
        for (j, o) in orders.iter().enumerate() {
            if i == j {
                der_args.push(o + 1);
            } else {
                der_args.push(o.clone());
            }
        }
        der_args.push(f.clone());

        terms.push(Atom::fun(State::DERIVATIVE, der_args) * arg_der);
    }

    Atom::add_all(terms)
}

/// An unevaluated derivative of an expression.
///
/// ```
/// use symcalc::{atom::Atom, derivative::Derivative, symbol};
///
/// let (x, y) = symbol!("x", "y");
/// let g = Atom::parse("3*x^5*y^2 + 5*x").unwrap();
/// let d = Derivative::new(g).wrt(x, 1).wrt(y, 2);
/// assert_eq!(d.to_string(), "Derivative(3*x^5*y^2 + 5*x, x, (y, 2))");
/// assert_eq!(d.doit(), Atom::parse("30*x^4").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Derivative {
    expr: Atom,
    variables: SmallVec<[(Symbol, u32); 4]>,
}

impl Derivative {
    pub fn new(expr: Atom) -> Derivative {
        Derivative {
            expr,
            variables: SmallVec::new(),
        }
    }

    /// Differentiate `n` more times with respect to `x`. Consecutive
    /// derivatives in the same symbol are merged.
    pub fn wrt(mut self, x: Symbol, n: u32) -> Derivative {
        if n == 0 {
            return self;
        }

        match self.variables.last_mut() {
            Some((last, count)) if *last == x => *count += n,
            _ => self.variables.push((x, n)),
        }
        self
    }

    pub fn expr(&self) -> &Atom {
        &self.expr
    }

    pub fn variables(&self) -> &[(Symbol, u32)] {
        &self.variables
    }

    /// The total number of derivatives.
    pub fn order(&self) -> u32 {
        self.variables.iter().map(|(_, n)| n).sum()
    }

    /// Replace `pattern` by `rhs` in the differentiated expression.
    pub fn replace(&self, pattern: &Atom, rhs: &Atom) -> Derivative {
        Derivative {
            expr: self.expr.replace_all(pattern, rhs),
            variables: self.variables.clone(),
        }
    }

    /// Evaluate the derivative.
    pub fn doit(&self) -> Atom {
        self.expr.derivative_multi(&self.variables)
    }

    /// Convert `der(n_1, ..., n_k, f(a_1, ..., a_k))` to an unevaluated
    /// derivative of `f`. This requires every differentiated argument `a_i` to
    /// be a variable.
    pub fn from_atom(atom: &Atom) -> Option<Derivative> {
        let Atom::Fun(State::DERIVATIVE, args) = atom else {
            return None;
        };

        let (f, orders) = args.split_last()?;
        let Atom::Fun(_, f_args) = f else {
            return None;
        };

        if orders.len() != f_args.len() {
            return None;
        }

        let mut d = Derivative::new(f.clone());
        for (o, a) in orders.iter().zip(f_args) {
            let n = o.as_num().and_then(Coefficient::to_i64)?;
            let n = u32::try_from(n).ok()?;
            if n > 0 {
                d = d.wrt(a.as_var()?, n);
            }
        }
        Some(d)
    }
}

impl fmt::Display for Derivative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Derivative({}", self.expr)?;
        for (x, n) in &self.variables {
            if *n == 1 {
                write!(f, ", {}", x)?;
            } else {
                write!(f, ", ({}, {})", x, n)?;
            }
        }
        f.write_str(")")
    }
}

/// An equation `lhs = rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Equation {
    pub lhs: Atom,
    pub rhs: Atom,
}

impl Equation {
    pub fn new(lhs: Atom, rhs: Atom) -> Equation {
        Equation { lhs, rhs }
    }

    /// Parse an equation of the form `lhs = rhs`.
    pub fn parse(input: &str) -> Result<Equation, Error> {
        let Some((lhs, rhs)) = input.split_once('=') else {
            return Err(Error::parse(input.len(), "expected '='"));
        };

        let offset = lhs.len() + 1;
        let lhs = Atom::parse(lhs)?;
        let rhs = Atom::parse(rhs).map_err(|e| match e {
            Error::Parse { position, message } => Error::Parse {
                position: position + offset,
                message,
            },
            e => e,
        })?;
        Ok(Equation { lhs, rhs })
    }

    /// Get `lhs - rhs`, which is zero on the solution set.
    pub fn to_zero_form(&self) -> Atom {
        &self.lhs - &self.rhs
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

/// Compute `d^n y / dx^n` for `y` implicitly defined by `expr = 0`.
///
/// The first derivative is `-F_x/F_y`, each further derivative is the total
/// derivative `D d = ∂d/∂x + ∂d/∂y * y'` of the previous one.
///
/// ```
/// use symcalc::{atom::Atom, derivative::implicit_derivative, symbol};
///
/// let (x, y) = symbol!("x", "y");
/// let circle = Atom::parse("x^2 + y^2 - 1").unwrap();
/// let d = implicit_derivative(&circle, y, x, 1).unwrap();
/// assert_eq!(d, Atom::parse("-x/y").unwrap());
/// ```
pub fn implicit_derivative(expr: &Atom, y: Symbol, x: Symbol, n: u32) -> Result<Atom, Error> {
    if n == 0 {
        return Err(Error::invalid_parameter(
            "n",
            "the order of the derivative must be at least 1",
        ));
    }

    let f_y = expr.derivative(y);
    if f_y.is_zero() {
        return Err(Error::invalid_parameter(
            "expr",
            format!("the expression does not depend on {}", y),
        ));
    }

    let f_x = expr.derivative(x);
    let first = (-f_x / f_y).simplify();

    let mut d = first.clone();
    for _ in 1..n {
        d = (d.derivative(x) + d.derivative(y) * &first).simplify();
    }

    Ok(d)
}
