//! Symbolic and numerical integration of expressions.
//!
//! Antiderivatives are found with a small set of rules: linearity, the power
//! rule, linear substitution in the elementary functions and integration by
//! parts of polynomials times `exp`, `sin`, `cos` and `log`. No integration
//! constant is added.
use ahash::HashMap;
use tracing::debug;

use crate::{
    atom::Atom,
    error::Error,
    numerical_integration::{AdaptiveSimpson, Estimate},
    state::{State, Symbol},
};

/// The maximal nesting of rule applications.
const MAX_DEPTH: usize = 24;

impl Atom {
    /// Find an antiderivative with respect to `x`.
    ///
    /// ```
    /// use symcalc::{atom::Atom, symbol};
    ///
    /// let x = symbol!("x");
    /// let f = Atom::parse("x*exp(x)").unwrap();
    /// assert_eq!(f.integrate(x).unwrap(), Atom::parse("x*exp(x) - exp(x)").unwrap());
    /// ```
    pub fn integrate(&self, x: Symbol) -> Result<Atom, Error> {
        let r = integrate(self, x, 0)?;
        debug!("Integrated {} to {}", self, r);
        Ok(r)
    }

    /// Integrate over `[lower, upper]` using the antiderivative.
    pub fn integrate_definite(&self, x: Symbol, lower: &Atom, upper: &Atom) -> Result<Atom, Error> {
        let f = self.integrate(x)?;
        let x = Atom::var(x);
        Ok((f.replace_all(&x, upper) - f.replace_all(&x, lower)).simplify())
    }

    /// Integrate numerically over `[lower, upper]`, with the other symbols
    /// set to `values`.
    pub fn integrate_numeric(
        &self,
        x: Symbol,
        lower: f64,
        upper: f64,
        values: &HashMap<Symbol, f64>,
        method: &AdaptiveSimpson,
    ) -> Result<Estimate, Error> {
        let mut values = values.clone();

        // report unbound symbols before sampling
        values.insert(x, 0.5 * (lower + upper));
        self.evaluate(&values)?;

        method.integrate(
            |t| {
                let mut values = values.clone();
                values.insert(x, t);
                self.evaluate(&values).unwrap_or(f64::NAN)
            },
            lower,
            upper,
        )
    }
}

fn no_antiderivative(f: &Atom) -> Error {
    Error::NoAntiderivative(f.to_string())
}

fn integrate(f: &Atom, x: Symbol, depth: usize) -> Result<Atom, Error> {
    if depth > MAX_DEPTH {
        return Err(no_antiderivative(f));
    }

    let xa = Atom::var(x);
    if !f.contains_symbol(x) {
        return Ok(f * &xa);
    }

    match f {
        Atom::Num(_) => unreachable!(),
        Atom::Var(_) => Ok(xa.npow(2) / 2),
        Atom::Add(terms) => {
            let mut out = Vec::with_capacity(terms.len());
            for t in terms {
                out.push(integrate(t, x, depth + 1)?);
            }
            Ok(Atom::add_all(out))
        }
        Atom::Mul(factors) => {
            let (constant, dependent): (Vec<Atom>, Vec<Atom>) =
                factors.iter().cloned().partition(|a| !a.contains_symbol(x));
            let c = Atom::mul_all(constant);

            if dependent.len() == 1 {
                return Ok(c * integrate(&dependent[0], x, depth + 1)?);
            }

            if let Some(r) = by_parts(&dependent, x, depth)? {
                return Ok(c * r);
            }

            let g = Atom::mul_all(dependent);
            let expanded = g.expand();
            if expanded != g {
                return Ok(c * integrate(&expanded, x, depth + 1)?);
            }

            Err(no_antiderivative(f))
        }
        Atom::Pow(base, exp) => {
            if !exp.contains_symbol(x) {
                if let Some(a) = linear_coefficient(base, x) {
                    // (a*x+b)^n, where n = -1 may also be a float
                    let n1 = &**exp + 1;
                    if n1.is_zero() {
                        return Ok(base.log() / a);
                    }
                    return Ok(base.pow(&n1) / (a * n1));
                }

                let expanded = f.expand();
                if expanded != *f {
                    return integrate(&expanded, x, depth + 1);
                }

                return Err(no_antiderivative(f));
            }

            if !base.contains_symbol(x) {
                // c^(a*x+b)
                if let Some(a) = linear_coefficient(exp, x) {
                    return Ok(f / (a * base.log()));
                }
            }

            Err(no_antiderivative(f))
        }
        Atom::Fun(s, args) if args.len() == 1 && s.is_builtin() => {
            let u = &args[0];
            let Some(a) = linear_coefficient(u, x) else {
                return Err(no_antiderivative(f));
            };

            let r = match *s {
                State::EXP => f.clone(),
                State::SIN => -u.cos(),
                State::COS => u.sin(),
                State::TAN => -u.cos().log(),
                State::LOG => u * u.log() - u,
                _ => return Err(no_antiderivative(f)),
            };
            Ok(r / a)
        }
        Atom::Fun(..) => Err(no_antiderivative(f)),
    }
}

/// Get `a` if `u = a*x + b` with `a` independent of `x`.
fn linear_coefficient(u: &Atom, x: Symbol) -> Option<Atom> {
    let a = u.derivative(x);
    if a.is_zero() || a.contains_symbol(x) {
        None
    } else {
        Some(a)
    }
}

/// Returns `true` iff `a` is a polynomial in `x`.
fn is_polynomial(a: &Atom, x: Symbol) -> bool {
    if !a.contains_symbol(x) {
        return true;
    }

    match a {
        Atom::Var(_) => true,
        Atom::Add(args) | Atom::Mul(args) => args.iter().all(|a| is_polynomial(a, x)),
        Atom::Pow(b, e) => {
            is_polynomial(b, x)
                && matches!(e.as_num(), Some(n) if n.is_integer() && !n.is_negative())
        }
        _ => false,
    }
}

/// Integrate `p*t` by parts, where `p` is a polynomial in `x` and `t` is
/// `exp`, `sin`, `cos` or `log` of a linear argument.
///
/// For `exp`, `sin` and `cos`: `∫ p t = p T - ∫ p' T` with `T = ∫ t`.
/// For `log`: `∫ p t = P t - ∫ P t'` with `P = ∫ p`.
fn by_parts(factors: &[Atom], x: Symbol, depth: usize) -> Result<Option<Atom>, Error> {
    let transcendental = factors.iter().position(|f| match f {
        Atom::Fun(s, args) if args.len() == 1 => {
            [State::EXP, State::SIN, State::COS, State::LOG].contains(s)
                && linear_coefficient(&args[0], x).is_some()
        }
        _ => false,
    });

    let Some(i) = transcendental else {
        return Ok(None);
    };

    let t = &factors[i];
    let mut rest = factors.to_vec();
    rest.remove(i);
    let p = Atom::mul_all(rest);

    if !is_polynomial(&p, x) {
        return Ok(None);
    }

    let r = if let Atom::Fun(State::LOG, _) = t {
        let big_p = integrate(&p, x, depth + 1)?;
        let remainder = (&big_p * t.derivative(x)).expand();
        &big_p * t - integrate(&remainder, x, depth + 1)?
    } else {
        let big_t = integrate(t, x, depth + 1)?;
        let remainder = (p.derivative(x) * &big_t).expand();
        &p * &big_t - integrate(&remainder, x, depth + 1)?
    };

    Ok(Some(r))
}

#[cfg(test)]
mod test {
    use ahash::HashMap;
    use approx::assert_relative_eq;

    use crate::{
        atom::Atom, error::Error, numerical_integration::AdaptiveSimpson, state::Symbol,
    };

    #[test]
    fn elementary() {
        let x = Symbol::new("x");

        let cases = [
            ("x^2", "x^3/3"),
            ("3*x^2 + 2*x + 1", "x^3 + x^2 + x"),
            ("1/x", "log(x)"),
            ("1/(2*x+1)", "log(2*x+1)/2"),
            ("(2*x+1)^3", "(2*x+1)^4/8"),
            ("sqrt(x)", "2*x^(3/2)/3"),
            ("sin(2*x)", "-cos(2*x)/2"),
            ("cos(x)", "sin(x)"),
            ("exp(3*x)", "exp(3*x)/3"),
            ("log(x)", "x*log(x) - x"),
            ("tan(x)", "-log(cos(x))"),
            ("2^x", "2^x/log(2)"),
            ("y", "x*y"),
            ("x^(-1.0)", "log(x)"),
            ("(3*x + 1)^(-1.0)", "log(3*x + 1)/3"),
        ];

        for (f, r) in cases {
            assert_eq!(
                Atom::parse(f).unwrap().integrate(x).unwrap(),
                Atom::parse(r).unwrap(),
                "integral of {}",
                f
            );
        }
    }

    #[test]
    fn by_parts() {
        let x = Symbol::new("x");

        let cases = [
            "x*exp(x)",
            "x^2*sin(x)",
            "x*cos(3*x)",
            "x*log(x)",
            "(x+1)*(x-1)",
        ];

        for f in cases {
            let f = Atom::parse(f).unwrap();
            let r = f.integrate(x).unwrap();
            assert_eq!(
                (r.derivative(x) - &f).simplify(),
                Atom::zero(),
                "integral of {}",
                f
            );
        }
    }

    #[test]
    fn definite() {
        let x = Symbol::new("x");

        let r = Atom::parse("x^2")
            .unwrap()
            .integrate_definite(x, &Atom::zero(), &Atom::one())
            .unwrap();
        assert_eq!(r, Atom::num((1, 3)));

        let r = Atom::parse("sin(x)")
            .unwrap()
            .integrate_definite(x, &Atom::zero(), &Atom::parse("pi").unwrap())
            .unwrap();
        assert_eq!(r, Atom::num(2));
    }

    #[test]
    fn numeric() {
        let (x, a) = (Symbol::new("x"), Symbol::new("a"));
        let f = Atom::parse("exp(-a*x^2)").unwrap();

        let mut values = HashMap::default();
        values.insert(a, 1.0);
        let r = f
            .integrate_numeric(x, -10., 10., &values, &AdaptiveSimpson::default())
            .unwrap();
        assert_relative_eq!(r.value, std::f64::consts::PI.sqrt(), max_relative = 1e-9);

        let unbound = HashMap::default();
        assert!(matches!(
            f.integrate_numeric(x, 0., 1., &unbound, &AdaptiveSimpson::default()),
            Err(Error::UnboundSymbol(_))
        ));
    }

    #[test]
    fn unsupported() {
        let x = Symbol::new("x");
        assert!(matches!(
            Atom::parse("exp(x^2)").unwrap().integrate(x),
            Err(Error::NoAntiderivative(_))
        ));
        assert!(Atom::parse("f(x)").unwrap().integrate(x).is_err());
    }
}
