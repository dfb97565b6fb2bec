//! Defines the expression tree [`Atom`] and its constructors.
//!
//! Every constructor and arithmetic operator returns a normalized atom, see
//! [`crate::normalize`]. Atoms are immutable: transformations such as
//! [`Atom::derivative`] or [`Atom::replace_all`] create new atoms.
//!
//! # Examples
//!
//! ```
//! use symcalc::{atom::Atom, symbol};
//!
//! let x = symbol!("x");
//! let expr = Atom::var(x).npow(2) + Atom::var(x) * 3;
//! assert_eq!(expr, Atom::parse("3*x + x^2").unwrap());
//! ```
mod ops;

use std::cmp::Ordering;

use crate::{
    coefficient::Coefficient,
    normalize,
    state::{State, Symbol},
};

/// A mathematical expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    Num(Coefficient),
    Var(Symbol),
    Fun(Symbol, Vec<Atom>),
    Pow(Box<Atom>, Box<Atom>),
    Mul(Vec<Atom>),
    Add(Vec<Atom>),
}

impl Default for Atom {
    fn default() -> Self {
        Atom::zero()
    }
}

impl From<Symbol> for Atom {
    fn from(s: Symbol) -> Self {
        Atom::Var(s)
    }
}

impl From<Coefficient> for Atom {
    fn from(c: Coefficient) -> Self {
        Atom::Num(c)
    }
}

impl From<i64> for Atom {
    fn from(n: i64) -> Self {
        Atom::num(n)
    }
}

impl From<i32> for Atom {
    fn from(n: i32) -> Self {
        Atom::num(n)
    }
}

impl From<f64> for Atom {
    fn from(n: f64) -> Self {
        Atom::num(n)
    }
}

impl Atom {
    /// Create a number.
    pub fn num<T: Into<Coefficient>>(n: T) -> Atom {
        Atom::Num(n.into())
    }

    pub fn zero() -> Atom {
        Atom::Num(Coefficient::zero())
    }

    pub fn one() -> Atom {
        Atom::Num(Coefficient::one())
    }

    /// Create a variable.
    pub fn var(s: Symbol) -> Atom {
        Atom::Var(s)
    }

    /// Create a function call `symbol(args)`.
    pub fn fun(symbol: Symbol, args: Vec<Atom>) -> Atom {
        normalize::fun(symbol, args)
    }

    /// Create the sum of all `terms`.
    pub fn add_all(terms: Vec<Atom>) -> Atom {
        normalize::add(terms)
    }

    /// Create the product of all `factors`.
    pub fn mul_all(factors: Vec<Atom>) -> Atom {
        normalize::mul(factors)
    }

    /// Raise to the power `exp`.
    pub fn pow(&self, exp: &Atom) -> Atom {
        normalize::pow(self.clone(), exp.clone())
    }

    /// Raise to a numerical power.
    pub fn npow<T: Into<Coefficient>>(&self, exp: T) -> Atom {
        normalize::pow(self.clone(), Atom::Num(exp.into()))
    }

    pub fn sqrt(&self) -> Atom {
        self.npow((1, 2))
    }

    pub fn exp(&self) -> Atom {
        Atom::fun(State::EXP, vec![self.clone()])
    }

    pub fn log(&self) -> Atom {
        Atom::fun(State::LOG, vec![self.clone()])
    }

    pub fn sin(&self) -> Atom {
        Atom::fun(State::SIN, vec![self.clone()])
    }

    pub fn cos(&self) -> Atom {
        Atom::fun(State::COS, vec![self.clone()])
    }

    pub fn tan(&self) -> Atom {
        Atom::fun(State::TAN, vec![self.clone()])
    }

    pub fn abs(&self) -> Atom {
        Atom::fun(State::ABS, vec![self.clone()])
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_one())
    }

    /// Get the number if the atom is a number.
    pub fn as_num(&self) -> Option<&Coefficient> {
        match self {
            Atom::Num(n) => Some(n),
            _ => None,
        }
    }

    /// Get the symbol if the atom is a variable.
    pub fn as_var(&self) -> Option<Symbol> {
        match self {
            Atom::Var(s) => Some(*s),
            _ => None,
        }
    }

    /// Split the atom into its numerical coefficient and the remainder.
    /// A pure number yields the remainder `1`.
    pub fn split_coefficient(&self) -> (Coefficient, Atom) {
        match self {
            Atom::Num(n) => (n.clone(), Atom::one()),
            Atom::Mul(factors) => {
                if let Some(Atom::Num(n)) = factors.first() {
                    let rest = &factors[1..];
                    let rest = if rest.len() == 1 {
                        rest[0].clone()
                    } else {
                        Atom::Mul(rest.to_vec())
                    };
                    (n.clone(), rest)
                } else {
                    (Coefficient::one(), self.clone())
                }
            }
            _ => (Coefficient::one(), self.clone()),
        }
    }

    /// Returns `true` iff the symbol `x` occurs anywhere in the expression.
    pub fn contains_symbol(&self, x: Symbol) -> bool {
        match self {
            Atom::Num(_) => false,
            Atom::Var(s) => *s == x,
            Atom::Fun(s, args) => *s == x || args.iter().any(|a| a.contains_symbol(x)),
            Atom::Pow(b, e) => b.contains_symbol(x) || e.contains_symbol(x),
            Atom::Mul(args) | Atom::Add(args) => args.iter().any(|a| a.contains_symbol(x)),
        }
    }

    /// Get all variables that occur in the expression, sorted by id.
    /// Function names are not included.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out = vec![];
        self.collect_symbols(&mut out);
        out.sort();
        out.dedup();
        out
    }

    fn collect_symbols(&self, out: &mut Vec<Symbol>) {
        match self {
            Atom::Num(_) => {}
            Atom::Var(s) => out.push(*s),
            Atom::Fun(_, args) | Atom::Mul(args) | Atom::Add(args) => {
                for a in args {
                    a.collect_symbols(out);
                }
            }
            Atom::Pow(b, e) => {
                b.collect_symbols(out);
                e.collect_symbols(out);
            }
        }
    }

    /// The number of nodes in the expression tree.
    pub fn node_count(&self) -> usize {
        match self {
            Atom::Num(_) | Atom::Var(_) => 1,
            Atom::Fun(_, args) | Atom::Mul(args) | Atom::Add(args) => {
                1 + args.iter().map(|a| a.node_count()).sum::<usize>()
            }
            Atom::Pow(b, e) => 1 + b.node_count() + e.node_count(),
        }
    }

    /// Rebuild the expression bottom-up, so that it is in normalized form.
    pub fn normalize(&self) -> Atom {
        self.map_children(|a| a.normalize())
    }

    /// Apply `f` to every direct child and rebuild the node with the normalizing constructors.
    pub(crate) fn map_children<F: FnMut(&Atom) -> Atom>(&self, mut f: F) -> Atom {
        match self {
            Atom::Num(_) | Atom::Var(_) => self.clone(),
            Atom::Fun(s, args) => Atom::fun(*s, args.iter().map(&mut f).collect()),
            Atom::Pow(b, e) => normalize::pow(f(b), f(e)),
            Atom::Mul(args) => Atom::mul_all(args.iter().map(&mut f).collect()),
            Atom::Add(args) => Atom::add_all(args.iter().map(&mut f).collect()),
        }
    }

    /// Split into base and exponent. The exponent is `None` when it is one.
    pub(crate) fn base_exp(&self) -> (&Atom, Option<&Atom>) {
        match self {
            Atom::Pow(b, e) => (b, Some(e)),
            _ => (self, None),
        }
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The canonical order of atoms. Numbers come first and sums last. Powers
/// are sorted by base before exponent, so that `x < x^2 < x^3 < y`, and
/// products are sorted by their non-numerical factors.
impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Atom::Num(a), Atom::Num(b)) => a.cmp(b),
            (Atom::Num(_), _) => Ordering::Less,
            (_, Atom::Num(_)) => Ordering::Greater,
            (Atom::Add(a), Atom::Add(b)) => a.iter().cmp(b.iter()),
            (Atom::Add(_), _) => Ordering::Greater,
            (_, Atom::Add(_)) => Ordering::Less,
            (Atom::Mul(a), Atom::Mul(b)) => cmp_terms(a, b),
            (Atom::Mul(a), _) => cmp_terms(a, std::slice::from_ref(other)),
            (_, Atom::Mul(b)) => cmp_terms(std::slice::from_ref(self), b),
            _ => cmp_factors(self, other),
        }
    }
}

fn cmp_terms(a: &[Atom], b: &[Atom]) -> Ordering {
    let (ca, fa) = match a.first() {
        Some(Atom::Num(n)) => (Some(n), &a[1..]),
        _ => (None, a),
    };
    let (cb, fb) = match b.first() {
        Some(Atom::Num(n)) => (Some(n), &b[1..]),
        _ => (None, b),
    };

    fa.iter().cmp(fb.iter()).then_with(|| match (ca, cb) {
        (None, None) => Ordering::Equal,
        (Some(ca), None) => ca.cmp(&Coefficient::one()),
        (None, Some(cb)) => Coefficient::one().cmp(cb),
        (Some(ca), Some(cb)) => ca.cmp(cb),
    })
}

fn cmp_factors(a: &Atom, b: &Atom) -> Ordering {
    let (ba, ea) = a.base_exp();
    let (bb, eb) = b.base_exp();

    let base_order = if ea.is_none() && eb.is_none() {
        cmp_atomic(a, b)
    } else {
        ba.cmp(bb)
    };

    base_order.then_with(|| match (ea, eb) {
        (None, None) => Ordering::Equal,
        (Some(ea), None) => ea.cmp(&Atom::one()),
        (None, Some(eb)) => Atom::one().cmp(eb),
        (Some(ea), Some(eb)) => ea.cmp(eb),
    })
}

fn cmp_atomic(a: &Atom, b: &Atom) -> Ordering {
    match (a, b) {
        (Atom::Var(s1), Atom::Var(s2)) => cmp_symbols(*s1, *s2),
        (Atom::Var(_), Atom::Fun(..)) => Ordering::Less,
        (Atom::Fun(..), Atom::Var(_)) => Ordering::Greater,
        (Atom::Fun(s1, a1), Atom::Fun(s2, a2)) => {
            cmp_symbols(*s1, *s2).then_with(|| a1.iter().cmp(a2.iter()))
        }
        _ => unreachable!("Only variables and functions are atomic"),
    }
}

fn cmp_symbols(s1: Symbol, s2: Symbol) -> Ordering {
    if s1 == s2 {
        return Ordering::Equal;
    }

    State::get_name(s1)
        .cmp(&State::get_name(s2))
        .then(s1.cmp(&s2))
}

/// Get a symbol for each name, registering it if needed.
///
/// ```
/// use symcalc::symbol;
///
/// let x = symbol!("x");
/// let (y, z) = symbol!("y", "z");
/// assert_ne!(x, y);
/// assert_ne!(y, z);
/// ```
#[macro_export]
macro_rules! symbol {
    ($name:expr) => {
        $crate::state::State::get_symbol($name)
    };
    ($($name:expr),+) => {
        ($($crate::state::State::get_symbol($name)),+)
    };
}

#[cfg(test)]
mod test {
    use crate::{atom::Atom, coefficient::Coefficient, state::Symbol};

    #[test]
    fn ordering() {
        let x = Atom::var(Symbol::new("x"));
        let y = Atom::var(Symbol::new("y"));
        let mut v = vec![
            y.clone(),
            x.npow(3),
            Atom::num(7),
            x.npow(2) * 2,
            x.clone(),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![Atom::num(7), x.clone(), x.npow(2) * 2, x.npow(3), y]
        );
    }

    #[test]
    fn split_coefficient() {
        let x = Atom::var(Symbol::new("x"));
        let y = Atom::var(Symbol::new("y"));
        let t = &x * &y * 3;
        let (c, rest) = t.split_coefficient();
        assert_eq!(c, Coefficient::from(3));
        assert_eq!(rest, &x * &y);

        let (c, rest) = x.split_coefficient();
        assert!(c.is_one());
        assert_eq!(rest, x);
    }

    #[test]
    fn symbols() {
        let a = Atom::parse("sin(x)*y + f(z)^2").unwrap();
        let names: Vec<_> = a.symbols().iter().map(|s| s.get_name()).collect();
        assert_eq!(names.len(), 3);
        assert!(a.contains_symbol(Symbol::new("z")));
        assert!(!a.contains_symbol(Symbol::new("w")));
        assert_eq!(Atom::parse("x + 1").unwrap().node_count(), 3);
    }
}
