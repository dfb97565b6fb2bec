use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use rug::{ops::Pow, Integer, Rational};

/// The largest integer exponent that is evaluated exactly.
const MAX_EXACT_EXPONENT: u32 = 4096;

/// A numerical coefficient: an exact rational number or a double.
///
/// Every operation that involves a double yields a double. Doubles are stored
/// without a sign on zero, so that equality and hashing agree.
#[derive(Debug, Clone)]
pub enum Coefficient {
    Rational(Rational),
    Float(f64),
}

impl From<i64> for Coefficient {
    fn from(value: i64) -> Self {
        Coefficient::Rational(Rational::from(value))
    }
}

impl From<i32> for Coefficient {
    fn from(value: i32) -> Self {
        Coefficient::Rational(Rational::from(value))
    }
}

impl From<(i64, i64)> for Coefficient {
    /// Create the fraction `num/den`. Panics when `den` is zero.
    fn from(value: (i64, i64)) -> Self {
        Coefficient::Rational(Rational::from(value))
    }
}

impl From<Rational> for Coefficient {
    fn from(value: Rational) -> Self {
        Coefficient::Rational(value)
    }
}

impl From<Integer> for Coefficient {
    fn from(value: Integer) -> Self {
        Coefficient::Rational(Rational::from(value))
    }
}

impl From<f64> for Coefficient {
    fn from(value: f64) -> Self {
        Coefficient::float(value)
    }
}

impl Coefficient {
    fn float(value: f64) -> Coefficient {
        if value == 0.0 {
            Coefficient::Float(0.0)
        } else {
            Coefficient::Float(value)
        }
    }

    pub fn zero() -> Coefficient {
        Coefficient::Rational(Rational::new())
    }

    pub fn one() -> Coefficient {
        Coefficient::Rational(Rational::from(1))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Coefficient::Rational(r) => r.cmp0() == Ordering::Equal,
            Coefficient::Float(f) => *f == 0.0,
        }
    }

    /// Returns `true` iff the coefficient is exactly the rational number one.
    pub fn is_one(&self) -> bool {
        match self {
            Coefficient::Rational(r) => *r == 1,
            Coefficient::Float(_) => false,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Coefficient::Rational(r) => r.cmp0() == Ordering::Less,
            Coefficient::Float(f) => *f < 0.0,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Coefficient::Float(_))
    }

    /// Returns `true` iff the coefficient is an exact integer.
    pub fn is_integer(&self) -> bool {
        match self {
            Coefficient::Rational(r) => *r.denom() == 1,
            Coefficient::Float(_) => false,
        }
    }

    /// Convert an exact integer coefficient to `i64`.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Coefficient::Rational(r) if *r.denom() == 1 => r.numer().to_i64(),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Coefficient::Rational(r) => r.to_f64(),
            Coefficient::Float(f) => *f,
        }
    }

    /// Get the numerator and denominator of an exact coefficient.
    pub fn numer_denom(&self) -> Option<(Integer, Integer)> {
        match self {
            Coefficient::Rational(r) => Some((r.numer().clone(), r.denom().clone())),
            Coefficient::Float(_) => None,
        }
    }

    pub fn neg(&self) -> Coefficient {
        match self {
            Coefficient::Rational(r) => Coefficient::Rational(-r.clone()),
            Coefficient::Float(f) => Coefficient::float(-f),
        }
    }

    pub fn abs(&self) -> Coefficient {
        match self {
            Coefficient::Rational(r) => Coefficient::Rational(r.clone().abs()),
            Coefficient::Float(f) => Coefficient::float(f.abs()),
        }
    }

    pub fn add(&self, other: &Coefficient) -> Coefficient {
        match (self, other) {
            (Coefficient::Rational(r1), Coefficient::Rational(r2)) => {
                Coefficient::Rational(r1.clone() + r2)
            }
            _ => Coefficient::float(self.to_f64() + other.to_f64()),
        }
    }

    pub fn mul(&self, other: &Coefficient) -> Coefficient {
        match (self, other) {
            (Coefficient::Rational(r1), Coefficient::Rational(r2)) => {
                Coefficient::Rational(r1.clone() * r2)
            }
            _ => Coefficient::float(self.to_f64() * other.to_f64()),
        }
    }

    /// Compute the inverse. Returns `None` for an exact zero.
    pub fn inv(&self) -> Option<Coefficient> {
        match self {
            Coefficient::Rational(r) => {
                if r.cmp0() == Ordering::Equal {
                    None
                } else {
                    Some(Coefficient::Rational(r.clone().recip()))
                }
            }
            Coefficient::Float(f) => Some(Coefficient::float(1.0 / f)),
        }
    }

    /// Raise to the power `exp`. Returns `None` when the result cannot be
    /// represented as a coefficient, for example `2^(1/2)` or `(-1)^0.5`.
    pub fn pow(&self, exp: &Coefficient) -> Option<Coefficient> {
        if self.is_float() || exp.is_float() {
            let (b, e) = (self.to_f64(), exp.to_f64());
            let r = b.powf(e);
            return if r.is_finite() {
                Some(Coefficient::float(r))
            } else {
                None
            };
        }

        let (Coefficient::Rational(base), Coefficient::Rational(e)) = (self, exp) else {
            unreachable!()
        };

        let e_num = e.numer().to_i32()?;
        let e_den = e.denom().to_u32()?;

        if e_num.unsigned_abs() > MAX_EXACT_EXPONENT || e_den > MAX_EXACT_EXPONENT {
            return None;
        }

        if base.cmp0() == Ordering::Equal {
            return if e_num > 0 {
                Some(Coefficient::zero())
            } else {
                None
            };
        }

        let root = if e_den == 1 {
            base.clone()
        } else {
            if base.cmp0() == Ordering::Less {
                return None;
            }
            let num = exact_root(base.numer(), e_den)?;
            let den = exact_root(base.denom(), e_den)?;
            Rational::from((num, den))
        };

        Some(Coefficient::Rational(root.pow(e_num)))
    }
}

/// The `n`-th root of `i`, if it is an integer.
fn exact_root(i: &Integer, n: u32) -> Option<Integer> {
    let r = i.clone().root(n);
    if r.clone().pow(n) == *i {
        Some(r)
    } else {
        None
    }
}

impl PartialEq for Coefficient {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Coefficient::Rational(r1), Coefficient::Rational(r2)) => r1 == r2,
            (Coefficient::Float(f1), Coefficient::Float(f2)) => f1.to_bits() == f2.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Coefficient {}

impl Hash for Coefficient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Coefficient::Rational(r) => {
                0u8.hash(state);
                r.hash(state);
            }
            Coefficient::Float(f) => {
                1u8.hash(state);
                f.to_bits().hash(state);
            }
        }
    }
}

impl PartialOrd for Coefficient {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coefficient {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Coefficient::Rational(r1), Coefficient::Rational(r2)) => r1.cmp(r2),
            (Coefficient::Float(f1), Coefficient::Float(f2)) => f1.total_cmp(f2),
            (Coefficient::Rational(_), Coefficient::Float(_)) => {
                self.to_f64().total_cmp(&other.to_f64()).then(Ordering::Less)
            }
            (Coefficient::Float(_), Coefficient::Rational(_)) => {
                self.to_f64().total_cmp(&other.to_f64()).then(Ordering::Greater)
            }
        }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Rational(r) => write!(f, "{}", r),
            Coefficient::Float(x) => write!(f, "{:?}", x),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Coefficient;

    #[test]
    fn exact_arithmetic() {
        let a = Coefficient::from((1, 2));
        let b = Coefficient::from((1, 3));
        assert_eq!(a.add(&b), Coefficient::from((5, 6)));
        assert_eq!(a.mul(&b), Coefficient::from((1, 6)));
        assert_eq!(a.inv(), Some(Coefficient::from(2)));
        assert_eq!(Coefficient::zero().inv(), None);
        assert!(Coefficient::from(-3).is_negative());
        assert_eq!(Coefficient::from(7).to_i64(), Some(7));
        assert_eq!(a.to_i64(), None);
    }

    #[test]
    fn floats_are_contagious() {
        let a = Coefficient::from(2);
        let b = Coefficient::from(0.5);
        assert_eq!(a.mul(&b), Coefficient::from(1.0));
        assert!(a.add(&b).is_float());
        assert!(!Coefficient::from(1.0).is_one());
        assert_eq!(Coefficient::from(-0.0), Coefficient::from(0.0));
    }

    #[test]
    fn powers() {
        let c = Coefficient::from(625);
        assert_eq!(c.pow(&Coefficient::from((1, 2))), Some(Coefficient::from(25)));
        assert_eq!(
            Coefficient::from((4, 9)).pow(&Coefficient::from((-3, 2))),
            Some(Coefficient::from((27, 8)))
        );
        assert_eq!(Coefficient::from(2).pow(&Coefficient::from((1, 2))), None);
        assert_eq!(Coefficient::from(-4).pow(&Coefficient::from((1, 2))), None);
        assert_eq!(Coefficient::zero().pow(&Coefficient::from(-1)), None);
        assert_eq!(
            Coefficient::from(25.0).pow(&Coefficient::from(1.5)),
            Some(Coefficient::from(125.0))
        );
        assert_eq!(Coefficient::from(-1.0).pow(&Coefficient::from(0.5)), None);
    }

    #[test]
    fn display() {
        assert_eq!(Coefficient::from((-3, 4)).to_string(), "-3/4");
        assert_eq!(Coefficient::from(5.0).to_string(), "5.0");
    }
}
