use std::ops::{Add, Div, Mul, Neg, Sub};

use super::Atom;

fn add(a: Atom, b: Atom) -> Atom {
    Atom::add_all(vec![a, b])
}

fn sub(a: Atom, b: Atom) -> Atom {
    Atom::add_all(vec![a, negate(b)])
}

fn mul(a: Atom, b: Atom) -> Atom {
    Atom::mul_all(vec![a, b])
}

fn div(a: Atom, b: Atom) -> Atom {
    Atom::mul_all(vec![a, b.npow(-1)])
}

fn negate(a: Atom) -> Atom {
    Atom::mul_all(vec![Atom::num(-1), a])
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $f:ident, $($num:ty),*) => {
        impl $trait<Atom> for Atom {
            type Output = Atom;

            fn $method(self, rhs: Atom) -> Atom {
                $f(self, rhs)
            }
        }

        impl $trait<&Atom> for Atom {
            type Output = Atom;

            fn $method(self, rhs: &Atom) -> Atom {
                $f(self, rhs.clone())
            }
        }

        impl $trait<Atom> for &Atom {
            type Output = Atom;

            fn $method(self, rhs: Atom) -> Atom {
                $f(self.clone(), rhs)
            }
        }

        impl $trait<&Atom> for &Atom {
            type Output = Atom;

            fn $method(self, rhs: &Atom) -> Atom {
                $f(self.clone(), rhs.clone())
            }
        }

        $(
        impl $trait<$num> for Atom {
            type Output = Atom;

            fn $method(self, rhs: $num) -> Atom {
                $f(self, Atom::num(rhs))
            }
        }

        impl $trait<$num> for &Atom {
            type Output = Atom;

            fn $method(self, rhs: $num) -> Atom {
                $f(self.clone(), Atom::num(rhs))
            }
        }

        impl $trait<Atom> for $num {
            type Output = Atom;

            fn $method(self, rhs: Atom) -> Atom {
                $f(Atom::num(self), rhs)
            }
        }

        impl $trait<&Atom> for $num {
            type Output = Atom;

            fn $method(self, rhs: &Atom) -> Atom {
                $f(Atom::num(self), rhs.clone())
            }
        }
        )*
    };
}

impl_binary_op!(Add, add, add, i64, f64);
impl_binary_op!(Sub, sub, sub, i64, f64);
impl_binary_op!(Mul, mul, mul, i64, f64);
impl_binary_op!(Div, div, div, i64, f64);

impl Neg for Atom {
    type Output = Atom;

    fn neg(self) -> Atom {
        negate(self)
    }
}

impl Neg for &Atom {
    type Output = Atom;

    fn neg(self) -> Atom {
        negate(self.clone())
    }
}

#[cfg(test)]
mod test {
    use crate::{atom::Atom, state::Symbol};

    #[test]
    fn arithmetic() {
        let x = Atom::var(Symbol::new("x"));
        let y = Atom::var(Symbol::new("y"));

        assert_eq!(&x - &x, Atom::zero());
        assert_eq!(&x + &x, &x * 2);
        assert_eq!(&x * &x / &x, x);
        assert_eq!(-(-&y), y);
        assert_eq!((&x + 1) * 2, &x * 2 + 2);
        assert_eq!(1 - &x + &x, Atom::one());
    }
}
