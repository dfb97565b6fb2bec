//! Normalization of sums, products, powers and built-in functions.
//!
//! The normalized form has the following properties:
//! - sums and products are flat and sorted by [`Atom::cmp`]
//! - a product has at most one numerical factor, which comes first
//! - like terms are collected and equal bases are combined
//! - a numerical coefficient multiplying a single sum is distributed
//!
//! All arguments are assumed to be normalized already.
use ahash::{HashMap, HashMapExt};

use crate::{
    atom::Atom,
    coefficient::Coefficient,
    state::{State, Symbol},
};

/// Normalize the sum of `terms`.
pub(crate) fn add(terms: Vec<Atom>) -> Atom {
    let mut constant = Coefficient::zero();
    let mut seen_constant = false;
    let mut collected: Vec<(Atom, Coefficient)> = vec![];
    let mut index: HashMap<Atom, usize> = HashMap::new();

    let mut push = |t: Atom| match t {
        Atom::Num(n) => {
            constant = constant.add(&n);
            seen_constant = true;
        }
        t => {
            let (c, rest) = t.split_coefficient();
            if let Some(&i) = index.get(&rest) {
                collected[i].1 = collected[i].1.add(&c);
            } else {
                index.insert(rest.clone(), collected.len());
                collected.push((rest, c));
            }
        }
    };

    for t in terms {
        if let Atom::Add(inner) = t {
            for t in inner {
                push(t);
            }
        } else {
            push(t);
        }
    }

    let mut out = Vec::with_capacity(collected.len() + 1);
    for (rest, c) in collected {
        if !c.is_zero() {
            out.push(with_coefficient(c, rest));
        }
    }

    if out.is_empty() {
        return if seen_constant {
            Atom::Num(constant)
        } else {
            Atom::zero()
        };
    }

    if !constant.is_zero() {
        out.push(Atom::Num(constant));
    }

    if out.len() == 1 {
        return out.pop().unwrap_or_default();
    }

    out.sort();
    Atom::Add(out)
}

/// Multiply a normalized atom without a numerical factor by a coefficient.
fn with_coefficient(c: Coefficient, rest: Atom) -> Atom {
    if c.is_one() {
        return rest;
    }

    match rest {
        Atom::Num(n) => Atom::Num(c.mul(&n)),
        Atom::Mul(mut factors) => {
            factors.insert(0, Atom::Num(c));
            Atom::Mul(factors)
        }
        rest => Atom::Mul(vec![Atom::Num(c), rest]),
    }
}

/// Normalize the product of `factors`.
pub(crate) fn mul(factors: Vec<Atom>) -> Atom {
    let mut coeff = Coefficient::one();
    let mut bases: Vec<(Atom, Vec<Atom>)> = vec![];
    let mut index: HashMap<Atom, usize> = HashMap::new();

    let mut push = |f: Atom| match f {
        Atom::Num(n) => coeff = coeff.mul(&n),
        f => {
            let (base, exp) = match f {
                Atom::Pow(b, e) => (*b, *e),
                f => (f, Atom::one()),
            };
            if let Some(&i) = index.get(&base) {
                bases[i].1.push(exp);
            } else {
                index.insert(base.clone(), bases.len());
                bases.push((base, vec![exp]));
            }
        }
    };

    for f in factors {
        if let Atom::Mul(inner) = f {
            for f in inner {
                push(f);
            }
        } else {
            push(f);
        }
    }

    if coeff.is_zero() {
        return Atom::Num(coeff);
    }

    let mut out = Vec::with_capacity(bases.len() + 1);
    let mut needs_pass = false;
    for (base, exps) in bases {
        let exp = if exps.len() == 1 {
            exps.into_iter().next().unwrap_or_default()
        } else {
            add(exps)
        };

        match pow(base, exp) {
            Atom::Num(n) => coeff = coeff.mul(&n),
            p @ Atom::Mul(_) => {
                needs_pass = true;
                out.push(p);
            }
            p => out.push(p),
        }
    }

    if needs_pass {
        // a power of a product collapsed into a product, for example `(x*y)^(1/2)*(x*y)^(1/2)`
        out.insert(0, Atom::Num(coeff));
        return mul(out);
    }

    if coeff.is_zero() {
        return Atom::Num(coeff);
    }

    if out.is_empty() {
        return Atom::Num(coeff);
    }

    if out.len() == 1 {
        if coeff.is_one() {
            return out.pop().unwrap_or_default();
        }

        if let Atom::Add(terms) = &out[0] {
            return add(
                terms
                    .iter()
                    .map(|t| mul(vec![Atom::Num(coeff.clone()), t.clone()]))
                    .collect(),
            );
        }
    }

    out.sort();
    if !coeff.is_one() {
        out.insert(0, Atom::Num(coeff));
    }
    Atom::Mul(out)
}

/// Normalize `base^exp`.
pub(crate) fn pow(base: Atom, exp: Atom) -> Atom {
    if let Atom::Num(e) = &exp {
        if e.is_zero() {
            return Atom::one();
        }
        if e.is_one() {
            return base;
        }
    }

    if base.is_one() {
        return Atom::one();
    }

    if base == Atom::Var(State::E) {
        return fun(State::EXP, vec![exp]);
    }

    let Atom::Num(e) = &exp else {
        return Atom::Pow(Box::new(base), Box::new(exp));
    };

    match base {
        Atom::Num(b) => match b.pow(e) {
            Some(r) => Atom::Num(r),
            None => Atom::Pow(Box::new(Atom::Num(b)), Box::new(exp)),
        },
        Atom::Pow(b, inner) if e.is_integer() => pow(*b, mul(vec![*inner, exp])),
        Atom::Mul(factors) if e.is_integer() => mul(
            factors
                .into_iter()
                .map(|f| pow(f, exp.clone()))
                .collect(),
        ),
        Atom::Mul(mut factors) => {
            // split off a positive numerical factor
            if let Some(Atom::Num(c)) = factors.first() {
                if !c.is_negative() {
                    let c = factors.remove(0);
                    let rest = if factors.len() == 1 {
                        factors.pop().unwrap_or_default()
                    } else {
                        Atom::Mul(factors)
                    };
                    return mul(vec![pow(c, exp.clone()), pow(rest, exp)]);
                }
            }
            Atom::Pow(Box::new(Atom::Mul(factors)), Box::new(exp))
        }
        base => Atom::Pow(Box::new(base), Box::new(exp)),
    }
}

/// Normalize the function call `symbol(args)`, simplifying built-in
/// functions at special points.
pub(crate) fn fun(symbol: Symbol, args: Vec<Atom>) -> Atom {
    if symbol == State::DERIVATIVE {
        return derivative(args);
    }

    if args.len() != 1 || !symbol.is_builtin() {
        return Atom::Fun(symbol, args);
    }

    let arg = &args[0];

    if let Atom::Num(Coefficient::Float(f)) = arg {
        let r = match symbol {
            State::EXP => f.exp(),
            State::LOG => f.ln(),
            State::SIN => f.sin(),
            State::COS => f.cos(),
            State::TAN => f.tan(),
            State::ABS => f.abs(),
            _ => f64::NAN,
        };
        if r.is_finite() {
            return Atom::num(r);
        }
    }

    let result = match symbol {
        State::EXP => match arg {
            _ if arg.is_zero() => Some(Atom::one()),
            Atom::Fun(State::LOG, a) if a.len() == 1 => Some(a[0].clone()),
            _ => None,
        },
        State::LOG => match arg {
            _ if arg.is_one() => Some(Atom::zero()),
            Atom::Var(State::E) => Some(Atom::one()),
            Atom::Fun(State::EXP, a) if a.len() == 1 => Some(a[0].clone()),
            _ => None,
        },
        State::SIN => match pi_multiple(arg) {
            Some(k) => sin_of_pi_multiple(&k),
            None if arg.is_zero() => Some(Atom::zero()),
            None if has_negative_sign(arg) => {
                Some(mul(vec![Atom::num(-1), fun(State::SIN, vec![negate(arg)])]))
            }
            None => None,
        },
        State::COS => match pi_multiple(arg) {
            Some(k) => sin_of_pi_multiple(&k.add(&Coefficient::from((1, 2)))),
            None if arg.is_zero() => Some(Atom::one()),
            None if has_negative_sign(arg) => Some(fun(State::COS, vec![negate(arg)])),
            None => None,
        },
        State::TAN => match arg {
            _ if arg.is_zero() => Some(Atom::zero()),
            _ if has_negative_sign(arg) => {
                Some(mul(vec![Atom::num(-1), fun(State::TAN, vec![negate(arg)])]))
            }
            _ => None,
        },
        State::ABS => match arg {
            Atom::Num(n) => Some(Atom::Num(n.abs())),
            Atom::Fun(State::ABS, _) => Some(arg.clone()),
            Atom::Var(State::E) | Atom::Var(State::PI) => Some(arg.clone()),
            Atom::Fun(State::EXP, _) => Some(arg.clone()),
            Atom::Mul(factors) => match factors.first() {
                Some(Atom::Num(c)) => {
                    let (_, rest) = arg.split_coefficient();
                    Some(mul(vec![
                        Atom::Num(c.abs()),
                        fun(State::ABS, vec![rest]),
                    ]))
                }
                _ => None,
            },
            _ => None,
        },
        _ => None,
    };

    result.unwrap_or(Atom::Fun(symbol, args))
}

/// `der(n_1, ..., n_k, f(a_1, ..., a_k))` with all orders zero is `f`.
fn derivative(args: Vec<Atom>) -> Atom {
    if let Some((f, orders)) = args.split_last() {
        if orders.iter().all(|o| o.is_zero()) {
            return f.clone();
        }
    }

    Atom::Fun(State::DERIVATIVE, args)
}

fn negate(a: &Atom) -> Atom {
    mul(vec![Atom::num(-1), a.clone()])
}

fn has_negative_sign(a: &Atom) -> bool {
    match a {
        Atom::Num(n) => n.is_negative(),
        Atom::Mul(factors) => matches!(factors.first(), Some(Atom::Num(n)) if n.is_negative()),
        _ => false,
    }
}

/// Get `k` if `a` is `k*pi` with exact rational `k`.
fn pi_multiple(a: &Atom) -> Option<Coefficient> {
    match a {
        Atom::Var(State::PI) => Some(Coefficient::one()),
        Atom::Mul(factors) if factors.len() == 2 => match (&factors[0], &factors[1]) {
            (Atom::Num(k), Atom::Var(State::PI)) if !k.is_float() => Some(k.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Evaluate `sin(k*pi)` for `k` a multiple of `1/2`.
fn sin_of_pi_multiple(k: &Coefficient) -> Option<Atom> {
    let twice = k.mul(&Coefficient::from(2)).to_i64()?;
    if twice % 2 == 0 {
        return Some(Atom::zero());
    }

    // sin((2m+1) pi/2) = (-1)^m
    let m = (twice - 1) / 2;
    Some(Atom::num(if m.rem_euclid(2) == 0 { 1 } else { -1 }))
}
