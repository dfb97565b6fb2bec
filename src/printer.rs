use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::{
    atom::Atom,
    coefficient::Coefficient,
    state::State,
};

/// Options that control how expressions are printed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Print powers as `x**2` instead of `x^2`.
    pub double_star_for_exponentiation: bool,
    /// Print `x^(1/2)` as `sqrt(x)`.
    pub sqrt_for_half_powers: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            double_star_for_exponentiation: false,
            sqrt_for_half_powers: true,
        }
    }
}

impl PrintOptions {
    /// Print in a format that can be read back by Python tools.
    pub fn python() -> PrintOptions {
        PrintOptions {
            double_star_for_exponentiation: true,
            ..Default::default()
        }
    }

    fn pow_symbol(&self) -> &'static str {
        if self.double_star_for_exponentiation {
            "**"
        } else {
            "^"
        }
    }
}

/// A printer for an [`Atom`] with given [`PrintOptions`].
pub struct AtomPrinter<'a> {
    pub atom: &'a Atom,
    pub options: PrintOptions,
}

impl<'a> AtomPrinter<'a> {
    pub fn new(atom: &'a Atom) -> AtomPrinter<'a> {
        AtomPrinter {
            atom,
            options: PrintOptions::default(),
        }
    }

    pub fn new_with_options(atom: &'a Atom, options: PrintOptions) -> AtomPrinter<'a> {
        AtomPrinter { atom, options }
    }
}

impl fmt::Display for AtomPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_atom(self.atom, &self.options, f)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_atom(self, &PrintOptions::default(), f)
    }
}

impl Atom {
    /// Get a printer for the atom with custom options.
    ///
    /// ```
    /// use symcalc::{atom::Atom, printer::PrintOptions};
    ///
    /// let a = Atom::parse("x^2/y").unwrap();
    /// assert_eq!(a.printer(PrintOptions::python()).to_string(), "x**2/y");
    /// ```
    pub fn printer(&self, options: PrintOptions) -> AtomPrinter<'_> {
        AtomPrinter::new_with_options(self, options)
    }
}

fn format_atom(atom: &Atom, opts: &PrintOptions, f: &mut dyn Write) -> fmt::Result {
    match atom {
        Atom::Num(n) => write!(f, "{}", n),
        Atom::Var(s) => f.write_str(&State::get_name(*s)),
        Atom::Fun(s, args) => {
            f.write_str(&State::get_name(*s))?;
            f.write_char('(')?;
            for (i, a) in args.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                format_atom(a, opts, f)?;
            }
            f.write_char(')')
        }
        Atom::Pow(_, e) if matches!(&**e, Atom::Num(n) if n.is_negative()) => {
            format_product(std::slice::from_ref(atom), opts, f)
        }
        Atom::Pow(b, e) => format_power(b, e, opts, f),
        Atom::Mul(factors) => format_product(factors, opts, f),
        Atom::Add(terms) => {
            // highest degree first, terms of equal degree in canonical order
            let mut terms: Vec<&Atom> = terms.iter().collect();
            terms.sort_by(|a, b| degree(b).total_cmp(&degree(a)));

            for (i, t) in terms.into_iter().enumerate() {
                let (c, _) = t.split_coefficient();
                if c.is_negative() {
                    f.write_str(if i == 0 { "-" } else { " - " })?;
                    format_atom(&-t, opts, f)?;
                } else {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    format_atom(t, opts, f)?;
                }
            }
            Ok(())
        }
    }
}

/// The total degree of a term in its variables. Functions count as constants.
fn degree(a: &Atom) -> f64 {
    match a {
        Atom::Num(_) | Atom::Fun(..) => 0.,
        Atom::Var(_) => 1.,
        Atom::Pow(b, e) => match &**e {
            Atom::Num(n) => degree(b) * n.to_f64(),
            _ => degree(b),
        },
        Atom::Mul(factors) => factors.iter().map(degree).sum(),
        Atom::Add(terms) => terms.iter().map(degree).fold(0., f64::max),
    }
}

fn format_power(base: &Atom, exp: &Atom, opts: &PrintOptions, f: &mut dyn Write) -> fmt::Result {
    if opts.sqrt_for_half_powers && *exp == Atom::num((1, 2)) {
        f.write_str("sqrt(")?;
        format_atom(base, opts, f)?;
        return f.write_char(')');
    }

    if needs_parentheses_as_base(base) {
        f.write_char('(')?;
        format_atom(base, opts, f)?;
        f.write_char(')')?;
    } else {
        format_atom(base, opts, f)?;
    }

    f.write_str(opts.pow_symbol())?;

    if needs_parentheses_as_exponent(exp) {
        f.write_char('(')?;
        format_atom(exp, opts, f)?;
        f.write_char(')')
    } else {
        format_atom(exp, opts, f)
    }
}

fn is_fraction(c: &Coefficient) -> bool {
    !c.is_float() && !c.is_integer()
}

fn needs_parentheses_as_base(a: &Atom) -> bool {
    match a {
        Atom::Num(n) => n.is_negative() || is_fraction(n),
        Atom::Var(_) | Atom::Fun(..) => false,
        _ => true,
    }
}

fn needs_parentheses_as_exponent(a: &Atom) -> bool {
    match a {
        Atom::Num(n) => n.is_negative() || is_fraction(n),
        Atom::Var(_) | Atom::Fun(..) => false,
        _ => true,
    }
}

/// Print a product as `c*n_1*...*n_k/(d*m_1*...*m_l)`, where the `m_i` are
/// the factors with a negative exponent.
fn format_product(factors: &[Atom], opts: &PrintOptions, f: &mut dyn Write) -> fmt::Result {
    let (coeff, factors) = match factors.first() {
        Some(Atom::Num(n)) => (n.clone(), &factors[1..]),
        _ => (Coefficient::one(), factors),
    };

    let mut numerator = vec![];
    let mut denominator = vec![];
    for a in factors {
        match a {
            Atom::Pow(b, e) => match &**e {
                Atom::Num(n) if n.is_negative() => {
                    denominator.push(b.npow(n.neg()));
                }
                _ => numerator.push(a.clone()),
            },
            _ => numerator.push(a.clone()),
        }
    }

    if coeff.is_negative() {
        f.write_char('-')?;
    }
    let coeff = coeff.abs();

    let (num_coeff, den_coeff) = match coeff.numer_denom() {
        Some((n, d)) => (Coefficient::from(n), Coefficient::from(d)),
        None => (coeff, Coefficient::one()),
    };

    let mut first = true;
    if !num_coeff.is_one() || numerator.is_empty() {
        write!(f, "{}", num_coeff)?;
        first = false;
    }

    for a in &numerator {
        if !first {
            f.write_char('*')?;
        }
        first = false;
        format_factor(a, opts, f)?;
    }

    let den_count = denominator.len() + usize::from(!den_coeff.is_one());
    if den_count == 0 {
        return Ok(());
    }

    f.write_char('/')?;
    if den_count > 1 {
        f.write_char('(')?;
    }

    let mut first = true;
    if !den_coeff.is_one() {
        write!(f, "{}", den_coeff)?;
        first = false;
    }
    for a in &denominator {
        if !first {
            f.write_char('*')?;
        }
        first = false;
        format_factor(a, opts, f)?;
    }

    if den_count > 1 {
        f.write_char(')')?;
    }
    Ok(())
}

/// Print a factor of a product, with parentheses around sums.
fn format_factor(a: &Atom, opts: &PrintOptions, f: &mut dyn Write) -> fmt::Result {
    if let Atom::Add(_) = a {
        f.write_char('(')?;
        format_atom(a, opts, f)?;
        f.write_char(')')
    } else {
        format_atom(a, opts, f)
    }
}
