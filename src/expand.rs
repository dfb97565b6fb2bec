use tracing::trace;

use crate::atom::Atom;

/// The largest power of a sum that is expanded.
const MAX_EXPANSION_POWER: i64 = 64;

impl Atom {
    /// Expand an expression by distributing products over sums and by
    /// expanding positive integer powers of sums.
    ///
    /// ```
    /// use symcalc::atom::Atom;
    ///
    /// let a = Atom::parse("(x+1)^2*(y-1)").unwrap();
    /// assert_eq!(
    ///     a.expand(),
    ///     Atom::parse("x^2*y - x^2 + 2*x*y - 2*x + y - 1").unwrap()
    /// );
    /// ```
    pub fn expand(&self) -> Atom {
        match self {
            Atom::Num(_) | Atom::Var(_) => self.clone(),
            Atom::Fun(..) | Atom::Add(_) => self.map_children(|a| a.expand()),
            Atom::Mul(factors) => {
                let expanded: Vec<Atom> = factors.iter().map(|f| f.expand()).collect();
                distribute(&expanded)
            }
            Atom::Pow(base, exp) => {
                let base = base.expand();
                let exp = exp.expand();

                if let (Atom::Add(_), Some(n)) = (&base, exp.as_num().and_then(|n| n.to_i64())) {
                    if n > 1 && n <= MAX_EXPANSION_POWER {
                        let mut out = base.clone();
                        for _ in 1..n {
                            out = distribute(&[out, base.clone()]);
                        }
                        return out;
                    }

                    if n > MAX_EXPANSION_POWER {
                        trace!("Not expanding power {} of a sum", n);
                    }
                }

                match base.pow(&exp) {
                    p @ Atom::Mul(_) => p.expand(),
                    p => p,
                }
            }
        }
    }
}

/// Multiply out a product of expanded factors.
fn distribute(factors: &[Atom]) -> Atom {
    let mut terms = vec![Atom::one()];

    for f in factors {
        match f {
            Atom::Add(summands) => {
                let mut new_terms = Vec::with_capacity(terms.len() * summands.len());
                for t in &terms {
                    for s in summands {
                        new_terms.push(t * s);
                    }
                }
                terms = new_terms;
            }
            f => {
                for t in &mut terms {
                    *t = &*t * f;
                }
            }
        }
    }

    Atom::add_all(terms)
}
