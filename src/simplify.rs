use crate::{
    atom::Atom,
    state::{State, Symbol},
};

impl Atom {
    /// Simplify the expression. The candidates are the expression itself and
    /// its expansion, each with `c*sin(u)^2 + c*cos(u)^2` rewritten to `c`.
    /// The candidate with the fewest nodes is returned.
    ///
    /// ```
    /// use symcalc::atom::Atom;
    ///
    /// let a = Atom::parse("3*y*sin(x)^2 + 3*y*cos(x)^2").unwrap();
    /// assert_eq!(a.simplify(), Atom::parse("3*y").unwrap());
    /// ```
    pub fn simplify(&self) -> Atom {
        let expanded = self.expand();
        let candidates = [
            pythagorean(self),
            pythagorean(&expanded),
            self.clone(),
            expanded,
        ];

        candidates
            .into_iter()
            .min_by_key(|a| a.node_count())
            .unwrap_or_else(|| self.clone())
    }
}

/// Rewrite `c*sin(u)^2 + c*cos(u)^2` to `c`, bottom-up.
fn pythagorean(a: &Atom) -> Atom {
    let a = a.map_children(pythagorean);

    if let Atom::Add(terms) = &a {
        if let Some(r) = pythagorean_sum(terms) {
            return r;
        }
    }

    a
}

fn pythagorean_sum(terms: &[Atom]) -> Option<Atom> {
    let mut terms = terms.to_vec();
    let mut changed = false;

    'search: loop {
        for i in 0..terms.len() {
            let Some((u, rest)) = split_square(&terms[i], State::SIN) else {
                continue;
            };

            for j in 0..terms.len() {
                if i == j {
                    continue;
                }

                if let Some((u2, rest2)) = split_square(&terms[j], State::COS) {
                    if u == u2 && rest == rest2 {
                        terms.remove(i.max(j));
                        terms.remove(i.min(j));
                        terms.push(rest);
                        changed = true;
                        continue 'search;
                    }
                }
            }
        }
        break;
    }

    if changed {
        Some(Atom::add_all(terms))
    } else {
        None
    }
}

/// Match `rest*f(u)^2` and return `(u, rest)`.
fn split_square(term: &Atom, f: Symbol) -> Option<(Atom, Atom)> {
    fn is_square(a: &Atom, f: Symbol) -> Option<&Atom> {
        match a {
            Atom::Pow(b, e) if **e == Atom::num(2) => match &**b {
                Atom::Fun(s, args) if *s == f && args.len() == 1 => Some(&args[0]),
                _ => None,
            },
            _ => None,
        }
    }

    match term {
        Atom::Mul(factors) => {
            for (k, factor) in factors.iter().enumerate() {
                if let Some(u) = is_square(factor, f) {
                    let mut rest = factors.clone();
                    rest.remove(k);
                    return Some((u.clone(), Atom::mul_all(rest)));
                }
            }
            None
        }
        _ => is_square(term, f).map(|u| (u.clone(), Atom::one())),
    }
}

#[cfg(test)]
mod test {
    use crate::atom::Atom;

    #[test]
    fn trigonometric_identity() {
        let a = Atom::parse("sin(x)^2 + cos(x)^2").unwrap();
        assert_eq!(a.simplify(), Atom::one());

        let b = Atom::parse("25.0*sin(t)^2 + 25.0*cos(t)^2").unwrap();
        assert_eq!(b.simplify(), Atom::num(25.0));

        let c = Atom::parse("(a^2*sin(t)^2 + a^2*cos(t)^2)^(3/2)").unwrap();
        assert_eq!(c.simplify(), Atom::parse("(a^2)^(3/2)").unwrap());

        // different coefficients are kept
        let d = Atom::parse("2*sin(x)^2 + cos(x)^2").unwrap();
        assert_eq!(d.simplify(), d);
    }

    #[test]
    fn prefer_smaller() {
        let a = Atom::parse("(x+1)^2 - x^2 - 2*x").unwrap();
        assert_eq!(a.simplify(), Atom::one());

        let b = Atom::parse("(x+1)^3").unwrap();
        assert_eq!(b.simplify(), b);
    }
}
