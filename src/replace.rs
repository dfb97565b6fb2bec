use crate::{atom::Atom, state::Symbol};

impl Atom {
    /// Replace every occurrence of `pattern` by `rhs`. The pattern is matched
    /// structurally, the result is normalized.
    ///
    /// ```
    /// use symcalc::atom::Atom;
    ///
    /// let a = Atom::parse("x^2 + sin(x)").unwrap();
    /// let r = a.replace_all(&Atom::parse("x").unwrap(), &Atom::parse("2*y").unwrap());
    /// assert_eq!(r, Atom::parse("4*y^2 + sin(2*y)").unwrap());
    /// ```
    pub fn replace_all(&self, pattern: &Atom, rhs: &Atom) -> Atom {
        if self == pattern {
            return rhs.clone();
        }

        self.map_children(|a| a.replace_all(pattern, rhs))
    }

    /// Replace several patterns at once. The first matching pattern wins and
    /// replacements are not substituted into each other.
    pub fn replace_map(&self, replacements: &[(Atom, Atom)]) -> Atom {
        if let Some((_, rhs)) = replacements.iter().find(|(p, _)| p == self) {
            return rhs.clone();
        }

        self.map_children(|a| a.replace_map(replacements))
    }

    /// Substitute numerical values for symbols.
    pub fn substitute(&self, values: &[(Symbol, f64)]) -> Atom {
        let replacements: Vec<_> = values
            .iter()
            .map(|(s, v)| (Atom::var(*s), Atom::num(*v)))
            .collect();
        self.replace_map(&replacements)
    }
}
