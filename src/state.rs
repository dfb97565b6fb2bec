use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::RwLock;

use ahash::{HashMap, HashMapExt};
use once_cell::sync::Lazy;
use smartstring::alias::String;

static STATE: Lazy<RwLock<State>> = Lazy::new(|| RwLock::new(State::new()));

/// A variable or function name, interned in the global [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Get the symbol with the given name, registering it if needed.
    pub fn new<S: AsRef<str>>(name: S) -> Symbol {
        State::get_symbol(name)
    }

    #[inline]
    pub fn get_id(&self) -> u32 {
        self.0
    }

    /// Get the name of the symbol.
    pub fn get_name(&self) -> String {
        State::get_name(*self)
    }

    /// Returns `true` iff this symbol is one of the built-in functions or constants.
    pub fn is_builtin(&self) -> bool {
        State::is_builtin(*self)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&State::get_name(*self))
    }
}

/// A global state, that stores mappings from variable and function names to ids.
pub struct State {
    str_to_id: HashMap<String, Symbol>,
    id_to_str: Vec<String>,
}

impl State {
    pub const EXP: Symbol = Symbol(0);
    pub const LOG: Symbol = Symbol(1);
    pub const SIN: Symbol = Symbol(2);
    pub const COS: Symbol = Symbol(3);
    pub const TAN: Symbol = Symbol(4);
    pub const ABS: Symbol = Symbol(5);
    pub const DERIVATIVE: Symbol = Symbol(6);
    pub const E: Symbol = Symbol(7);
    pub const PI: Symbol = Symbol(8);

    pub const BUILTIN_SYMBOL_NAMES: [&'static str; 9] =
        ["exp", "log", "sin", "cos", "tan", "abs", "der", "e", "pi"];

    fn new() -> State {
        let mut state = State {
            str_to_id: HashMap::new(),
            id_to_str: Vec::new(),
        };

        for x in Self::BUILTIN_SYMBOL_NAMES {
            state.get_symbol_impl(x);
        }

        state
    }

    /// Get the symbol for a certain name if the name is already registered,
    /// else register it and return a new symbol.
    pub fn get_symbol<S: AsRef<str>>(name: S) -> Symbol {
        {
            let state = STATE.read().unwrap_or_else(|e| e.into_inner());
            if let Some(s) = state.str_to_id.get(name.as_ref()) {
                return *s;
            }
        }

        STATE
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .get_symbol_impl(name.as_ref())
    }

    fn get_symbol_impl(&mut self, name: &str) -> Symbol {
        match self.str_to_id.entry(name.into()) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(v) => {
                if self.id_to_str.len() >= u32::MAX as usize {
                    panic!("Too many symbols defined");
                }

                let symbol = Symbol(self.id_to_str.len() as u32);
                self.id_to_str.push(name.into());
                v.insert(symbol);
                symbol
            }
        }
    }

    /// Get the name for a given symbol.
    pub fn get_name(id: Symbol) -> String {
        let state = STATE.read().unwrap_or_else(|e| e.into_inner());
        state.id_to_str[id.0 as usize].clone()
    }

    /// Returns `true` iff this identifier is defined by the crate.
    pub fn is_builtin(id: Symbol) -> bool {
        (id.0 as usize) < Self::BUILTIN_SYMBOL_NAMES.len()
    }

    /// Iterate over the names of all user-defined symbols.
    pub fn symbol_names() -> Vec<String> {
        let state = STATE.read().unwrap_or_else(|e| e.into_inner());
        state
            .id_to_str
            .iter()
            .skip(Self::BUILTIN_SYMBOL_NAMES.len())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::{State, Symbol};

    #[test]
    fn builtins() {
        assert_eq!(State::get_symbol("sin"), State::SIN);
        assert_eq!(State::get_symbol("pi"), State::PI);
        assert!(State::DERIVATIVE.is_builtin());
        assert_eq!(State::get_name(State::COS).as_str(), "cos");
    }

    #[test]
    fn interning() {
        let a = Symbol::new("state_test_a");
        let b = Symbol::new("state_test_b");
        assert_ne!(a, b);
        assert_eq!(Symbol::new("state_test_a"), a);
        assert_eq!(a.get_name().as_str(), "state_test_a");
        assert!(!a.is_builtin());
        assert!(State::symbol_names()
            .iter()
            .any(|n| n.as_str() == "state_test_b"));
    }
}
