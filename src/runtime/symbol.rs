//! Global symbol registry
//!
//! Backs `Symbol.for` and `Symbol.keyFor`. Entries are added on first use of
//! a key and live as long as the owning context.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::runtime::string::JsString;
use crate::value::Symbol;

/// Key to symbol mapping with a reverse index for `Symbol.keyFor`
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    by_key: FxHashMap<JsString, Symbol>,
    by_symbol: FxHashMap<Symbol, JsString>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered symbols
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Canonical symbol for `key`, registering it on first use
    pub fn for_key(&mut self, key: &JsString) -> Symbol {
        if let Some(sym) = self.by_key.get(key) {
            return sym.clone();
        }
        let sym = Symbol::new(Some(key.clone()));
        debug!(key = %key, "registered global symbol");
        self.by_key.insert(key.clone(), sym.clone());
        self.by_symbol.insert(sym.clone(), key.clone());
        sym
    }

    /// Registry key of a symbol, if it was created by `Symbol.for`
    pub fn key_for(&self, sym: &Symbol) -> Option<JsString> {
        self.by_symbol.get(sym).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning() {
        let mut registry = SymbolRegistry::new();
        assert!(registry.is_empty());

        let a = registry.for_key(&JsString::from("x"));
        let b = registry.for_key(&JsString::from("x"));
        let c = registry.for_key(&JsString::from("y"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_key_for() {
        let mut registry = SymbolRegistry::new();
        let a = registry.for_key(&JsString::from("x"));
        assert_eq!(registry.key_for(&a), Some(JsString::from("x")));

        let local = Symbol::new(Some(JsString::from("x")));
        assert_eq!(registry.key_for(&local), None);
    }
}
