use indexmap::IndexMap;

use crate::value::Value;

/// The variable store of one interpreter session.
///
/// Only `let` and `input` statements write to it, and nothing is ever removed.
/// It outlives individual loads, which is how REPL sessions accumulate state.
#[derive(Debug, Default, Clone)]
pub struct Context {
    bindings: IndexMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or overwrites `name`.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), value))
    }
}
