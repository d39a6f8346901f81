use std::collections::HashMap;

use rpal_values::Value;

struct Environment {
    bindings: HashMap<String, Value>,
    parent: Option<usize>,
    inactive: bool,
}

/// The environment arena (§3, §4.4): indexed by a monotonic counter,
/// environments are never removed, only marked inactive once their `Gamma`
/// call returns, so closures that captured them keep a valid index to look
/// through.
pub struct Environments {
    envs: Vec<Environment>,
}

impl Environments {
    /// Creates the arena with environment 0: empty, no parent, active.
    pub fn new() -> Self {
        Environments {
            envs: vec![Environment {
                bindings: HashMap::new(),
                parent: None,
                inactive: false,
            }],
        }
    }

    /// Activates a fresh environment whose parent is `parent`, returning its
    /// index.
    pub fn create(&mut self, parent: usize) -> usize {
        let index = self.envs.len();
        self.envs.push(Environment {
            bindings: HashMap::new(),
            parent: Some(parent),
            inactive: false,
        });
        index
    }

    pub fn bind(&mut self, env: usize, name: String, value: Value) {
        self.envs[env].bindings.insert(name, value);
    }

    /// Walks the env chain from `env` toward the root; the first binding for
    /// `name` wins. `None` means unbound (§4.4 "Environment lookup" — the
    /// caller turns this into `Value::Name`).
    pub fn lookup(&self, env: usize, name: &str) -> Option<Value> {
        let mut current = Some(env);
        while let Some(index) = current {
            if let Some(value) = self.envs[index].bindings.get(name) {
                return Some(value.clone());
            }
            current = self.envs[index].parent;
        }
        None
    }

    /// Marks `env` inactive and returns the nearest still-active ancestor,
    /// the new current environment per §4.4's `EnvMarker` action.
    pub fn deactivate(&mut self, env: usize) -> usize {
        self.envs[env].inactive = true;
        let mut candidate = self.envs[env].parent;
        while let Some(index) = candidate {
            if !self.envs[index].inactive {
                return index;
            }
            candidate = self.envs[index].parent;
        }
        0
    }
}

impl Default for Environments {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_parent_chain() {
        let mut envs = Environments::new();
        envs.bind(0, "x".to_string(), Value::Int(1));
        let child = envs.create(0);
        envs.bind(child, "y".to_string(), Value::Int(2));

        assert_eq!(envs.lookup(child, "y"), Some(Value::Int(2)));
        assert_eq!(envs.lookup(child, "x"), Some(Value::Int(1)));
        assert_eq!(envs.lookup(child, "z"), None);
    }

    #[test]
    fn shadowing_prefers_nearest_binding() {
        let mut envs = Environments::new();
        envs.bind(0, "x".to_string(), Value::Int(1));
        let child = envs.create(0);
        envs.bind(child, "x".to_string(), Value::Int(2));

        assert_eq!(envs.lookup(child, "x"), Some(Value::Int(2)));
    }

    #[test]
    fn deactivate_returns_nearest_active_ancestor() {
        let mut envs = Environments::new();
        let a = envs.create(0);
        let b = envs.create(a);
        envs.deactivate(a);
        assert_eq!(envs.deactivate(b), 0);
    }
}
