use hashbrown::HashMap;
use std::fmt;
use std::sync::Arc;

type Callable = dyn Fn(&[f64]) -> f64 + Send + Sync;

/// A named function with a fixed number of arguments, registered by the host.
#[derive(Clone)]
pub struct Function {
    name: String,
    arity: usize,
    callable: Arc<Callable>,
}

impl Function {
    /// Wrap `callable` as a function named `name` taking `arity` arguments
    pub fn new<F>(name: impl Into<String>, arity: usize, callable: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            callable: Arc::new(callable),
        }
    }

    /// Name the function is called by
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of arguments the function requires
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Call the native implementation.
    ///
    /// `args` should hold [`Function::arity`] values. The arity is not
    /// checked here: calls built by the parser are validated before
    /// evaluation, and a host calling directly is responsible for it. Host
    /// closures indexing into `args` may panic on a shorter slice, the
    /// [standard functions](crate::STANDARD_FUNCTIONS) return `NaN`.
    pub fn call(&self, args: &[f64]) -> f64 {
        (self.callable)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Functions known to a formula, looked up by exact name
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<Function>>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function`, replacing any function with the same name.
    /// Trees parsed before keep the function they were built with.
    pub fn register(&mut self, function: Function) {
        self.functions
            .insert(function.name.clone(), Arc::new(function));
    }

    /// Function registered under exactly `name`
    pub fn get(&self, name: &str) -> Option<&Arc<Function>> {
        self.functions.get(name)
    }

    /// Check if a function is registered under exactly `name`
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if no function is registered
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.is_empty());

        registry.register(Function::new("LEFT", 2, |args| args[0]));
        registry.register(Function::new("RIGHT", 2, |args| args[1]));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), ["LEFT", "RIGHT"]);

        let left = registry.get("LEFT").unwrap();
        assert_eq!(left.arity(), 2);
        assert_eq!(left.call(&[1.0, 2.0]), 1.0);
        assert!(!registry.contains("left"));
    }

    #[test]
    fn replace() {
        let mut registry = FunctionRegistry::new();
        registry.register(Function::new("f", 1, |args| args[0]));
        let old = Arc::clone(registry.get("f").unwrap());

        registry.register(Function::new("f", 2, |args| args[0] + args[1]));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("f").unwrap().arity(), 2);
        assert_eq!(old.arity(), 1);
        assert_eq!(old.call(&[4.0]), 4.0);
    }
}
