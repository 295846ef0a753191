use hashbrown::HashMap;

/// Index of a variable inside its [`VariableTable`]
pub type VarId = usize;

/// A free variable of a parsed formula
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    value: Option<f64>,
}

impl Variable {
    /// Create an unbound variable
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Name of the variable in the formula
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound value, if any
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Check if a value is bound
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Bind `value`, replacing any previous value
    pub fn set_value(&mut self, value: f64) {
        self.value = Some(value);
    }
}

/// The distinct variables met during one parse, in order of first use.
///
/// Variable nodes of the tree refer to entries by [`VarId`], so a value bound
/// here is seen by every node using that name.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    variables: Vec<Variable>,
    index: HashMap<String, VarId>,
}

impl VariableTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id of `name`, registering a new unbound variable the first
    /// time the name is seen.
    pub fn intern(&mut self, name: &str) -> VarId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.variables.len();
        self.variables.push(Variable::new(name));
        self.index.insert(name.to_owned(), id);
        id
    }

    /// Id of `name`, if the formula uses it
    pub fn id(&self, name: &str) -> Option<VarId> {
        self.index.get(name).copied()
    }

    /// Variable with the given id
    pub fn get(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id)
    }

    /// Mutable access to the variable with the given id
    pub fn get_mut(&mut self, id: VarId) -> Option<&mut Variable> {
        self.variables.get_mut(id)
    }

    /// First variable in table order without a value
    pub fn first_unbound(&self) -> Option<&Variable> {
        self.variables.iter().find(|variable| !variable.has_value())
    }

    /// All variables, in order of first use
    pub fn as_slice(&self) -> &[Variable] {
        &self.variables
    }

    /// Iterate over the variables in order of first use
    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }

    /// Number of distinct variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Check if the table has no variable
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Remove every variable
    pub fn clear(&mut self) {
        self.variables.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern() {
        let mut table = VariableTable::new();
        let x = table.intern("x");
        let y = table.intern("y");
        assert_eq!(table.intern("x"), x);
        assert_ne!(x, y);
        assert_eq!(table.len(), 2);
        assert_eq!(table.id("y"), Some(y));
        assert_eq!(table.id("z"), None);

        let names: Vec<&str> = table.iter().map(Variable::name).collect();
        assert_eq!(names, ["x", "y"]);
    }

    #[test]
    fn binding() {
        let mut table = VariableTable::new();
        let x = table.intern("x");
        table.intern("y");
        assert_eq!(table.first_unbound().map(Variable::name), Some("x"));

        table.get_mut(x).unwrap().set_value(2.5);
        assert_eq!(table.get(x).and_then(Variable::value), Some(2.5));
        assert_eq!(table.first_unbound().map(Variable::name), Some("y"));

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.id("x"), None);
    }
}
