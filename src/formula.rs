use crate::ast::{Node, TreeDisplay};
use crate::error::Error;
use crate::function::{Function, FunctionRegistry};
use crate::lexer::tokenize;
use crate::parser::Parser;
use crate::util::{locate, STANDARD_FUNCTIONS};
use crate::variable::{Variable, VariableTable};
use log::debug;
use std::collections::HashMap;

/// Evaluate a single formula from `input`, with the standard functions
/// available.
///
/// Variables used by the formula are read from `context`, other entries of
/// `context` are ignored. Returns `Ok(result)` if the evaluation is
/// successful, or `Err(cause)` if parsing, binding or evaluating failed.
///
/// # Example
///
/// ```
/// # use std::collections::HashMap;
/// # use reckon::eval;
///
/// assert_eq!(eval("45 - 2*3", &HashMap::new()), Ok(39.0));
///
/// let mut context: HashMap<String, f64> = HashMap::new();
/// context.insert("a".into(), -5.0);
/// context.insert("unused".into(), 1.0);
/// assert_eq!(eval("3 * abs(a)", &context), Ok(15.0));
/// ```
pub fn eval(input: &str, context: &HashMap<String, f64>) -> Result<f64, Error> {
    let mut formula = Formula::with_standard_functions();
    formula.parse(input)?;
    let bindings: Vec<(String, f64)> = formula
        .variables()
        .iter()
        .filter_map(|variable| {
            context
                .get(variable.name())
                .map(|&value| (variable.name().to_owned(), value))
        })
        .collect();
    // a missing variable is reported by `evaluate`
    formula.bind(bindings)?;
    formula.evaluate()
}

/// A formula engine: a function registry, and the last successfully parsed
/// formula with its variables.
///
/// # Examples
/// ```
/// # use reckon::Formula;
/// let mut formula = Formula::new();
/// formula.register_function("LEFT", 2, |args| args[0]);
/// formula.register_function("RIGHT", 2, |args| args[1]);
///
/// formula.parse("RIGHT(LEFT(1, 2), x) * 2").unwrap();
/// assert_eq!(formula.variables()[0].name(), "x");
///
/// formula.set_variables([("x", 1.5)]).unwrap();
/// assert_eq!(formula.evaluate(), Ok(3.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Formula {
    functions: FunctionRegistry,
    tokens: Vec<String>,
    variables: VariableTable,
    root: Option<Node>,
}

impl Formula {
    /// Create an engine without any function
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the functions of
    /// [`STANDARD_FUNCTIONS`](crate::STANDARD_FUNCTIONS) registered.
    ///
    /// ```
    /// # use reckon::Formula;
    /// let mut formula = Formula::with_standard_functions();
    /// formula.parse("max(sqrt(16), hypot(3, 4))").unwrap();
    /// assert_eq!(formula.evaluate(), Ok(5.0));
    /// ```
    pub fn with_standard_functions() -> Self {
        let mut formula = Self::new();
        for (name, standard) in STANDARD_FUNCTIONS.iter() {
            formula.functions.register(standard.to_function(name));
        }
        formula
    }

    /// Register a function taking exactly `arity` arguments. A function
    /// registered under the same name before is replaced.
    pub fn register_function<F>(&mut self, name: &str, arity: usize, callable: F)
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        debug!("registering function {} with {} argument(s)", name, arity);
        self.functions.register(Function::new(name, arity, callable));
    }

    /// Parse and validate `input`, replacing the previous formula.
    ///
    /// On failure the engine holds no formula and no variables, the tokens
    /// of `input` stay available through [`Formula::tokens`].
    ///
    /// ```
    /// # use reckon::{Formula, Error};
    /// let mut formula = Formula::new();
    /// assert!(formula.parse("1+3*(5-2)").is_ok());
    /// assert!(matches!(formula.parse("(1))"), Err(Error::TrailingSymbols(_))));
    /// assert_eq!(formula.evaluate(), Err(Error::NotParsed));
    /// ```
    pub fn parse(&mut self, input: &str) -> Result<(), Error> {
        self.root = None;
        self.variables.clear();
        self.tokens = tokenize(input);
        debug!("parsing {:?} ({} tokens)", input, self.tokens.len());

        match self.build() {
            Ok(root) => {
                debug!("parsed {:?} with {} variable(s)", input, self.variables.len());
                self.root = Some(root);
                Ok(())
            }
            Err(error) => {
                debug!("failed to parse {:?}: {}", input, error);
                self.variables.clear();
                Err(error)
            }
        }
    }

    fn build(&mut self) -> Result<Node, Error> {
        let mut parser = Parser::new(&self.tokens, &self.functions, &mut self.variables);
        let root = parser.parse_expression()?;
        let consumed = parser.at_end();
        let cursor = parser.cursor();

        root.check(&self.variables, &self.tokens)?;
        if !consumed {
            return Err(Error::TrailingSymbols(locate(&self.tokens, Some(cursor))));
        }
        Ok(root)
    }

    /// Bind values to variables of the current formula.
    ///
    /// Every name must be a variable of the formula, otherwise nothing is
    /// bound. Values bound by previous calls are kept, and the call fails if
    /// some variable is still without value afterwards.
    pub fn set_variables<I, K>(&mut self, values: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        self.bind(values)?;
        match self.variables.first_unbound() {
            Some(variable) => Err(Error::Unassigned(variable.name().to_owned())),
            None => Ok(()),
        }
    }

    /// Bind `values` if every name is a variable of the formula, without
    /// requiring all variables to have a value afterwards
    fn bind<I, K>(&mut self, values: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut bindings = Vec::new();
        for (name, value) in values {
            let name = name.as_ref();
            match self.variables.id(name) {
                Some(id) => bindings.push((id, value)),
                None => return Err(Error::UnknownVariable(name.to_owned())),
            }
        }

        debug!("binding {} variable(s)", bindings.len());
        for (id, value) in bindings {
            if let Some(variable) = self.variables.get_mut(id) {
                variable.set_value(value);
            }
        }
        Ok(())
    }

    /// Evaluate the current formula with the bound variables
    pub fn evaluate(&self) -> Result<f64, Error> {
        let root = self.root.as_ref().ok_or(Error::NotParsed)?;
        if let Some(variable) = self.variables.first_unbound() {
            return Err(Error::Unset(variable.name().to_owned()));
        }
        let value = root.evaluate(&self.variables);
        debug!("evaluated to {}", value);
        Ok(value)
    }

    /// Variables of the current formula, in order of first use
    pub fn variables(&self) -> &[Variable] {
        self.variables.as_slice()
    }

    /// Tokens of the last parsed input
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Functions available to formulas parsed from now on
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Root of the current formula tree
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Indented dump of the current formula tree
    pub fn tree(&self) -> Option<TreeDisplay<'_>> {
        self.root
            .as_ref()
            .map(|root| root.display(&self.variables))
    }
}
