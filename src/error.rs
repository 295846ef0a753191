use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Where in the token sequence an error was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Index of the offending token, `None` for nodes without a source token
    pub index: Option<usize>,
    /// Rendered window of tokens around the offending one
    pub context: String,
}

impl Location {
    pub(crate) fn new(index: Option<usize>, context: String) -> Self {
        Self { index, context }
    }
}

impl Display for Location {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match self.index {
            Some(index) => write!(fmt, "token {} in `{}`", index, self.context),
            None => write!(fmt, "unknown position"),
        }
    }
}

/// Grammar production in which an unexpected symbol was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Production {
    /// Sums and differences of terms
    Expression,
    /// Products and quotients of factors
    Term,
    /// Numbers, variables, calls and parenthesized expressions
    Factor,
}

impl Display for Production {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        let name = match self {
            Self::Expression => "expression",
            Self::Term => "term",
            Self::Factor => "factor",
        };
        fmt.write_str(name)
    }
}

/// Broad classes of failures, used by hosts that only care about the stage
/// that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The text could not be turned into a tree
    Lexical,
    /// The tree was built but failed validation
    Structural,
    /// Variable binding problems
    Binding,
    /// The engine is not in a state allowing the operation
    State,
}

/// Error type for the reckon crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input ended while a construct was still open
    #[error("ParseError: unexpected end of input at {0}")]
    UnexpectedEnd(Location),
    /// A token that cannot appear at this point of the grammar
    #[error("ParseError: unexpected symbol `{symbol}` in {production} at {at}")]
    UnexpectedSymbol {
        /// The offending token
        symbol: String,
        /// Production being parsed
        production: Production,
        /// Where
        at: Location,
    },
    /// A specific punctuation symbol was required
    #[error("ParseError: expected `{expected}` at {at}")]
    Expected {
        /// The required symbol
        expected: char,
        /// Where
        at: Location,
    },
    /// Call syntax used with a name that is not registered
    #[error("ParseError: unsupported function `{name}` at {at}")]
    UnsupportedFunction {
        /// Name used in call position
        name: String,
        /// Where
        at: Location,
    },
    /// Parentheses or calls nested deeper than the parser accepts
    #[error("ParseError: nesting deeper than {limit} levels at {at}")]
    TooDeep {
        /// Deepest accepted nesting
        limit: usize,
        /// First token past the limit
        at: Location,
    },
    /// Tokens left over after a complete expression
    #[error("ParseError: unparsed trailing symbols at {0}")]
    TrailingSymbols(Location),
    /// Binary operation with an operator outside of `+ - * /`
    #[error("CheckError: unsupported operator `{op}` at {at}")]
    UnknownOperator {
        /// The operator found in the tree
        op: char,
        /// Where
        at: Location,
    },
    /// Function called with the wrong number of arguments
    #[error("CheckError: function `{name}` expects {expected} argument(s), found {found} at {at}")]
    ArgumentCount {
        /// Name of the function
        name: String,
        /// Arity of the function
        expected: usize,
        /// Number of arguments in the call
        found: usize,
        /// Where
        at: Location,
    },
    /// Number node holding `NaN`
    #[error("CheckError: number literal is not a number at {0}")]
    NotANumber(Location),
    /// Variable node pointing outside of the variable table
    #[error("CheckError: variable reference without binding at {0}")]
    DanglingVariable(Location),
    /// Binding a name the formula does not use
    #[error("NameError: unknown variable '{0}'")]
    UnknownVariable(String),
    /// Binding finished with some variables still without value
    #[error("NameError: variable '{0}' not yet assigned")]
    Unassigned(String),
    /// Evaluation requested with some variables still without value
    #[error("NameError: variable '{0}' not set")]
    Unset(String),
    /// Evaluation requested before a successful parse
    #[error("StateError: no successfully parsed formula")]
    NotParsed,
}

impl Error {
    /// Token index the error is anchored to, if any
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.location().and_then(|location| location.index)
    }

    /// Location of the error in the token sequence, if any
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::UnexpectedEnd(at)
            | Self::TrailingSymbols(at)
            | Self::NotANumber(at)
            | Self::DanglingVariable(at)
            | Self::UnexpectedSymbol { at, .. }
            | Self::Expected { at, .. }
            | Self::UnsupportedFunction { at, .. }
            | Self::TooDeep { at, .. }
            | Self::UnknownOperator { at, .. }
            | Self::ArgumentCount { at, .. } => Some(at),
            Self::UnknownVariable(_) | Self::Unassigned(_) | Self::Unset(_) | Self::NotParsed => {
                None
            }
        }
    }

    /// Stage of the pipeline that produced this error
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnexpectedEnd(_)
            | Self::UnexpectedSymbol { .. }
            | Self::Expected { .. }
            | Self::UnsupportedFunction { .. }
            | Self::TooDeep { .. } => ErrorCategory::Lexical,
            Self::TrailingSymbols(_)
            | Self::UnknownOperator { .. }
            | Self::ArgumentCount { .. }
            | Self::NotANumber(_)
            | Self::DanglingVariable(_) => ErrorCategory::Structural,
            Self::UnknownVariable(_) | Self::Unassigned(_) | Self::Unset(_) => {
                ErrorCategory::Binding
            }
            Self::NotParsed => ErrorCategory::State,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let error = Error::Expected {
            expected: ')',
            at: Location::new(Some(3), "(1+>>2<<".into()),
        };
        assert_eq!(error.to_string(), "ParseError: expected `)` at token 3 in `(1+>>2<<`");
        assert_eq!(error.position(), Some(3));
        assert_eq!(error.category(), ErrorCategory::Lexical);

        let error = Error::Unset("x".into());
        assert_eq!(error.to_string(), "NameError: variable 'x' not set");
        assert_eq!(error.position(), None);
        assert_eq!(error.category(), ErrorCategory::Binding);

        assert_eq!(Error::NotParsed.category(), ErrorCategory::State);
        let error = Error::TooDeep {
            limit: 2,
            at: Location::new(Some(2), "((>>(<<1".into()),
        };
        assert_eq!(
            error.to_string(),
            "ParseError: nesting deeper than 2 levels at token 2 in `((>>(<<1`"
        );
        assert_eq!(error.category(), ErrorCategory::Lexical);
        assert_eq!(
            Error::NotANumber(Location::new(None, String::new())).to_string(),
            "CheckError: number literal is not a number at unknown position"
        );
    }
}
