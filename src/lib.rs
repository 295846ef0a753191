#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::non_ascii_literal
)]

//! Reckon, an embeddable formula engine.
//!
//! A host registers the functions it wants to offer, parses a formula once,
//! binds values to the free variables the formula uses, and evaluates it as
//! many times as needed. The easiest way to use this crate is with the
//! [`eval`](fn.eval.html) function:
//!
//! ```
//! use std::collections::HashMap;
//! assert_eq!(reckon::eval("3 + 5 * 2", &HashMap::new()), Ok(13.0));
//! ```
//!
//! The [`Formula`](struct.Formula.html) type separates parsing from
//! evaluation, and gives access to the variables of the formula:
//!
//! ```
//! use reckon::Formula;
//!
//! let mut formula = Formula::new();
//! formula.register_function("ROUND", 1, |args| args[0].round());
//! formula.parse("-100 - 2 + ROUND(x) - (y + z)").unwrap();
//!
//! let names: Vec<&str> = formula.variables().iter().map(|v| v.name()).collect();
//! assert_eq!(names, ["x", "y", "z"]);
//!
//! formula.set_variables([("x", 1.4), ("y", 2.8), ("z", 1.2)]).unwrap();
//! assert_eq!(formula.evaluate(), Ok(-105.0));
//!
//! // bindings are kept until the next parse
//! formula.set_variables([("x", 3.0)]).unwrap();
//! assert_eq!(formula.evaluate(), Ok(-103.0));
//! ```
//!
//! Errors point at the offending token:
//!
//! ```
//! use reckon::Formula;
//!
//! let mut formula = Formula::new();
//! let error = formula.parse("1 + (2 * 3").unwrap_err();
//! assert_eq!(error.position(), Some(6));
//! assert_eq!(
//!     error.to_string(),
//!     "ParseError: expected `)` at token 6 in `1+(2*3>><end><<`"
//! );
//! ```
//!
//! # Language definition
//!
//! A formula can contain the following elements:
//!
//! - number literals: `12`, `0.5`, `.5`, `3.`. There is no exponent
//!   notation;
//! - left and right parenthesis;
//! - binary operators `+`, `-`, `*` and `/`, grouping to the left, with `*`
//!   and `/` binding tighter. A `+` or `-` where an operand is expected reads
//!   as if preceded by `0`, so `-x` is `0 - x`;
//! - variables: any run of characters that is not a number and does not
//!   contain `+ - * / ( ) ,` or whitespace, for instance `x`, `rate_2` or
//!   `a.b[1]`;
//! - calls of registered functions: `LEFT(a, b)`, `PI()`. Arguments are
//!   counted against the arity given at registration.
//!
//! Whitespace is ignored and does not separate tokens: `1 2` is `12`.
//! Parentheses and calls nest at most [`MAX_DEPTH`](constant.MAX_DEPTH.html)
//! levels deep.
//! Division by zero follows the floating point rules and produces infinities
//! or `NaN`.
//!
//! No function is available by default, see
//! [`Formula::with_standard_functions`](struct.Formula.html#method.with_standard_functions)
//! for a set of usual mathematical functions.
//!
//! # Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: parsing,
//! binding and evaluation at the `debug` level, tokens and grammar rules at
//! the `trace` level.

#[macro_use]
extern crate lazy_static;

mod ast;
mod error;
mod formula;
mod function;
mod lexer;
mod parser;
mod token;
mod util;
mod variable;

pub use ast::{Node, TreeDisplay};
pub use error::{Error, ErrorCategory, Location, Production};
pub use formula::{eval, Formula};
pub use function::{Function, FunctionRegistry};
pub use lexer::{is_identifier, tokenize, Lexer};
pub use parser::Parser;
pub use token::Op;
pub use util::{Standard, CONTEXT_RADIUS, MAX_DEPTH, STANDARD_FUNCTIONS};
pub use variable::{VarId, Variable, VariableTable};
