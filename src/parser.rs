//! Recursive descent parser turning tokens into a [`Node`] tree.
//!
//! ```text
//! expression   := term (('+'|'-') term)*
//! term         := factor (('*'|'/') factor)*
//! factor       := number | '(' expression ')' | call | identifier
//!               | ('+'|'-')        -- not consumed, stands for an implicit 0
//! call         := name '(' (expression (',' expression)*)? ')'
//! ```
//!
//! Binary operators are folded iteratively so they group to the left. Each
//! production leaves the cursor on the first token it did not consume.
//! Parentheses and calls recurse, and are limited to [`MAX_DEPTH`] levels.

use crate::ast::Node;
use crate::error::{Error, Location, Production};
use crate::function::FunctionRegistry;
use crate::token::{is_number, Op};
use crate::util::{locate, MAX_DEPTH};
use crate::variable::VariableTable;
use log::trace;
use std::sync::Arc;

/// Parsing state: the token sequence, a cursor into it, and the tables
/// names are resolved against.
pub struct Parser<'a> {
    tokens: &'a [String],
    cursor: usize,
    functions: &'a FunctionRegistry,
    variables: &'a mut VariableTable,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser at the start of `tokens`. Variables are interned in
    /// `variables`, call names resolved against `functions`.
    pub fn new(
        tokens: &'a [String],
        functions: &'a FunctionRegistry,
        variables: &'a mut VariableTable,
    ) -> Self {
        Parser {
            tokens,
            cursor: 0,
            functions,
            variables,
            depth: 0,
        }
    }

    /// Index of the first unconsumed token
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check if every token was consumed
    pub fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn current(&self) -> Option<&'a str> {
        self.tokens.get(self.cursor).map(String::as_str)
    }

    fn advance(&mut self) {
        self.cursor += 1;
    }

    fn here(&self) -> Location {
        locate(self.tokens, Some(self.cursor))
    }

    fn unexpected(&self, symbol: &str, production: Production) -> Error {
        Error::UnexpectedSymbol {
            symbol: symbol.to_owned(),
            production,
            at: self.here(),
        }
    }

    /// Open one nesting level, anchored on the current token
    fn enter(&mut self) -> Result<(), Error> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::TooDeep {
                limit: MAX_DEPTH,
                at: self.here(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Consume `expected` or fail with an error anchored on the current token
    fn expect(&mut self, expected: char) -> Result<(), Error> {
        let mut buffer = [0; 4];
        let symbol: &str = expected.encode_utf8(&mut buffer);
        if self.current() == Some(symbol) {
            self.advance();
            Ok(())
        } else {
            Err(Error::Expected {
                expected,
                at: self.here(),
            })
        }
    }

    /// Current token as an operator of the given level, if it is one
    fn operator(&self, multiplicative: bool) -> Option<Op> {
        self.current()
            .and_then(Op::from_token)
            .filter(|op| op.is_multiplicative() == multiplicative)
    }

    /// expression := term (('+'|'-') term)*
    ///
    /// The expression must be followed by the end of input, `)` or `,`.
    pub fn parse_expression(&mut self) -> Result<Node, Error> {
        trace!("expression at token {}", self.cursor);
        let mut node = self.parse_term()?;
        while let Some(op) = self.operator(false) {
            let position = self.cursor;
            self.advance();
            let right = self.parse_term()?;
            node = Node::BinaryOp {
                left: Box::new(node),
                right: Box::new(right),
                op: op.symbol(),
                position: Some(position),
            };
        }

        match self.current() {
            None | Some(")") | Some(",") => Ok(node),
            Some(symbol) => Err(self.unexpected(symbol, Production::Expression)),
        }
    }

    /// term := factor (('*'|'/') factor)*
    ///
    /// The term must be followed by the end of input, `)`, `,`, `+` or `-`.
    pub fn parse_term(&mut self) -> Result<Node, Error> {
        trace!("term at token {}", self.cursor);
        let mut node = self.parse_factor()?;
        while let Some(op) = self.operator(true) {
            let position = self.cursor;
            self.advance();
            let right = self.parse_factor()?;
            node = Node::BinaryOp {
                left: Box::new(node),
                right: Box::new(right),
                op: op.symbol(),
                position: Some(position),
            };
        }

        match self.current() {
            None | Some(")") | Some(",") | Some("+") | Some("-") => Ok(node),
            Some(symbol) => Err(self.unexpected(symbol, Production::Term)),
        }
    }

    /// factor := number | '(' expression ')' | call | identifier | sign
    pub fn parse_factor(&mut self) -> Result<Node, Error> {
        trace!("factor at token {}", self.cursor);
        let token = match self.current() {
            Some(token) => token,
            None => return Err(Error::UnexpectedEnd(self.here())),
        };
        let position = Some(self.cursor);

        match token {
            "," | "*" | "/" | ")" => Err(self.unexpected(token, Production::Factor)),
            // a leading sign reads as `0 +` / `0 -`, the sign itself is left
            // for the enclosing expression
            "+" | "-" => Ok(Node::Number {
                value: 0.0,
                position: None,
            }),
            "(" => {
                self.enter()?;
                self.advance();
                let node = self.parse_expression()?;
                self.expect(')')?;
                self.leave();
                Ok(node)
            }
            _ if is_number(token) => {
                self.advance();
                Ok(Node::Number {
                    value: token.parse().unwrap_or(f64::NAN),
                    position,
                })
            }
            _ if self.functions.contains(token) => self.parse_call(),
            _ if self.tokens.get(self.cursor + 1).map(String::as_str) == Some("(") => {
                Err(Error::UnsupportedFunction {
                    name: token.to_owned(),
                    at: self.here(),
                })
            }
            _ => {
                self.advance();
                Ok(Node::Variable {
                    id: self.variables.intern(token),
                    position,
                })
            }
        }
    }

    /// call := name '(' (expression (',' expression)*)? ')'
    ///
    /// The number of arguments is not checked here, see [`Node::check`].
    pub fn parse_call(&mut self) -> Result<Node, Error> {
        trace!("call at token {}", self.cursor);
        let position = self.cursor;
        let name = self
            .current()
            .ok_or_else(|| Error::UnexpectedEnd(self.here()))?;
        let function = match self.functions.get(name) {
            Some(function) => Arc::clone(function),
            None => {
                return Err(Error::UnsupportedFunction {
                    name: name.to_owned(),
                    at: self.here(),
                })
            }
        };
        self.enter()?;
        self.advance();
        self.expect('(')?;

        let mut args = Vec::new();
        if self.current() == Some(")") {
            self.advance();
        } else {
            loop {
                args.push(self.parse_expression()?);
                match self.current() {
                    Some(",") => self.advance(),
                    Some(")") => {
                        self.advance();
                        break;
                    }
                    _ => {
                        return Err(Error::Expected {
                            expected: ')',
                            at: self.here(),
                        })
                    }
                }
            }
        }
        self.leave();

        Ok(Node::Call {
            function,
            args,
            position: Some(position),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Parser;
    use crate::ast::Node;
    use crate::error::{Error, Production};
    use crate::function::{Function, FunctionRegistry};
    use crate::lexer::tokenize;
    use crate::util::MAX_DEPTH;
    use crate::variable::VariableTable;
    use test_case::test_case;

    fn registry() -> FunctionRegistry {
        let mut functions = FunctionRegistry::new();
        functions.register(Function::new("LEFT", 2, |args| args[0]));
        functions.register(Function::new("RIGHT", 2, |args| args[1]));
        functions.register(Function::new("PI", 0, |_| std::f64::consts::PI));
        functions
    }

    /// Parse a whole expression, returning the tree, the variables and
    /// whether all tokens were consumed
    fn parse(input: &str) -> Result<(Node, VariableTable, bool), Error> {
        let tokens = tokenize(input);
        let functions = registry();
        let mut variables = VariableTable::new();
        let mut parser = Parser::new(&tokens, &functions, &mut variables);
        let node = parser.parse_expression()?;
        let at_end = parser.at_end();
        Ok((node, variables, at_end))
    }

    fn evaluate(input: &str) -> f64 {
        let (node, variables, at_end) = parse(input).unwrap();
        assert!(at_end);
        node.evaluate(&variables)
    }

    #[test_case("8-3-2" => 3.0 ; "subtraction is left associative")]
    #[test_case("16/4/2" => 2.0 ; "division is left associative")]
    #[test_case("1+3*(5-2)" => 10.0 ; "precedence")]
    #[test_case("-5+2" => -3.0 ; "leading minus")]
    #[test_case("+5" => 5.0 ; "leading plus")]
    #[test_case("((2))" => 2.0 ; "nested parenthesis")]
    #[test_case("2*-3" => -3.0 ; "sign after operator reads as a zero factor")]
    #[test_case("1.5*4" => 6.0 ; "decimal")]
    #[test_case("RIGHT(LEFT(1,2), RIGHT(4,3))" => 3.0 ; "nested calls")]
    #[test_case("PI()*0" => 0.0 ; "empty argument list")]
    fn values(input: &str) -> f64 {
        evaluate(input)
    }

    #[test]
    fn left_fold() {
        let (node, _, _) = parse("8-3-2").unwrap();
        match &node {
            Node::BinaryOp {
                left, op, position, ..
            } => {
                assert_eq!(*op, '-');
                assert_eq!(*position, Some(3));
                assert!(matches!(**left, Node::BinaryOp { op: '-', position: Some(1), .. }));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn implicit_zero() {
        let (node, variables, _) = parse("-x").unwrap();
        let x = variables.id("x").unwrap();
        let expected = Node::BinaryOp {
            left: Box::new(Node::Number {
                value: 0.0,
                position: None,
            }),
            right: Box::new(Node::Variable {
                id: x,
                position: Some(1),
            }),
            op: '-',
            position: Some(0),
        };
        assert_eq!(node, expected);
    }

    #[test]
    fn variables_are_shared() {
        let (_, variables, _) = parse("x*y+x-LEFT(y,z)").unwrap();
        let names: Vec<&str> = variables.iter().map(|v| v.name()).collect();
        assert_eq!(names, ["x", "y", "z"]);
    }

    #[test]
    fn trailing_tokens_are_left() {
        let (_, _, at_end) = parse("1)").unwrap();
        assert!(!at_end);
        let (_, _, at_end) = parse("(1))").unwrap();
        assert!(!at_end);
    }

    #[test]
    fn errors() {
        assert!(matches!(parse("1+3*(5-2)-"), Err(Error::UnexpectedEnd(at)) if at.index == Some(10)));
        assert!(matches!(parse(""), Err(Error::UnexpectedEnd(at)) if at.index == Some(0)));
        assert!(matches!(parse("(1+2"), Err(Error::Expected { expected: ')', .. })));
        assert!(matches!(parse("LEFT(1,2"), Err(Error::Expected { expected: ')', .. })));
        assert!(matches!(parse("LEFT+1"), Err(Error::Expected { expected: '(', .. })));
        assert!(matches!(
            parse("MAX(1,2)"),
            Err(Error::UnsupportedFunction { ref name, .. }) if name == "MAX"
        ));
        assert!(matches!(
            parse("1*)"),
            Err(Error::UnexpectedSymbol { production: Production::Factor, .. })
        ));
        assert!(matches!(
            parse("1.2.3"),
            Err(Error::UnexpectedSymbol { production: Production::Term, ref symbol, .. }) if symbol == ".3"
        ));
        assert!(matches!(
            parse("x (1)"),
            Err(Error::UnsupportedFunction { .. })
        ));
    }

    #[test]
    fn unexpected_symbol_after_term() {
        // spaces do not split tokens
        assert_eq!(tokenize("(1 2 3)4"), ["(", "123", ")", "4"]);
        match parse("(1 2 3)4") {
            Err(Error::UnexpectedSymbol {
                symbol,
                production,
                at,
            }) => {
                assert_eq!(symbol, "4");
                assert_eq!(production, Production::Term);
                assert_eq!(at.index, Some(3));
                assert_eq!(at.context, "(123)>>4<<");
            }
            other => panic!("unexpected result {:?}", other.map(|(node, ..)| node)),
        }
    }

    #[test]
    fn nesting_depth() {
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(evaluate(&nested(MAX_DEPTH)), 1.0);

        match parse(&nested(50_000)) {
            Err(Error::TooDeep { limit, at }) => {
                assert_eq!(limit, MAX_DEPTH);
                assert_eq!(at.index, Some(MAX_DEPTH));
            }
            other => panic!("unexpected result {:?}", other.map(|(node, ..)| node)),
        }

        let calls = format!("{}1{}", "LEFT(".repeat(MAX_DEPTH + 1), ",2)".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse(&calls), Err(Error::TooDeep { .. })));
        let calls = format!("{}1{}", "LEFT(".repeat(MAX_DEPTH), ",2)".repeat(MAX_DEPTH));
        assert_eq!(evaluate(&calls), 1.0);

        // levels are released when a group closes
        let siblings = vec![nested(MAX_DEPTH); 3].join("+");
        assert_eq!(evaluate(&siblings), 3.0);
    }

    #[test]
    fn arity_is_not_checked_while_parsing() {
        let (node, variables, at_end) = parse("LEFT(1)").unwrap();
        assert!(at_end);
        assert!(matches!(
            node.check(&variables, &tokenize("LEFT(1)")),
            Err(Error::ArgumentCount { expected: 2, found: 1, .. })
        ));
    }
}
