use crate::error::Error;
use crate::function::Function;
use crate::token::Op;
use crate::util::locate;
use crate::variable::{VarId, Variable, VariableTable};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Ast nodes for the formulas.
///
/// Every node records the index of the token it was built from, used only to
/// anchor errors. Implicit zeros inserted for a leading sign have no token.
///
/// Sums of many terms fold into deep trees, so every walk over a tree
/// (evaluation, checks, comparison, cloning, formatting and dropping) keeps
/// its own work stack instead of recursing.
pub enum Node {
    /// A constant value
    Number {
        /// The constant
        value: f64,
        /// Source token
        position: Option<usize>,
    },
    /// A variable, resolved through the formula's variable table
    Variable {
        /// Entry in the variable table
        id: VarId,
        /// Source token
        position: Option<usize>,
    },
    /// <left> op <right>
    BinaryOp {
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
        /// One of `+ - * /` once checked
        op: char,
        /// Operator token
        position: Option<usize>,
    },
    /// func(<args>...)
    Call {
        /// The function, as registered when the tree was parsed
        function: Arc<Function>,
        /// Arguments, in source order
        args: Vec<Node>,
        /// Function name token
        position: Option<usize>,
    },
}

/// Step of a post-order walk
enum Step<'a> {
    Enter(&'a Node),
    Exit(&'a Node),
}

impl Node {
    fn zero() -> Self {
        Self::Number {
            value: 0.0,
            position: None,
        }
    }

    /// Number of direct children
    fn arity(&self) -> usize {
        match self {
            Self::Number { .. } | Self::Variable { .. } => 0,
            Self::BinaryOp { .. } => 2,
            Self::Call { args, .. } => args.len(),
        }
    }

    /// Push the direct children on `stack`, last child first so they pop in
    /// source order
    fn push_children<'a>(&'a self, stack: &mut Vec<&'a Node>) {
        match self {
            Self::Number { .. } | Self::Variable { .. } => {}
            Self::BinaryOp { left, right, .. } => {
                stack.push(right);
                stack.push(left);
            }
            Self::Call { args, .. } => stack.extend(args.iter().rev()),
        }
    }

    /// Move the direct children out to `stack`, leaving leaves behind
    fn take_children(&mut self, stack: &mut Vec<Node>) {
        match self {
            Self::Number { .. } | Self::Variable { .. } => {}
            Self::BinaryOp { left, right, .. } => {
                stack.push(std::mem::replace(left.as_mut(), Self::zero()));
                stack.push(std::mem::replace(right.as_mut(), Self::zero()));
            }
            Self::Call { args, .. } => stack.append(args),
        }
    }

    /// Combine the tree bottom up: `combine` receives every node along with
    /// the results of its children, in source order.
    fn fold<T>(&self, mut combine: impl FnMut(&Node, Vec<T>) -> T) -> T {
        let mut steps = vec![Step::Enter(self)];
        let mut children = Vec::new();
        let mut results = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Enter(node) => {
                    steps.push(Step::Exit(node));
                    node.push_children(&mut children);
                    steps.extend(children.drain(..).map(Step::Enter));
                }
                Step::Exit(node) => {
                    let start = results.len().saturating_sub(node.arity());
                    let args = results.split_off(start);
                    results.push(combine(node, args));
                }
            }
        }
        results.pop().expect("Internal bug: empty result stack")
    }

    /// Token index this node was built from
    pub fn position(&self) -> Option<usize> {
        match *self {
            Self::Number { position, .. }
            | Self::Variable { position, .. }
            | Self::BinaryOp { position, .. }
            | Self::Call { position, .. } => position,
        }
    }

    /// If the node is a constant, get `Some(constant)`. Else, get `None`
    pub fn value(&self) -> Option<f64> {
        if let Self::Number { value, .. } = *self {
            Some(value)
        } else {
            None
        }
    }

    /// Compute the value of the tree.
    ///
    /// The tree is expected to have passed [`Node::check`] and its variables
    /// to be bound, as [`Formula`](crate::Formula) does. On an unchecked tree,
    /// an operator outside of `+ - * /` gives `NaN` and an unbound or
    /// dangling variable reads as `0.0`.
    pub fn evaluate(&self, variables: &VariableTable) -> f64 {
        self.fold(|node, args: Vec<f64>| match *node {
            Self::Number { value, .. } => value,
            Self::Variable { id, .. } => variables
                .get(id)
                .and_then(Variable::value)
                .unwrap_or_default(),
            Self::BinaryOp { op, .. } => {
                Op::from_symbol(op).map_or(f64::NAN, |op| op.apply(args[0], args[1]))
            }
            Self::Call { ref function, .. } => function.call(&args),
        })
    }

    /// Validate the tree: number literals, variable references, operators and
    /// argument counts. Nodes are checked before their children, children
    /// left to right, and the first failure is returned. `tokens` is the
    /// sequence the tree was parsed from, used to render the error context.
    pub fn check(&self, variables: &VariableTable, tokens: &[String]) -> Result<(), Error> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match *node {
                Self::Number { value, position } => {
                    if value.is_nan() {
                        return Err(Error::NotANumber(locate(tokens, position)));
                    }
                }
                Self::Variable { id, position } => {
                    if variables.get(id).is_none() {
                        return Err(Error::DanglingVariable(locate(tokens, position)));
                    }
                }
                Self::BinaryOp { op, position, .. } => {
                    if Op::from_symbol(op).is_none() {
                        return Err(Error::UnknownOperator {
                            op,
                            at: locate(tokens, position),
                        });
                    }
                }
                Self::Call {
                    ref function,
                    ref args,
                    position,
                } => {
                    if args.len() != function.arity() {
                        return Err(Error::ArgumentCount {
                            name: function.name().to_owned(),
                            expected: function.arity(),
                            found: args.len(),
                            at: locate(tokens, position),
                        });
                    }
                }
            }
            node.push_children(&mut stack);
        }
        Ok(())
    }

    /// Indented, one node per line rendering of the tree
    pub fn display<'a>(&'a self, variables: &'a VariableTable) -> TreeDisplay<'a> {
        TreeDisplay {
            node: self,
            variables,
        }
    }
}

impl PartialEq<Self> for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];
        let mut left_children = Vec::new();
        let mut right_children = Vec::new();
        while let Some((a, b)) = pairs.pop() {
            let same = match (a, b) {
                (Node::Number { value: v, .. }, Node::Number { value: v2, .. }) => {
                    v.to_le_bytes() == v2.to_le_bytes()
                }
                (Node::Variable { id, .. }, Node::Variable { id: id2, .. }) => id == id2,
                (Node::BinaryOp { op, .. }, Node::BinaryOp { op: op2, .. }) => op == op2,
                (
                    Node::Call { function, args, .. },
                    Node::Call {
                        function: function2,
                        args: args2,
                        ..
                    },
                ) => Arc::ptr_eq(function, function2) && args.len() == args2.len(),
                _ => false,
            };
            if !same {
                return false;
            }
            a.push_children(&mut left_children);
            b.push_children(&mut right_children);
            pairs.extend(left_children.drain(..).zip(right_children.drain(..)));
        }
        true
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        self.fold(|node, mut children: Vec<Node>| match *node {
            Node::Number { value, position } => Node::Number { value, position },
            Node::Variable { id, position } => Node::Variable { id, position },
            Node::BinaryOp { op, position, .. } => {
                let right = children.pop();
                let left = children.pop();
                match (left, right) {
                    (Some(left), Some(right)) => Node::BinaryOp {
                        left: Box::new(left),
                        right: Box::new(right),
                        op,
                        position,
                    },
                    _ => panic!("Internal bug: binary operation without operands"),
                }
            }
            Node::Call {
                ref function,
                position,
                ..
            } => Node::Call {
                function: Arc::clone(function),
                args: children,
                position,
            },
        })
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            node.take_children(&mut stack);
        }
    }
}

/// Piece of a `Debug` rendering
enum Piece<'a> {
    Tree(&'a Node),
    Text(&'static str),
}

impl fmt::Debug for Node {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        let mut pieces = vec![Piece::Tree(self)];
        while let Some(piece) = pieces.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    fmt.write_str(text)?;
                    continue;
                }
                Piece::Tree(node) => node,
            };
            match *node {
                Node::Number { value, position } => {
                    write!(fmt, "Number({:?}, {:?})", value, position)?;
                }
                Node::Variable { id, position } => {
                    write!(fmt, "Variable(#{}, {:?})", id, position)?;
                }
                Node::BinaryOp {
                    ref left,
                    ref right,
                    op,
                    position,
                } => {
                    write!(fmt, "BinaryOp({:?}, {:?}, ", op, position)?;
                    pieces.push(Piece::Text(")"));
                    pieces.push(Piece::Tree(right));
                    pieces.push(Piece::Text(", "));
                    pieces.push(Piece::Tree(left));
                }
                Node::Call {
                    ref function,
                    ref args,
                    position,
                } => {
                    write!(fmt, "Call({}, {:?}, [", function.name(), position)?;
                    pieces.push(Piece::Text("])"));
                    for (i, arg) in args.iter().enumerate().rev() {
                        pieces.push(Piece::Tree(arg));
                        if i > 0 {
                            pieces.push(Piece::Text(", "));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Helper returned by [`Node::display`]
pub struct TreeDisplay<'a> {
    node: &'a Node,
    variables: &'a VariableTable,
}

impl Display for TreeDisplay<'_> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        let mut stack = vec![(self.node, 0)];
        let mut children = Vec::new();
        let mut first = true;
        while let Some((node, depth)) = stack.pop() {
            if !first {
                writeln!(fmt)?;
            }
            first = false;
            write!(fmt, "{:width$}", "", width = 2 * depth)?;
            match *node {
                Node::Number { value, .. } => write!(fmt, "Number {}", value)?,
                Node::Variable { id, .. } => match self.variables.get(id) {
                    Some(variable) => match variable.value() {
                        Some(value) => write!(fmt, "Variable {} = {}", variable.name(), value)?,
                        None => write!(fmt, "Variable {} (unset)", variable.name())?,
                    },
                    None => write!(fmt, "Variable #{} (dangling)", id)?,
                },
                Node::BinaryOp { op, .. } => write!(fmt, "BinaryOp {}", op)?,
                Node::Call { ref function, .. } => {
                    write!(fmt, "Call {}/{}", function.name(), function.arity())?;
                }
            }
            node.push_children(&mut children);
            stack.extend(children.drain(..).map(|child| (child, depth + 1)));
        }
        Ok(())
    }
}
