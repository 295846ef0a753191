/// Single character symbols. Every other token is a number literal or an
/// identifier.
pub const SYMBOLS: [char; 7] = ['+', '-', '*', '/', '(', ')', ','];

/// Check if `token` is exactly one of the reserved symbols
pub fn is_symbol(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => SYMBOLS.contains(&c),
        _ => false,
    }
}

/// Check if `token` is a decimal literal: ASCII digits with at most one `.`
/// and at least one digit.
pub fn is_number(token: &str) -> bool {
    let mut digits = 0;
    let mut dots = 0;
    for c in token.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// Check if `token` is a decimal literal without decimal point
pub fn is_integer(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Allowed operators in the algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl Op {
    /// Get the operator for `symbol`, if it is one
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }

    /// Get the operator written as the token `token`
    pub fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_symbol(c),
            _ => None,
        }
    }

    /// Character spelling the operator
    pub fn symbol(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    /// Check if the operator binds at the term level (`*` and `/`)
    pub fn is_multiplicative(self) -> bool {
        match self {
            Self::Mul | Self::Div => true,
            Self::Plus | Self::Minus => false,
        }
    }

    /// Apply the operator with IEEE semantics, division by zero gives an
    /// infinity or `NaN`.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Plus => left + right,
            Self::Minus => left - right,
            Self::Mul => left * right,
            Self::Div => left / right,
        }
    }
}
