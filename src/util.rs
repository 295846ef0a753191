use crate::error::Location;
use crate::function::Function;
use hashbrown::HashMap;

/// Number of tokens shown on each side of the offending one in error
/// messages
pub const CONTEXT_RADIUS: usize = 10;

/// Deepest nesting of parentheses and calls the parser accepts
pub const MAX_DEPTH: usize = 256;

/// Native implementation of a standard function
#[derive(Debug, Clone, Copy)]
pub enum Standard {
    /// Function of one argument
    Unary(fn(f64) -> f64),
    /// Function of two arguments
    Binary(fn(f64, f64) -> f64),
}

impl Standard {
    /// Number of arguments of the native implementation
    pub fn arity(self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
        }
    }

    /// Wrap the native implementation as a registrable [`Function`]. Called
    /// with fewer arguments than its arity, the function returns `NaN`.
    pub fn to_function(self, name: &str) -> Function {
        match self {
            Self::Unary(func) => Function::new(name, 1, move |args: &[f64]| {
                args.first().map_or(f64::NAN, |&x| func(x))
            }),
            Self::Binary(func) => Function::new(name, 2, move |args: &[f64]| match *args {
                [x, y, ..] => func(x, y),
                _ => f64::NAN,
            }),
        }
    }
}

lazy_static! {
    /// Functions registered by [`Formula::with_standard_functions`](crate::Formula::with_standard_functions)
    pub static ref STANDARD_FUNCTIONS: HashMap<&'static str, Standard> = {
        let mut map = HashMap::<&'static str, Standard>::new();
        map.insert("sqrt", Standard::Unary(f64::sqrt));
        map.insert("cbrt", Standard::Unary(f64::cbrt));
        map.insert("sin", Standard::Unary(f64::sin));
        map.insert("cos", Standard::Unary(f64::cos));
        map.insert("tan", Standard::Unary(f64::tan));
        map.insert("asin", Standard::Unary(f64::asin));
        map.insert("acos", Standard::Unary(f64::acos));
        map.insert("atan", Standard::Unary(f64::atan));
        map.insert("sinh", Standard::Unary(f64::sinh));
        map.insert("cosh", Standard::Unary(f64::cosh));
        map.insert("tanh", Standard::Unary(f64::tanh));
        map.insert("asinh", Standard::Unary(f64::asinh));
        map.insert("acosh", Standard::Unary(f64::acosh));
        map.insert("atanh", Standard::Unary(f64::atanh));
        map.insert("floor", Standard::Unary(f64::floor));
        map.insert("ceil", Standard::Unary(f64::ceil));
        map.insert("round", Standard::Unary(f64::round));
        map.insert("abs", Standard::Unary(f64::abs));
        map.insert("exp", Standard::Unary(f64::exp));
        map.insert("ln", Standard::Unary(f64::ln));
        map.insert("log2", Standard::Unary(f64::log2));
        map.insert("log10", Standard::Unary(f64::log10));
        map.insert("atan2", Standard::Binary(libm::atan2));
        map.insert("hypot", Standard::Binary(libm::hypot));
        map.insert("fmod", Standard::Binary(libm::fmod));
        map.insert("min", Standard::Binary(libm::fmin));
        map.insert("max", Standard::Binary(libm::fmax));
        map.shrink_to_fit();
        map
    };
}

/// Render the tokens around `index`, with the token at `index` wrapped in
/// `>>` and `<<`. An index past the last token renders as `>><end><<`.
pub fn render_context(tokens: &[String], index: usize) -> String {
    let start = index.saturating_sub(CONTEXT_RADIUS);
    let end = usize::min(index.saturating_add(CONTEXT_RADIUS + 1), tokens.len());
    let mut context = String::new();
    for (i, token) in tokens.iter().enumerate().take(end).skip(start) {
        if i == index {
            context.push_str(">>");
            context.push_str(token);
            context.push_str("<<");
        } else {
            context.push_str(token);
        }
    }
    if index >= tokens.len() {
        context.push_str(">><end><<");
    }
    context
}

/// Build the [`Location`] of an error anchored at `index`
pub fn locate(tokens: &[String], index: Option<usize>) -> Location {
    let context = index.map_or_else(String::new, |index| render_context(tokens, index));
    Location::new(index, context)
}
