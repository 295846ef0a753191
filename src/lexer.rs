use crate::token::{is_integer, is_number, is_symbol, SYMBOLS};
use log::trace;
use std::str::Chars;

#[must_use]
/// Check if `ident` is a valid variable or function name
///
/// # Examples
///
/// ```
/// # use reckon::is_identifier;
///
/// assert_eq!(is_identifier("__abc3"), true);
/// assert_eq!(is_identifier("x.y[2]"), true);
/// assert_eq!(is_identifier("34"), false);
/// assert_eq!(is_identifier("a-b"), false);
/// ```
pub fn is_identifier(ident: &str) -> bool {
    !ident.is_empty()
        && !is_number(ident)
        && ident
            .chars()
            .all(|c| !SYMBOLS.contains(&c) && !is_whitespace(c))
}

/// Split `input` in tokens, see [`Lexer`].
pub fn tokenize(input: &str) -> Vec<String> {
    Lexer::new(input).tokenize()
}

/// An helper struct for lexing the input.
///
/// Whitespace is dropped without ending the current token, so `1 2` is the
/// single token `12`. Symbols are always one character long, number literals
/// end at the first character that can not continue them, and identifiers
/// run until the next symbol.
pub struct Lexer<'a> {
    input: Chars<'a>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `string`
    pub fn new(string: &'a str) -> Lexer<'a> {
        Lexer {
            input: string.chars(),
        }
    }

    /// Consume the input and return its tokens
    pub fn tokenize(&mut self) -> Vec<String> {
        let mut output = Vec::new();
        let mut current = String::new();

        for c in &mut self.input {
            if is_whitespace(c) {
                continue;
            }
            if is_token_sequence(&current, c) {
                current.push(c);
            } else {
                trace!("token {}: {:?}", output.len(), current);
                output.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
        if !current.is_empty() {
            trace!("token {}: {:?}", output.len(), current);
            output.push(current);
        }
        output
    }
}

/// Check if `c` continues the token `current`
fn is_token_sequence(current: &str, c: char) -> bool {
    if current.is_empty() {
        return true;
    }
    if is_symbol(current) || SYMBOLS.contains(&c) {
        return false;
    }
    if is_number(current) {
        return match c {
            '0'..='9' => true,
            '.' => is_integer(current),
            _ => false,
        };
    }
    true
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n' || c == '\r'
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("2 + 2" => vec!["2", "+", "2"] ; "addition with spaces")]
    #[test_case("2+2" => vec!["2", "+", "2"] ; "addition without spaces")]
    #[test_case("1 2" => vec!["12"] ; "spaces do not split")]
    #[test_case("-100-2+x-(y+z)" => vec!["-", "100", "-", "2", "+", "x", "-", "(", "y", "+", "z", ")"] ; "mixed")]
    #[test_case("3.25*x1" => vec!["3.25", "*", "x1"] ; "decimal and identifier with digit")]
    #[test_case("1.2.3" => vec!["1.2", ".3"] ; "second dot ends the number")]
    #[test_case("12abc" => vec!["12", "abc"] ; "letter ends the number")]
    #[test_case("RIGHT(LEFT(1,2), RIGHT(4,3))" => vec!["RIGHT", "(", "LEFT", "(", "1", ",", "2", ")", ",", "RIGHT", "(", "4", ",", "3", ")", ")"] ; "function calls")]
    #[test_case("F(x,y)" => vec!["F", "(", "x", ",", "y", ")"] ; "comma ends identifiers")]
    #[test_case("a.b[2]$" => vec!["a.b[2]$"] ; "identifier with unreserved symbols")]
    #[test_case("((" => vec!["(", "("] ; "symbols are single characters")]
    #[test_case("" => Vec::<String>::new() ; "empty input")]
    #[test_case("  \t\n" => Vec::<String>::new() ; "only whitespace")]
    fn tokens(input: &str) -> Vec<String> {
        tokenize(input)
    }

    #[test]
    fn sequences() {
        assert!(is_token_sequence("", '+'));
        assert!(!is_token_sequence("+", '1'));
        assert!(!is_token_sequence(",", 'a'));
        assert!(!is_token_sequence("a", ')'));
        assert!(is_token_sequence("12", '.'));
        assert!(is_token_sequence("12.", '5'));
        assert!(!is_token_sequence("12.5", '.'));
        assert!(!is_token_sequence("12", 'e'));
        assert!(is_token_sequence("x", '.'));
        assert!(is_token_sequence(".", '5'));
    }

    #[test]
    fn identifiers() {
        let identifiers = ["x", "_y2", "ab.gd_hc", "abc[90]", "$", "été"];
        for ident in &identifiers {
            assert!(is_identifier(ident), "{}", ident);
        }

        let non_identifiers = ["", "1", "1.5", "a+b", "f(", ",", "a b"];
        for ident in &non_identifiers {
            assert!(!is_identifier(ident), "{}", ident);
        }
    }

    proptest! {
        #[test]
        fn concatenation_restores_input(input in "[a-z0-9+*/(),. \t-]{0,40}") {
            let tokens = tokenize(&input);
            let stripped: String = input.chars().filter(|&c| !is_whitespace(c)).collect();
            prop_assert_eq!(tokens.concat(), stripped);
        }

        #[test]
        fn tokens_are_classified(input in "[a-z0-9+*/(),. -]{0,40}") {
            for token in tokenize(&input) {
                prop_assert!(!token.is_empty());
                let kinds = [is_symbol(&token), is_number(&token), is_identifier(&token)];
                prop_assert_eq!(kinds.iter().filter(|&&kind| kind).count(), 1, "{:?}", token);
            }
        }
    }
}
