//! Quoting and escaping for the MySQL-flavored output dialect.

use std::sync::LazyLock;

use regex::Regex;

/// A bare SQL identifier: letters, digits and underscores, not starting with a digit.
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"));

/// Returns true if `name` can be used as a table, column or alias name.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Quote an identifier with backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Render the `{table}` placeholder expanded later by the execution layer.
pub fn table_placeholder(name: &str) -> String {
    format!("{{{}}}", name)
}

/// Escape a string for use inside a quoted SQL string literal.
///
/// # Arguments
/// * `s` - The string to escape
/// * `quote_char` - The quote character to escape ('\'' for single-quoted, '"' for double-quoted)
pub fn escape_string_for_quote(s: &str, quote_char: char) -> String {
    let mut result = String::with_capacity(s.len() * 2);
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            c if c == quote_char => {
                result.push('\\');
                result.push(c);
            }
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => result.push_str("\\0"),
            '\u{1a}' => result.push_str("\\Z"),
            c => result.push(c),
        }
    }
    result
}

/// Render a single-quoted SQL string literal.
#[inline]
pub fn quote_string(s: &str) -> String {
    format!("'{}'", escape_string_for_quote(s, '\''))
}

/// Escape LIKE wildcards so `s` matches literally inside a pattern.
pub fn escape_like(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("users", true)]
    #[case("_tmp1", true)]
    #[case("1abc", false)]
    #[case("a.b", false)]
    #[case("drop table", false)]
    #[case("", false)]
    fn test_is_identifier(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(name), expected);
    }

    #[rstest]
    fn test_quote_identifier_doubles_backticks() {
        assert_eq!(quote_identifier("na`me"), "`na``me`");
    }

    #[rstest]
    fn test_quote_string_basic() {
        assert_eq!(quote_string("hello"), "'hello'");
    }

    #[rstest]
    fn test_quote_string_with_quotes() {
        assert_eq!(quote_string("it's"), r"'it\'s'");
    }

    #[rstest]
    fn test_quote_string_with_backslash() {
        assert_eq!(quote_string(r"path\to"), r"'path\\to'");
    }

    #[rstest]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), r"50\%\_off");
    }
}
