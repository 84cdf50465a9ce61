//! Comparator semantics shared by SQL lowering and in-memory evaluation.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::escape::escape_like;
use crate::expr::CompareOp;
use crate::value::Value;

use super::FilterError;

/// Comparator keywords of the filter DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterComparator {
    Equal,
    NotEqual,
    Less,
    LessEq,
    More,
    MoreEq,
    Contain,
    StartWith,
    EndWith,
    IsNull,
    IsNotNull,
    IsEmpty,
    IsTrue,
    IsFalse,
    DateEqual,
    DateNotEqual,
    DateBefore,
    DateBeforeEq,
    DateAfter,
    DateAfterEq,
}

/// Where a pattern comparator anchors its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Contains,
    Prefix,
    Suffix,
}

impl PatternKind {
    /// The LIKE pattern matching `needle` literally.
    pub fn like_pattern(&self, needle: &str) -> String {
        let escaped = escape_like(needle);
        match self {
            PatternKind::Contains => format!("%{}%", escaped),
            PatternKind::Prefix => format!("{}%", escaped),
            PatternKind::Suffix => format!("%{}", escaped),
        }
    }

    /// Case-insensitive match, like LIKE under the default collation.
    pub fn matches(&self, haystack: &str, needle: &str) -> bool {
        let haystack = haystack.to_lowercase();
        let needle = needle.to_lowercase();
        match self {
            PatternKind::Contains => haystack.contains(&needle),
            PatternKind::Prefix => haystack.starts_with(&needle),
            PatternKind::Suffix => haystack.ends_with(&needle),
        }
    }
}

impl FilterComparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterComparator::Equal => "equal",
            FilterComparator::NotEqual => "notEqual",
            FilterComparator::Less => "less",
            FilterComparator::LessEq => "lessEq",
            FilterComparator::More => "more",
            FilterComparator::MoreEq => "moreEq",
            FilterComparator::Contain => "contain",
            FilterComparator::StartWith => "startWith",
            FilterComparator::EndWith => "endWith",
            FilterComparator::IsNull => "isNull",
            FilterComparator::IsNotNull => "isNotNull",
            FilterComparator::IsEmpty => "isEmpty",
            FilterComparator::IsTrue => "isTrue",
            FilterComparator::IsFalse => "isFalse",
            FilterComparator::DateEqual => "dateEqual",
            FilterComparator::DateNotEqual => "dateNotEqual",
            FilterComparator::DateBefore => "dateBefore",
            FilterComparator::DateBeforeEq => "dateBeforeEq",
            FilterComparator::DateAfter => "dateAfter",
            FilterComparator::DateAfterEq => "dateAfterEq",
        }
    }

    /// The relational operator behind this comparator, for the ones that have one.
    pub fn relation(&self) -> Option<CompareOp> {
        match self {
            FilterComparator::Equal | FilterComparator::DateEqual => Some(CompareOp::Eq),
            FilterComparator::NotEqual | FilterComparator::DateNotEqual => Some(CompareOp::NotEq),
            FilterComparator::Less | FilterComparator::DateBefore => Some(CompareOp::Lt),
            FilterComparator::LessEq | FilterComparator::DateBeforeEq => Some(CompareOp::LtEq),
            FilterComparator::More | FilterComparator::DateAfter => Some(CompareOp::Gt),
            FilterComparator::MoreEq | FilterComparator::DateAfterEq => Some(CompareOp::GtEq),
            _ => None,
        }
    }

    pub fn pattern(&self) -> Option<PatternKind> {
        match self {
            FilterComparator::Contain => Some(PatternKind::Contains),
            FilterComparator::StartWith => Some(PatternKind::Prefix),
            FilterComparator::EndWith => Some(PatternKind::Suffix),
            _ => None,
        }
    }

    /// Date aliases compare only the calendar date of both sides.
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            FilterComparator::DateEqual
                | FilterComparator::DateNotEqual
                | FilterComparator::DateBefore
                | FilterComparator::DateBeforeEq
                | FilterComparator::DateAfter
                | FilterComparator::DateAfterEq
        )
    }

    /// Whether the item's value takes part in the comparison.
    pub fn uses_value(&self) -> bool {
        !matches!(
            self,
            FilterComparator::IsNull
                | FilterComparator::IsNotNull
                | FilterComparator::IsEmpty
                | FilterComparator::IsTrue
                | FilterComparator::IsFalse
        )
    }

    /// Test `actual` (a record field) against `expected` (the item value).
    pub fn matches(&self, actual: &Value, expected: &Value) -> bool {
        if let Some(pattern) = self.pattern() {
            return !actual.is_null() && pattern.matches(&actual.to_text(), &expected.to_text());
        }
        if let Some(op) = self.relation() {
            let ordering = if self.is_date() {
                match (date_part(actual), date_part(expected)) {
                    (Some(a), Some(b)) => Some(a.cmp(b)),
                    _ => None,
                }
            } else if matches!(op, CompareOp::Eq | CompareOp::NotEq) {
                // A NULL value lowers to IS [NOT] NULL; otherwise a NULL field fails both
                if actual.is_null() && !expected.is_null() {
                    return false;
                }
                return (op == CompareOp::Eq) == actual.loose_eq(expected);
            } else {
                actual.compare(expected)
            };
            return match (op, ordering) {
                (_, None) => false,
                (CompareOp::Eq, Some(o)) => o == Ordering::Equal,
                (CompareOp::NotEq, Some(o)) => o != Ordering::Equal,
                (CompareOp::Lt, Some(o)) => o == Ordering::Less,
                (CompareOp::LtEq, Some(o)) => o != Ordering::Greater,
                (CompareOp::Gt, Some(o)) => o == Ordering::Greater,
                (CompareOp::GtEq, Some(o)) => o != Ordering::Less,
                _ => false,
            };
        }
        match self {
            FilterComparator::IsNull => actual.is_null(),
            FilterComparator::IsNotNull => !actual.is_null(),
            FilterComparator::IsEmpty => actual.is_empty(),
            FilterComparator::IsTrue => actual.is_truthy(),
            FilterComparator::IsFalse => !actual.is_truthy(),
            _ => false,
        }
    }
}

/// `YYYY-MM-DD` prefix of an ISO date or datetime string.
pub(crate) fn date_part(value: &Value) -> Option<&str> {
    let text = value.as_str()?;
    let date = text.get(..10)?;
    let bytes = date.as_bytes();
    let shaped = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    shaped.then_some(date)
}

impl fmt::Display for FilterComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterComparator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let comparator = match s {
            "equal" => FilterComparator::Equal,
            "notEqual" => FilterComparator::NotEqual,
            "less" => FilterComparator::Less,
            "lessEq" => FilterComparator::LessEq,
            "more" => FilterComparator::More,
            "moreEq" => FilterComparator::MoreEq,
            "contain" => FilterComparator::Contain,
            "startWith" => FilterComparator::StartWith,
            "endWith" => FilterComparator::EndWith,
            "isNull" => FilterComparator::IsNull,
            "isNotNull" => FilterComparator::IsNotNull,
            "isEmpty" => FilterComparator::IsEmpty,
            "isTrue" => FilterComparator::IsTrue,
            "isFalse" => FilterComparator::IsFalse,
            "dateEqual" => FilterComparator::DateEqual,
            "dateNotEqual" => FilterComparator::DateNotEqual,
            "dateBefore" => FilterComparator::DateBefore,
            "dateBeforeEq" => FilterComparator::DateBeforeEq,
            "dateAfter" => FilterComparator::DateAfter,
            "dateAfterEq" => FilterComparator::DateAfterEq,
            _ => return Err(FilterError::UnknownComparator { name: s.to_string() }),
        };
        Ok(comparator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FilterComparator::Equal, Value::Int(3), Value::from("3"), true)]
    #[case(FilterComparator::Equal, Value::Null, Value::Null, true)]
    #[case(FilterComparator::NotEqual, Value::from("a"), Value::from("b"), true)]
    #[case(FilterComparator::NotEqual, Value::Null, Value::Int(1), false)]
    #[case(FilterComparator::NotEqual, Value::Null, Value::Null, false)]
    #[case(FilterComparator::NotEqual, Value::Int(1), Value::Null, true)]
    #[case(FilterComparator::Less, Value::Int(2), Value::Int(3), true)]
    #[case(FilterComparator::Less, Value::Null, Value::Int(3), false)]
    #[case(FilterComparator::LessEq, Value::Float(3.0), Value::Int(3), true)]
    #[case(FilterComparator::More, Value::from("10"), Value::Int(9), true)]
    #[case(FilterComparator::MoreEq, Value::Int(9), Value::Int(10), false)]
    #[case(FilterComparator::Contain, Value::from("Alice Smith"), Value::from("smith"), true)]
    #[case(FilterComparator::Contain, Value::Null, Value::from(""), false)]
    #[case(FilterComparator::StartWith, Value::from("Alan"), Value::from("al"), true)]
    #[case(FilterComparator::EndWith, Value::from("x@example.com"), Value::from("@example.com"), true)]
    #[case(FilterComparator::IsNull, Value::Null, Value::Null, true)]
    #[case(FilterComparator::IsNotNull, Value::Int(0), Value::Null, true)]
    #[case(FilterComparator::IsEmpty, Value::from(""), Value::Null, true)]
    #[case(FilterComparator::IsTrue, Value::from("1"), Value::Null, true)]
    #[case(FilterComparator::IsFalse, Value::Int(0), Value::Null, true)]
    #[case(FilterComparator::DateEqual, Value::from("2024-03-01 10:00:00"), Value::from("2024-03-01"), true)]
    #[case(FilterComparator::DateBefore, Value::from("2023-12-31 23:59:59"), Value::from("2024-01-01"), true)]
    #[case(FilterComparator::DateAfterEq, Value::from("2024-01-01"), Value::from("2024-01-01 18:00"), true)]
    #[case(FilterComparator::DateAfter, Value::from("not a date"), Value::from("2024-01-01"), false)]
    fn test_matches(
        #[case] comparator: FilterComparator,
        #[case] actual: Value,
        #[case] expected: Value,
        #[case] result: bool,
    ) {
        assert_eq!(comparator.matches(&actual, &expected), result);
    }

    #[rstest]
    #[case(PatternKind::Contains, "50%", "%50\\%%")]
    #[case(PatternKind::Prefix, "a_b", "a\\_b%")]
    #[case(PatternKind::Suffix, "x", "%x")]
    fn test_like_patterns(#[case] kind: PatternKind, #[case] needle: &str, #[case] expected: &str) {
        assert_eq!(kind.like_pattern(needle), expected);
    }

    #[rstest]
    fn test_keywords_round_trip_through_display() {
        for keyword in ["equal", "lessEq", "startWith", "isEmpty", "dateAfterEq"] {
            let comparator: FilterComparator = keyword.parse().unwrap();
            assert_eq!(comparator.to_string(), keyword);
        }
    }
}
