//! Caller-written SQL fragments.

use std::collections::BTreeMap;

use super::{Compile, Fragment};
use crate::query::{QueryError, Scope};
use crate::value::Value;

/// SQL text supplied by the caller together with its parameters.
///
/// The text is emitted verbatim; only its placeholders are checked against
/// the parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSql {
    sql: String,
    params: Vec<Value>,
}

impl RawSql {
    /// Trusted SQL without placeholders (keywords, `*`, constant expressions).
    pub fn trusted(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// SQL with `?` placeholders; the number of placeholders must match `params`.
    pub fn positional(sql: impl Into<String>, params: Vec<Value>) -> Result<Self, QueryError> {
        let sql = sql.into();
        let mut expected = 0;
        scan(&sql, |token| {
            if let Token::Positional = token {
                expected += 1;
            }
        });
        if expected != params.len() {
            return Err(QueryError::ParameterCountMismatch {
                expected,
                actual: params.len(),
            });
        }
        Ok(Self { sql, params })
    }

    /// SQL with `:name` placeholders, rewritten to positional `?` form.
    pub fn named(sql: &str, values: &BTreeMap<String, Value>) -> Result<Self, QueryError> {
        let mut out = String::with_capacity(sql.len());
        let mut params = Vec::new();
        let mut missing = None;
        scan(sql, |token| match token {
            Token::Text(text) => out.push_str(text),
            Token::Positional => out.push('?'),
            Token::Named(name) => match values.get(name) {
                Some(value) => {
                    out.push('?');
                    params.push(value.clone());
                }
                None => {
                    if missing.is_none() {
                        missing = Some(name.to_string());
                    }
                }
            },
        });
        if let Some(name) = missing {
            return Err(QueryError::MissingParameter { name });
        }
        Self::positional(out, params)
    }

    pub fn as_str(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

impl Compile for RawSql {
    fn compile(&self, _scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        Ok(Fragment::new(self.sql.clone(), self.params.clone()))
    }
}

enum Token<'a> {
    Text(&'a str),
    Positional,
    Named(&'a str),
}

/// Walk `sql`, reporting placeholders that are outside quoted strings and identifiers.
fn scan<'a>(sql: &'a str, mut emit: impl FnMut(Token<'a>)) {
    let bytes = sql.as_bytes();
    let mut start = 0;
    let mut i = 0;
    let mut quote: Option<u8> = None;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' | b'"' | b'`' => {
                quote = Some(b);
                i += 1;
            }
            b'?' => {
                emit(Token::Text(&sql[start..i]));
                emit(Token::Positional);
                i += 1;
                start = i;
            }
            b':' if bytes.get(i + 1) == Some(&b':') => {
                // Postgres cast, not a parameter
                i += 2;
            }
            b':' if bytes.get(i + 1).is_some_and(|c| c.is_ascii_alphabetic() || *c == b'_') => {
                let name_start = i + 1;
                let mut end = name_start;
                while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                    end += 1;
                }
                emit(Token::Text(&sql[start..i]));
                emit(Token::Named(&sql[name_start..end]));
                i = end;
                start = end;
            }
            _ => i += 1,
        }
    }
    let tail_start = start.min(sql.len());
    emit(Token::Text(&sql[tail_start..]));
}
