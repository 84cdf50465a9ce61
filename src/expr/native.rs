use super::{Compile, Expr, Fragment};
use crate::escape::quote_string;
use crate::query::{QueryError, Scope};
use crate::value::Value;

/// A literal scalar, bound as a parameter unless trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeValue {
    value: Value,
    trusted: bool,
}

impl NativeValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            trusted: false,
        }
    }

    /// A value that is inlined into the SQL text instead of bound.
    pub fn trusted(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            trusted: true,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_trusted(&self) -> bool {
        self.trusted
    }

    /// SQL literal text for a trusted value.
    pub fn to_sql_literal(&self) -> String {
        match &self.value {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => quote_string(s),
        }
    }
}

impl Compile for NativeValue {
    fn compile(&self, _scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        if self.trusted {
            Ok(Fragment::sql(self.to_sql_literal()))
        } else {
            Ok(Fragment::new("?", vec![self.value.clone()]))
        }
    }
}

/// A parenthesized list of expressions, the right side of `IN`.
#[derive(Debug, Clone)]
pub struct ValueList {
    items: Vec<Expr>,
}

impl ValueList {
    pub fn new(items: Vec<Expr>) -> Self {
        Self { items }
    }

    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(values.into_iter().map(|v| Expr::value(v)).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[Expr] {
        &self.items
    }
}

impl Compile for ValueList {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        let parts = self
            .items
            .iter()
            .map(|item| item.compile(scope))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Fragment::join(parts, ", ").wrap("(", ")"))
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        self.items.iter_mut().try_for_each(|item| item.resolve(scope))
    }
}
