use super::{Compile, Expr, Fragment};
use crate::escape::is_identifier;
use crate::query::{QueryError, Scope};

/// A SQL function call such as `COUNT(*)` or `LOWER(name)`.
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    args: Vec<Expr>,
    distinct: bool,
}

impl Function {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            args,
            distinct: false,
        }
    }

    /// `NAME(DISTINCT args)`, for aggregates.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

impl Compile for Function {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        if !is_identifier(&self.name) {
            return Err(QueryError::InvalidIdentifier {
                name: self.name.clone(),
            });
        }
        let args = self
            .args
            .iter()
            .map(|arg| arg.compile(scope))
            .collect::<Result<Vec<_>, _>>()?;
        let prefix = format!(
            "{}({}",
            self.name.to_ascii_uppercase(),
            if self.distinct { "DISTINCT " } else { "" }
        );
        Ok(Fragment::join(args, ", ").wrap(&prefix, ")"))
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        self.args.iter_mut().try_for_each(|arg| arg.resolve(scope))
    }
}
