use super::{Compile, Expr, Fragment};
use crate::query::{QueryError, Scope};

/// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`
#[derive(Debug, Clone, Default)]
pub struct Case {
    operand: Option<Box<Expr>>,
    branches: Vec<(Expr, Expr)>,
    otherwise: Option<Box<Expr>>,
}

impl Case {
    /// A searched CASE: each WHEN holds a condition.
    pub fn new() -> Self {
        Self::default()
    }

    /// A simple CASE: each WHEN holds a value compared to `operand`.
    pub fn on(operand: Expr) -> Self {
        Self {
            operand: Some(Box::new(operand)),
            ..Self::default()
        }
    }

    pub fn when(mut self, condition: Expr, result: Expr) -> Self {
        self.branches.push((condition, result));
        self
    }

    pub fn otherwise(mut self, result: Expr) -> Self {
        self.otherwise = Some(Box::new(result));
        self
    }
}

impl Compile for Case {
    fn compile(&self, scope: &Scope<'_>) -> Result<Fragment, QueryError> {
        if self.branches.is_empty() {
            return Err(QueryError::coding("CASE requires at least one WHEN branch"));
        }
        let mut out = Fragment::sql("CASE");
        if let Some(operand) = &self.operand {
            out.push_str(" ");
            out.push(operand.compile(scope)?);
        }
        for (condition, result) in &self.branches {
            out.push_str(" WHEN ");
            out.push(condition.compile(scope)?);
            out.push_str(" THEN ");
            out.push(result.compile(scope)?);
        }
        if let Some(otherwise) = &self.otherwise {
            out.push_str(" ELSE ");
            out.push(otherwise.compile(scope)?);
        }
        out.push_str(" END");
        Ok(out)
    }

    fn resolve(&mut self, scope: &Scope<'_>) -> Result<(), QueryError> {
        if let Some(operand) = &mut self.operand {
            operand.resolve(scope)?;
        }
        for (condition, result) in &mut self.branches {
            condition.resolve(scope)?;
            result.resolve(scope)?;
        }
        if let Some(otherwise) = &mut self.otherwise {
            otherwise.resolve(scope)?;
        }
        Ok(())
    }
}
