use std::collections::VecDeque;

use tracing::trace;

use crate::executor::{Executor, Row};

use super::{Limit, Query, QueryError};

/// Forward-only iterator over a SELECT, fetched `chunk` rows at a time.
///
/// Honors the statement's own LIMIT window: pages start at its offset and
/// stop after its count when one is set.
pub struct Cursor<'e> {
    query: Query,
    executor: &'e dyn Executor,
    chunk: u64,
    offset: u64,
    remaining: Option<u64>,
    buffer: VecDeque<Row>,
    done: bool,
}

impl Query {
    /// Iterate over the matching rows in pages of `chunk`.
    pub fn iter<'e>(&mut self, executor: &'e dyn Executor, chunk: u64) -> Result<Cursor<'e>, QueryError> {
        if chunk == 0 {
            return Err(QueryError::coding("cursor chunk size must be positive"));
        }
        self.resolve()?;
        let limit = self.get_limit();
        Ok(Cursor {
            query: self.clone(),
            executor,
            chunk,
            offset: limit.from,
            remaining: (limit.count != 0).then_some(limit.count),
            buffer: VecDeque::new(),
            done: false,
        })
    }
}

impl Cursor<'_> {
    fn fetch_page(&mut self) -> Result<(), QueryError> {
        let size = match self.remaining {
            Some(remaining) => remaining.min(self.chunk),
            None => self.chunk,
        };
        if size == 0 {
            self.done = true;
            return Ok(());
        }
        self.query.limit = Limit {
            from: self.offset,
            count: size,
        };
        let rows = self.query.fetch_rows(self.executor)?;
        let fetched = rows.len() as u64;
        trace!(offset = self.offset, fetched, "cursor page");

        self.offset += fetched;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(fetched);
        }
        if fetched < size {
            self.done = true;
        }
        self.buffer.extend(rows);
        Ok(())
    }
}

impl Iterator for Cursor<'_> {
    type Item = Result<Row, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.buffer.pop_front() {
                return Some(Ok(row));
            }
            if self.done {
                return None;
            }
            if let Err(err) = self.fetch_page() {
                self.done = true;
                return Some(Err(err));
            }
        }
    }
}
