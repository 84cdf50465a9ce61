//! Target-database differences that leak into otherwise dialect-agnostic SQL.

use serde::{Deserialize, Serialize};

use crate::query::QueryError;

/// Database flavor the execution layer talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Mysql,
    Sqlite,
    Postgres,
    /// Unknown driver: only portable SQL is emitted
    Generic,
}

impl Dialect {
    /// SQL expression producing a random sort order.
    pub fn random_order(&self) -> Result<&'static str, QueryError> {
        match self {
            Dialect::Mysql => Ok("RAND()"),
            Dialect::Sqlite | Dialect::Postgres => Ok("RANDOM()"),
            Dialect::Generic => Err(QueryError::Coding {
                message: "random ordering is not supported by the generic dialect".to_string(),
            }),
        }
    }

    /// Row count used for `LIMIT <from>, <count>` when only an offset was given.
    pub fn max_limit(&self) -> u64 {
        match self {
            Dialect::Mysql => u64::MAX,
            Dialect::Sqlite | Dialect::Postgres | Dialect::Generic => i64::MAX as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_order_keywords() {
        assert_eq!(Dialect::Mysql.random_order().unwrap(), "RAND()");
        assert_eq!(Dialect::Sqlite.random_order().unwrap(), "RANDOM()");
        assert!(Dialect::Generic.random_order().unwrap_err().is_coding_error());
    }

    #[test]
    fn test_max_limit_sentinels() {
        assert_eq!(Dialect::Mysql.max_limit(), 18446744073709551615);
        assert_eq!(Dialect::Postgres.max_limit(), 9223372036854775807);
    }

    #[test]
    fn test_deserialize_lowercase() {
        let d: Dialect = serde_json::from_str("\"sqlite\"").unwrap();
        assert_eq!(d, Dialect::Sqlite);
    }
}
