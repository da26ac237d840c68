//! Database sessions.
//!
//! The pipeline talks to exactly one [`Session`] per run. Statements run
//! inside an implicit transaction that stays open until [`Session::commit`],
//! so callers decide the commit granularity.

pub mod pg;
pub mod sqlite;

use crate::config::Config;
use crate::constants;
use crate::error::{DbError, EtlError, Result};
use crate::record::FieldValue;

pub use pg::{PgConnector, PgSession};
pub use sqlite::{SqliteConnector, SqliteSession};

/// SQL flavour differences the pipeline cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// 1-based positional parameter marker.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite => format!("?{index}"),
        }
    }

    pub fn primary_key_column(&self) -> &'static str {
        match self {
            Dialect::Postgres => "id SERIAL PRIMARY KEY",
            Dialect::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }
}

pub trait Session {
    fn dialect(&self) -> Dialect;

    /// Run one statement, opening a transaction first if none is active.
    fn execute(&mut self, sql: &str, params: &[FieldValue]) -> std::result::Result<u64, DbError>;

    /// Commit the active transaction, if any.
    fn commit(&mut self) -> std::result::Result<(), DbError>;

    fn close(self: Box<Self>) -> std::result::Result<(), DbError>;
}

/// Opens sessions against a configured store.
pub trait Connector {
    fn connect(&self) -> std::result::Result<Box<dyn Session>, DbError>;

    /// Human-readable target for log lines. Never includes credentials.
    fn describe(&self) -> String;
}

/// Pick the connector for the configured backend.
pub fn connector_for(config: &Config) -> Result<Box<dyn Connector>> {
    match config.etl.backend.as_str() {
        constants::BACKEND_POSTGRESQL => Ok(Box::new(PgConnector::new(config.postgresql.clone()))),
        constants::BACKEND_SQLITE => {
            let sqlite = config.sqlite.as_ref().ok_or_else(|| {
                EtlError::Config("backend 'sqlite' requires a [sqlite] section".to_string())
            })?;
            Ok(Box::new(SqliteConnector::new(&sqlite.path)))
        }
        other => Err(EtlError::Config(format!("Unknown backend '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_one_based() {
        assert_eq!(Dialect::Postgres.placeholder(1), "$1");
        assert_eq!(Dialect::Sqlite.placeholder(12), "?12");
    }

    #[test]
    fn connector_follows_backend_setting() {
        let config = Config::from_toml_str(
            r#"
[postgresql]
host = "db.internal"
database = "hr"
user = "etl"
password = "secret"

[etl]
backend = "sqlite"

[sqlite]
path = "/tmp/hr.db"
"#,
        )
        .unwrap();
        let connector = connector_for(&config).unwrap();
        assert_eq!(connector.describe(), "sqlite:/tmp/hr.db");

        let mut config = config;
        config.etl.backend = constants::BACKEND_POSTGRESQL.to_string();
        let connector = connector_for(&config).unwrap();
        assert_eq!(connector.describe(), "postgresql://etl@db.internal:5432/hr");
    }
}
