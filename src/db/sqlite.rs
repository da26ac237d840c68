use super::{Connector, Dialect, Session};
use crate::error::DbError;
use crate::record::FieldValue;
use rusqlite::types::ToSqlOutput;
use rusqlite::{params_from_iter, Connection, ToSql};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Embedded store for local imports and tests.
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Connector for SqliteConnector {
    fn connect(&self) -> Result<Box<dyn Session>, DbError> {
        debug!("Opening SQLite database at {}", self.path.display());
        Ok(Box::new(SqliteSession::open(&self.path)?))
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

pub struct SqliteSession {
    conn: Connection,
    in_transaction: bool,
}

impl SqliteSession {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        if let Some(parent) = path.as_ref().parent() {
            // Connection::open reports the failure that matters
            if let Err(e) = std::fs::create_dir_all(parent) {
                debug!("Could not create {}: {}", parent.display(), e);
            }
        }
        Ok(Self::from_connection(Connection::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            in_transaction: false,
        }
    }

    /// Underlying connection, for read-back queries outside the pipeline.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            FieldValue::Text(s) => s.to_sql(),
            FieldValue::Date(d) => d.to_sql(),
            FieldValue::Integer(i) => i.to_sql(),
        }
    }
}

impl Session for SqliteSession {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute(&mut self, sql: &str, params: &[FieldValue]) -> Result<u64, DbError> {
        if !self.in_transaction {
            self.conn.execute_batch("BEGIN")?;
            self.in_transaction = true;
        }
        let changed = self.conn.execute(sql, params_from_iter(params.iter()))?;
        Ok(changed as u64)
    }

    fn commit(&mut self) -> Result<(), DbError> {
        if self.in_transaction {
            self.conn.execute_batch("COMMIT")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), DbError> {
        self.conn.close().map_err(|(_, e)| DbError::Sqlite(e))
    }
}
