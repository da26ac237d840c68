use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a database backend.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] postgres::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to connect to database: {0}")]
    Connect(#[source] DbError),

    #[error("Failed to provision table '{table}': {source}")]
    Schema {
        table: String,
        #[source]
        source: DbError,
    },

    #[error("Failed to open input file '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error at line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required field: '{0}'")]
    MissingField(String),

    #[error("Invalid date '{value}' in field '{field}': expected YYYY-MM-DD")]
    DateParse { field: String, value: String },

    #[error("Failed to insert row {row}: {message}")]
    Insert { row: u64, message: String },

    #[error("Failed to close database session: {0}")]
    Close(#[source] DbError),
}

/// Coarse failure category, one per pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Connectivity,
    Schema,
    File,
    Transform,
    Insert,
}

impl EtlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EtlError::Config(_) | EtlError::Toml(_) => ErrorKind::Config,
            EtlError::Connect(_) | EtlError::Close(_) => ErrorKind::Connectivity,
            EtlError::Schema { .. } => ErrorKind::Schema,
            EtlError::File { .. } | EtlError::Read { .. } => ErrorKind::File,
            EtlError::MissingField(_) | EtlError::DateParse { .. } => ErrorKind::Transform,
            EtlError::Insert { .. } => ErrorKind::Insert,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
