/// Table every schema generation writes to
pub const EMPLOYEES_TABLE: &str = "employees";

// Schema generation names (used in config and CLI)
pub const SCHEMA_V1: &str = "v1";
pub const SCHEMA_V2: &str = "v2";

// Backend names (used in config)
pub const BACKEND_POSTGRESQL: &str = "postgresql";
pub const BACKEND_SQLITE: &str = "sqlite";

// Deployment layout defaults
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const CONFIG_PATH_ENV: &str = "EMPLOYEE_ETL_CONFIG";
pub const DEFAULT_INPUT_FILE: &str = "employees.csv";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "etl_log.log";
/// Filter used when RUST_LOG is unset; stage progress stays at debug
pub const DEFAULT_LOG_FILTER: &str = "employee_etl=info";
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Derived key holding the concatenated first and last name
pub const FULL_NAME_KEY: &str = "full_name";

/// Strict calendar-date input format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Run-outcome log messages
pub const SUCCESS_MESSAGE: &str = "ETL process completed successfully.";
pub const ERROR_MESSAGE_PREFIX: &str = "An error occurred: ";

/// Get all supported schema generation names
pub fn get_supported_schemas() -> Vec<&'static str> {
    vec![SCHEMA_V1, SCHEMA_V2]
}
