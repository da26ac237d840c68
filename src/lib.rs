pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod provision;
pub mod reader;
pub mod record;
pub mod schema;
pub mod transform;
pub mod writer;

pub use config::Config;
pub use error::{EtlError, Result};
pub use pipeline::{Pipeline, RunReport, RunState};
