use clap::{Parser, Subcommand};
use employee_etl::constants;
use employee_etl::logging::{self, TracingSink};
use employee_etl::{Config, Pipeline};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "employee_etl")]
#[command(about = "Load employee CSV exports into the employees table")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to $EMPLOYEE_ETL_CONFIG, then config/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input file, resolved against the configured data directory
    #[arg(long)]
    input: Option<String>,

    /// Schema generation to load. Available: v1, v2
    #[arg(long)]
    schema: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Provision the table and import the input file (default)
    Run,
    /// Only provision the target table
    Provision,
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(input) = cli.input {
        config.etl.input = input;
    }
    if let Some(schema) = cli.schema {
        config.etl.schema = schema;
    }

    // Keep the guard alive so the file writer flushes on exit
    let _guard = logging::init_logging(&config.etl.log_dir)?;
    debug!(
        schema = %config.etl.schema,
        backend = %config.etl.backend,
        "{} starting (supported schemas: {})",
        env!("CARGO_PKG_NAME"),
        constants::get_supported_schemas().join(", ")
    );

    let pipeline = Pipeline::from_config(&config)?;
    let sink = TracingSink;

    // Failures are logged by the pipeline; the process still exits normally.
    let report = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => pipeline.run(&sink),
        Commands::Provision => pipeline.provision(&sink),
    };
    debug!(
        state = ?report.state,
        rows = report.rows_inserted,
        "run finished"
    );

    Ok(())
}
