use crate::config::Config;
use crate::constants;
use crate::db::{self, Connector};
use crate::error::{EtlError, Result};
use crate::logging::LogSink;
use crate::provision;
use crate::reader::RecordReader;
use crate::schema::{self, TargetSchema};
use crate::writer::RecordWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Where a run is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Connected,
    SchemaReady,
    Transformed,
    Inserted,
    Closed,
    Failed,
}

/// Outcome of a pipeline run.
///
/// Failures are already logged when this is returned; the report only exists
/// so callers and tests can inspect what happened.
#[derive(Debug)]
pub struct RunReport {
    pub schema: &'static str,
    pub state: RunState,
    /// Last state reached before a failure, `None` on success.
    pub failed_after: Option<RunState>,
    pub rows_inserted: u64,
    pub error: Option<EtlError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.state == RunState::Closed
    }
}

struct Progress {
    state: RunState,
    rows_inserted: u64,
}

impl Progress {
    fn advance(&mut self, state: RunState) {
        debug!(from = ?self.state, to = ?state, "state transition");
        self.state = state;
    }
}

pub struct Pipeline {
    connector: Box<dyn Connector>,
    schema: Box<dyn TargetSchema>,
    input: PathBuf,
}

impl Pipeline {
    pub fn new(
        connector: Box<dyn Connector>,
        schema: Box<dyn TargetSchema>,
        input: impl Into<PathBuf>,
    ) -> Self {
        Self {
            connector,
            schema,
            input: input.into(),
        }
    }

    /// Build the pipeline for the configured backend, schema generation and input file.
    pub fn from_config(config: &Config) -> Result<Self> {
        let schema = schema::create_schema(&config.etl.schema).ok_or_else(|| {
            EtlError::Config(format!(
                "Unknown schema generation '{}' (expected one of: {})",
                config.etl.schema,
                constants::get_supported_schemas().join(", ")
            ))
        })?;
        let connector = db::connector_for(config)?;
        Ok(Self::new(connector, schema, config.input_path()))
    }

    pub fn schema(&self) -> &dyn TargetSchema {
        self.schema.as_ref()
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Run the import end to end.
    ///
    /// Writes one info entry to `sink` on success, or exactly one error entry
    /// on the first failure. Errors never propagate past this call.
    #[instrument(skip_all, fields(schema = self.schema.name(), input = %self.input.display()))]
    pub fn run(&self, sink: &dyn LogSink) -> RunReport {
        debug!("Starting import into {}", self.connector.describe());
        let mut progress = Progress {
            state: RunState::Start,
            rows_inserted: 0,
        };
        let outcome = self.execute(&mut progress);
        self.finish(progress, outcome, sink)
    }

    /// Only provision the target table.
    #[instrument(skip_all, fields(schema = self.schema.name()))]
    pub fn provision(&self, sink: &dyn LogSink) -> RunReport {
        let mut progress = Progress {
            state: RunState::Start,
            rows_inserted: 0,
        };
        let outcome = self.provision_only(&mut progress);
        self.finish(progress, outcome, sink)
    }

    fn execute(&self, progress: &mut Progress) -> Result<()> {
        let mut session = self.connector.connect().map_err(EtlError::Connect)?;
        progress.advance(RunState::Connected);

        provision::ensure_table(session.as_mut(), self.schema.as_ref())?;
        progress.advance(RunState::SchemaReady);

        let mut writer = RecordWriter::new(self.schema.as_ref(), session.as_ref());
        for (index, raw) in RecordReader::open(&self.input)?.enumerate() {
            let row = index as u64 + 1;
            let enriched = self.schema.transform(&raw?)?;
            progress.advance(RunState::Transformed);

            writer.write(session.as_mut(), row, &enriched)?;
            progress.rows_inserted = writer.rows_written();
            progress.advance(RunState::Inserted);
        }
        debug!("Inserted {} rows", progress.rows_inserted);

        session.close().map_err(EtlError::Close)?;
        progress.advance(RunState::Closed);
        Ok(())
    }

    fn provision_only(&self, progress: &mut Progress) -> Result<()> {
        let mut session = self.connector.connect().map_err(EtlError::Connect)?;
        progress.advance(RunState::Connected);

        provision::ensure_table(session.as_mut(), self.schema.as_ref())?;
        progress.advance(RunState::SchemaReady);

        session.close().map_err(EtlError::Close)?;
        progress.advance(RunState::Closed);
        Ok(())
    }

    fn finish(&self, progress: Progress, outcome: Result<()>, sink: &dyn LogSink) -> RunReport {
        match outcome {
            Ok(()) => {
                sink.info(constants::SUCCESS_MESSAGE);
                RunReport {
                    schema: self.schema.name(),
                    state: RunState::Closed,
                    failed_after: None,
                    rows_inserted: progress.rows_inserted,
                    error: None,
                }
            }
            Err(e) => {
                sink.error(&format!("{}{}", constants::ERROR_MESSAGE_PREFIX, e));
                RunReport {
                    schema: self.schema.name(),
                    state: RunState::Failed,
                    failed_after: Some(progress.state),
                    rows_inserted: progress.rows_inserted,
                    error: Some(e),
                }
            }
        }
    }
}
