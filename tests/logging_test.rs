use employee_etl::constants::DEFAULT_LOG_FILTER;
use employee_etl::db::SqliteConnector;
use employee_etl::logging::TracingSink;
use employee_etl::schema::EmployeesV1;
use employee_etl::{Pipeline, RunReport};
use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tracing_subscriber::EnvFilter;

const V1_HEADER: &str = "first_name,last_name,email,department";

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run a v1 import over `lines` through the tracing sink, with the default
/// production filter, and return what reached the log.
fn run_logged(lines: &[&str]) -> (RunReport, Vec<String>) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("employees.csv");
    fs::write(&input, format!("{}\n", lines.join("\n"))).unwrap();

    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(DEFAULT_LOG_FILTER))
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();

    let pipeline = Pipeline::new(
        Box::new(SqliteConnector::new(dir.path().join("etl.db"))),
        Box::new(EmployeesV1),
        &input,
    );
    let report = tracing::subscriber::with_default(subscriber, || pipeline.run(&TracingSink));
    (report, log.lines())
}

#[test]
fn successful_run_writes_a_single_info_line() {
    let (report, lines) = run_logged(&[V1_HEADER]);

    assert!(report.is_success(), "{:?}", report.error);
    assert_eq!(lines.len(), 1, "{lines:#?}");
    assert!(lines[0].contains("INFO"), "{}", lines[0]);
    assert!(lines[0].ends_with("ETL process completed successfully."), "{}", lines[0]);
}

#[test]
fn failed_run_writes_a_single_error_line() {
    let (report, lines) = run_logged(&[
        "first_name,last_name,department",
        "Ada,Lovelace,Research",
    ]);

    assert!(!report.is_success());
    assert_eq!(lines.len(), 1, "{lines:#?}");
    assert!(lines[0].contains("ERROR"), "{}", lines[0]);
    assert!(lines[0].contains("An error occurred: "), "{}", lines[0]);
}
