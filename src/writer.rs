use crate::db::Session;
use crate::error::{EtlError, Result};
use crate::record::{EnrichedRecord, FieldValue};
use crate::schema::{Column, SqlType, TargetSchema};
use crate::transform;
use tracing::debug;

/// Inserts enriched records one at a time, committing after each row.
///
/// A failure leaves every previously written row committed.
pub struct RecordWriter<'a> {
    schema: &'a dyn TargetSchema,
    sql: String,
    rows_written: u64,
}

impl<'a> RecordWriter<'a> {
    pub fn new(schema: &'a dyn TargetSchema, session: &dyn Session) -> Self {
        Self {
            schema,
            sql: schema.insert_sql(session.dialect()),
            rows_written: 0,
        }
    }

    /// Insert `record` as input row `row` (1-based) and commit it.
    pub fn write(
        &mut self,
        session: &mut dyn Session,
        row: u64,
        record: &EnrichedRecord,
    ) -> Result<()> {
        let values = bind_values(self.schema.columns(), record)
            .map_err(|message| EtlError::Insert { row, message })?;

        session
            .execute(&self.sql, &values)
            .and_then(|_| session.commit())
            .map_err(|e| EtlError::Insert {
                row,
                message: e.to_string(),
            })?;

        self.rows_written += 1;
        debug!(row, "inserted row into {}", self.schema.table());
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

/// Look up each column's value by its source key and convert it to the
/// column type, in statement order.
pub fn bind_values(
    columns: &[Column],
    record: &EnrichedRecord,
) -> std::result::Result<Vec<FieldValue>, String> {
    columns
        .iter()
        .map(|column| {
            let value = record.get(column.source_key).ok_or_else(|| {
                format!(
                    "no value for column '{}' (expected field '{}')",
                    column.name, column.source_key
                )
            })?;
            coerce(column, value)
        })
        .collect()
}

fn coerce(column: &Column, value: &FieldValue) -> std::result::Result<FieldValue, String> {
    match (column.sql_type, value) {
        (SqlType::Text, FieldValue::Text(_)) => Ok(value.clone()),
        (SqlType::Text, other) => Ok(FieldValue::Text(other.to_string())),
        (SqlType::Date, FieldValue::Date(_)) => Ok(value.clone()),
        (SqlType::Date, FieldValue::Text(s)) => transform::parse_date(column.source_key, s)
            .map(FieldValue::Date)
            .map_err(|_| type_mismatch(column, s)),
        (SqlType::Integer, FieldValue::Integer(_)) => Ok(value.clone()),
        (SqlType::Integer, FieldValue::Text(s)) => s
            .trim()
            .parse::<i32>()
            .map(FieldValue::Integer)
            .map_err(|_| type_mismatch(column, s)),
        (_, other) => Err(type_mismatch(column, &other.to_string())),
    }
}

fn type_mismatch(column: &Column, value: &str) -> String {
    format!(
        "invalid input syntax for type {} in column '{}': \"{}\"",
        column.sql_type.sql().to_lowercase(),
        column.name,
        value
    )
}
