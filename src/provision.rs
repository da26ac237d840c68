use crate::db::Session;
use crate::error::{EtlError, Result};
use crate::schema::TargetSchema;
use tracing::debug;

/// Create the generation's table if it does not exist yet, then commit.
///
/// Safe to call on every run. An existing table is left untouched, even one
/// created by a different schema generation.
pub fn ensure_table(session: &mut dyn Session, schema: &dyn TargetSchema) -> Result<()> {
    let sql = schema.create_table_sql(session.dialect());
    debug!(schema = schema.name(), "{}", sql);

    session
        .execute(&sql, &[])
        .and_then(|_| session.commit())
        .map_err(|source| EtlError::Schema {
            table: schema.table().to_string(),
            source,
        })?;

    debug!(schema = schema.name(), "Table '{}' is ready", schema.table());
    Ok(())
}
