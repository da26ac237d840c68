use crate::constants::{self, EMPLOYEES_TABLE, FULL_NAME_KEY};
use crate::db::Dialect;
use crate::error::Result;
use crate::record::{EnrichedRecord, RawRecord};
use crate::transform;

/// Column storage type, shared by both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Date,
    Integer,
}

impl SqlType {
    pub fn sql(&self) -> &'static str {
        match self {
            SqlType::Text => "VARCHAR",
            SqlType::Date => "DATE",
            SqlType::Integer => "INTEGER",
        }
    }
}

/// A target column and the enriched-record key its value is bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub source_key: &'static str,
}

const fn column(name: &'static str, sql_type: SqlType, source_key: &'static str) -> Column {
    Column {
        name,
        sql_type,
        source_key,
    }
}

/// A generation of the employees table together with its row transform.
///
/// Generations are never reconciled: the deployment picks one and
/// provisioning a table created by another generation leaves it as is.
pub trait TargetSchema: Send + Sync {
    fn name(&self) -> &'static str;

    fn table(&self) -> &'static str {
        EMPLOYEES_TABLE
    }

    /// Insertable columns, in statement order. The `id` key is implicit.
    fn columns(&self) -> &'static [Column];

    fn transform(&self, raw: &RawRecord) -> Result<EnrichedRecord>;

    fn create_table_sql(&self, dialect: Dialect) -> String {
        let mut lines = vec![format!("    {}", dialect.primary_key_column())];
        lines.extend(
            self.columns()
                .iter()
                .map(|c| format!("    {} {}", c.name, c.sql_type.sql())),
        );
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            self.table(),
            lines.join(",\n")
        )
    }

    fn insert_sql(&self, dialect: Dialect) -> String {
        let names: Vec<&str> = self.columns().iter().map(|c| c.name).collect();
        let placeholders: Vec<String> = (1..=names.len()).map(|i| dialect.placeholder(i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table(),
            names.join(", "),
            placeholders.join(", ")
        )
    }
}

const V1_COLUMNS: &[Column] = &[
    column("first_name", SqlType::Text, "first_name"),
    column("last_name", SqlType::Text, "last_name"),
    column("full_name", SqlType::Text, FULL_NAME_KEY),
    column("email", SqlType::Text, "email"),
    column("department", SqlType::Text, "department"),
];

const V2_COLUMNS: &[Column] = &[
    column("full_name", SqlType::Text, FULL_NAME_KEY),
    column("employee_id", SqlType::Text, "Employee ID"),
    column("manager_name", SqlType::Text, "Employee Manager Name"),
    column("join_date", SqlType::Date, transform::V2_JOIN_DATE),
    column("date_of_birth", SqlType::Date, transform::V2_DATE_OF_BIRTH),
    column("employee_age", SqlType::Integer, "Employee Age"),
    column("employee_salary", SqlType::Integer, "Employee Salary"),
    column("employee_department", SqlType::Text, "Employee Department Name"),
];

/// First generation: contact-style rows, all text.
pub struct EmployeesV1;

impl TargetSchema for EmployeesV1 {
    fn name(&self) -> &'static str {
        constants::SCHEMA_V1
    }

    fn columns(&self) -> &'static [Column] {
        V1_COLUMNS
    }

    fn transform(&self, raw: &RawRecord) -> Result<EnrichedRecord> {
        transform::transform_v1(raw)
    }
}

/// Second generation: HR export with dates and integer age/salary.
pub struct EmployeesV2;

impl TargetSchema for EmployeesV2 {
    fn name(&self) -> &'static str {
        constants::SCHEMA_V2
    }

    fn columns(&self) -> &'static [Column] {
        V2_COLUMNS
    }

    fn transform(&self, raw: &RawRecord) -> Result<EnrichedRecord> {
        transform::transform_v2(raw)
    }
}

pub fn create_schema(name: &str) -> Option<Box<dyn TargetSchema>> {
    match name {
        constants::SCHEMA_V1 => Some(Box::new(EmployeesV1)),
        constants::SCHEMA_V2 => Some(Box::new(EmployeesV2)),
        _ => None,
    }
}
