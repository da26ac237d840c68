use super::{Connector, Dialect, Session};
use crate::config::PostgresConfig;
use crate::error::DbError;
use crate::record::FieldValue;
use postgres::types::ToSql;
use postgres::{Client, NoTls};
use tracing::debug;

pub struct PgConnector {
    config: PostgresConfig,
}

impl PgConnector {
    pub fn new(config: PostgresConfig) -> Self {
        Self { config }
    }

    /// Client settings built from the `[postgresql]` section.
    pub fn client_config(&self) -> postgres::Config {
        let mut client_config = postgres::Config::new();
        client_config
            .host(&self.config.host)
            .port(self.config.port)
            .dbname(&self.config.database)
            .user(&self.config.user)
            .password(&self.config.password);
        client_config
    }
}

impl Connector for PgConnector {
    fn connect(&self) -> Result<Box<dyn Session>, DbError> {
        debug!("Connecting to PostgreSQL at {}", self.describe());
        let client = self.client_config().connect(NoTls)?;
        Ok(Box::new(PgSession::new(client)))
    }

    fn describe(&self) -> String {
        format!(
            "postgresql://{}@{}:{}/{}",
            self.config.user, self.config.host, self.config.port, self.config.database
        )
    }
}

/// A single PostgreSQL connection with explicit transaction control.
pub struct PgSession {
    client: Client,
    in_transaction: bool,
}

impl PgSession {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            in_transaction: false,
        }
    }
}

fn as_pg_param(value: &FieldValue) -> &(dyn ToSql + Sync) {
    match value {
        FieldValue::Text(s) => s,
        FieldValue::Date(d) => d,
        FieldValue::Integer(i) => i,
    }
}

impl Session for PgSession {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn execute(&mut self, sql: &str, params: &[FieldValue]) -> Result<u64, DbError> {
        if !self.in_transaction {
            self.client.batch_execute("BEGIN")?;
            self.in_transaction = true;
        }
        let bound: Vec<&(dyn ToSql + Sync)> = params.iter().map(as_pg_param).collect();
        Ok(self.client.execute(sql, &bound)?)
    }

    fn commit(&mut self) -> Result<(), DbError> {
        if self.in_transaction {
            self.client.batch_execute("COMMIT")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), DbError> {
        // An open transaction is rolled back by the server on disconnect
        self.client.close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postgres::config::Host;

    fn sample() -> PostgresConfig {
        PostgresConfig {
            host: "db.internal".to_string(),
            database: "hr".to_string(),
            user: "etl".to_string(),
            password: "secret".to_string(),
            port: 6543,
        }
    }

    #[test]
    fn client_config_carries_connection_parameters() {
        let client_config = PgConnector::new(sample()).client_config();
        assert_eq!(client_config.get_dbname(), Some("hr"));
        assert_eq!(client_config.get_user(), Some("etl"));
        assert_eq!(client_config.get_password(), Some(&b"secret"[..]));
        assert_eq!(client_config.get_ports(), &[6543]);
        assert!(matches!(
            client_config.get_hosts(),
            [Host::Tcp(host)] if host == "db.internal"
        ));
    }

    #[test]
    fn describe_omits_password() {
        let described = PgConnector::new(sample()).describe();
        assert_eq!(described, "postgresql://etl@db.internal:6543/hr");
        assert!(!described.contains("secret"));
    }
}
