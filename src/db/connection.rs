use log::warn;
use oracle::{Connection, Error as OracleError};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

use super::error::DbError;
use super::query::{QueryExecutor, StatementOutcome};
use super::session::{Session, SessionProvider};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionInfo {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub connect_string: String,
}

impl ConnectionInfo {
    #[cfg(test)]
    pub fn new(username: &str, password: &str, connect_string: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            connect_string: connect_string.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty() && !self.connect_string.is_empty()
    }

    pub fn display_string(&self) -> String {
        if self.is_configured() {
            format!("{}@{}", self.username, self.connect_string)
        } else {
            "(not configured)".to_string()
        }
    }
}

/// Opens one Oracle connection per call. There is no pool: every request
/// gets its own connection and closes it when done.
#[derive(Clone, Debug)]
pub struct OracleConnector {
    info: ConnectionInfo,
}

impl OracleConnector {
    pub fn new(info: ConnectionInfo) -> Self {
        Self { info }
    }

    pub fn connect(&self) -> Result<ScopedConnection, DbError> {
        if !self.info.is_configured() {
            return Err(DbError::NotConfigured);
        }

        let connection = match Connection::connect(
            &self.info.username,
            &self.info.password,
            &self.info.connect_string,
        ) {
            Ok(connection) => connection,
            Err(err) => {
                warn!("Connection error: {err}");
                return Err(err.into());
            }
        };

        Self::apply_default_session_settings(&connection);

        Ok(ScopedConnection {
            connection,
            closed: false,
        })
    }

    fn apply_default_session_settings(conn: &Connection) {
        let statements = [
            "ALTER SESSION SET NLS_TIMESTAMP_FORMAT = 'yyyy-mm-dd hh24:mi:ss'",
            "ALTER SESSION SET NLS_DATE_FORMAT = 'yyyy-mm-dd hh24:mi:ss'",
        ];

        for statement in statements {
            if let Err(err) = conn.execute(statement, &[]) {
                warn!("Failed to apply default session setting `{statement}`: {err}");
            }
        }
    }
}

impl SessionProvider for OracleConnector {
    fn acquire(&self) -> Result<Box<dyn Session>, DbError> {
        Ok(Box::new(OracleSession {
            conn: self.connect()?,
        }))
    }
}

/// An open connection that is closed when it goes out of scope.
pub struct ScopedConnection {
    connection: Connection,
    closed: bool,
}

impl ScopedConnection {
    pub fn close(&mut self) -> Result<(), OracleError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.connection.close()
    }
}

impl Deref for ScopedConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.connection
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("Failed to close Oracle connection: {err}");
        }
    }
}

struct OracleSession {
    conn: ScopedConnection,
}

impl Session for OracleSession {
    fn execute(&mut self, sql: &str) -> Result<StatementOutcome, DbError> {
        Ok(QueryExecutor::execute(&self.conn, sql)?)
    }

    fn commit(&mut self) -> Result<(), DbError> {
        Ok(self.conn.commit()?)
    }

    fn rollback(&mut self) -> Result<(), DbError> {
        Ok(self.conn.rollback()?)
    }

    fn release(&mut self) -> Result<(), DbError> {
        Ok(self.conn.close()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_info_requires_all_fields() {
        assert!(ConnectionInfo::new("reserva", "secret", "//localhost:1521/XEPDB1").is_configured());
        assert!(!ConnectionInfo::new("", "secret", "//localhost:1521/XEPDB1").is_configured());
        assert!(!ConnectionInfo::new("reserva", "", "//localhost:1521/XEPDB1").is_configured());
        assert!(!ConnectionInfo::new("reserva", "secret", "").is_configured());
    }

    #[test]
    fn test_password_is_never_serialized() {
        let info = ConnectionInfo::new("reserva", "secret", "//localhost:1521/XEPDB1");
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("reserva"));
    }

    #[test]
    fn test_display_string() {
        let info = ConnectionInfo::new("reserva", "secret", "//db:1521/XE");
        assert_eq!(info.display_string(), "reserva@//db:1521/XE");
        assert_eq!(ConnectionInfo::default().display_string(), "(not configured)");
    }

    #[test]
    fn test_unconfigured_connector_fails_before_connecting() {
        let connector = OracleConnector::new(ConnectionInfo::default());
        assert!(matches!(connector.connect(), Err(DbError::NotConfigured)));
        assert!(matches!(connector.acquire(), Err(DbError::NotConfigured)));
    }
}
