use oracle::Error as OracleError;
use thiserror::Error;

/// Errors raised while talking to the database.
#[derive(Error, Debug)]
pub enum DbError {
    #[error(
        "Oracle connection not configured. Set ORACLE_USER, ORACLE_PASSWORD, ORACLE_CONNECT_STRING in environment."
    )]
    NotConfigured,

    #[error("{0}")]
    Oracle(#[from] OracleError),

    /// Failure reported by a non-Oracle session implementation.
    #[cfg(test)]
    #[error("{0}")]
    Driver(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_message_names_variables() {
        let message = DbError::NotConfigured.to_string();
        assert!(message.contains("ORACLE_USER"));
        assert!(message.contains("ORACLE_CONNECT_STRING"));
    }

    #[test]
    fn test_driver_message_is_passed_through() {
        let err = DbError::Driver("ORA-00942: table or view does not exist".to_string());
        assert_eq!(err.to_string(), "ORA-00942: table or view does not exist");
    }
}
