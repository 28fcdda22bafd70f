mod activities;
mod animals;
mod herds;
mod photos;
mod reserves;
mod species;

pub use activities::*;
pub use animals::*;
pub use herds::*;
pub use photos::*;
pub use reserves::*;
pub use species::*;

use log::warn;
use oracle::sql_type::{OracleType, ToSql};
use oracle::{Connection, Error as OracleError, ErrorKind};

/// Run `work` and commit, or roll back if it fails.
pub(crate) fn in_transaction<T, F>(conn: &Connection, work: F) -> Result<T, OracleError>
where
    F: FnOnce(&Connection) -> Result<T, OracleError>,
{
    match work(conn) {
        Ok(value) => {
            conn.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = conn.rollback() {
                warn!("Rollback failed: {rollback_err}");
            }
            Err(err)
        }
    }
}

/// Execute an `INSERT ... RETURNING <id> INTO :new_id` and return the new id.
pub(crate) fn insert_returning_id(
    conn: &Connection,
    sql: &str,
    params: &[(&str, &dyn ToSql)],
) -> Result<i64, OracleError> {
    let id_type = OracleType::Number(0, 0);
    let mut binds: Vec<(&str, &dyn ToSql)> = params.to_vec();
    binds.push(("new_id", &id_type));

    let mut stmt = conn.statement(sql).build()?;
    stmt.execute_named(&binds)?;
    let ids: Vec<i64> = stmt.returned_values("new_id")?;
    first_returned_id(ids)
}

fn first_returned_id(ids: Vec<i64>) -> Result<i64, OracleError> {
    ids.into_iter().next().ok_or_else(|| {
        OracleError::new(
            ErrorKind::NoDataFound,
            "INSERT returned no id for :new_id",
        )
    })
}

/// Execute a single named-bind DML statement and return the affected row count.
pub(crate) fn execute_counted(
    conn: &Connection,
    sql: &str,
    params: &[(&str, &dyn ToSql)],
) -> Result<u64, OracleError> {
    let stmt = conn.execute_named(sql, params)?;
    stmt.row_count()
}
