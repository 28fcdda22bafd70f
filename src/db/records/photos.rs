use oracle::{Connection, Error as OracleError};

use super::{execute_counted, in_transaction};
use crate::db::query::QueryExecutor;

/// Tables that carry a `foto_ruta` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoTable {
    Reserve,
    Animal,
    Activity,
}

/// Outcome of pointing a row at a new photo.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoReplacement {
    pub rows_affected: u64,
    pub previous: Option<String>,
}

impl PhotoTable {
    pub fn table(self) -> &'static str {
        match self {
            PhotoTable::Reserve => "RESERVA",
            PhotoTable::Animal => "ANIMAL",
            PhotoTable::Activity => "ACTIVIDAD",
        }
    }

    pub fn id_column(self) -> &'static str {
        match self {
            PhotoTable::Reserve => "id_reserva",
            PhotoTable::Animal => "id_animal",
            PhotoTable::Activity => "id_actividad",
        }
    }

    /// Prefix used when naming stored upload files.
    pub fn file_prefix(self) -> &'static str {
        match self {
            PhotoTable::Reserve => "reserva",
            PhotoTable::Animal => "animal",
            PhotoTable::Activity => "actividad",
        }
    }

    pub fn current_photo(self, conn: &Connection, id: i64) -> Result<Option<String>, OracleError> {
        let sql = format!(
            "SELECT foto_ruta FROM {} WHERE {} = :id",
            self.table(),
            self.id_column()
        );
        let rows = QueryExecutor::query_rows_named(conn, &sql, &[("id", &id)])?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.get("FOTO_RUTA").and_then(|v| v.as_str().map(str::to_string))))
    }

    /// Set `foto_ruta` and return the path it replaced.
    pub fn replace_photo(
        self,
        conn: &Connection,
        id: i64,
        foto_ruta: &str,
    ) -> Result<PhotoReplacement, OracleError> {
        let sql = format!(
            "UPDATE {} SET foto_ruta = :foto_ruta WHERE {} = :id",
            self.table(),
            self.id_column()
        );
        in_transaction(conn, |conn| {
            let previous = self.current_photo(conn, id)?;
            let rows_affected = execute_counted(conn, &sql, &[("foto_ruta", &foto_ruta), ("id", &id)])?;
            Ok(PhotoReplacement {
                rows_affected,
                previous,
            })
        })
    }
}
