use oracle::{Connection, Error as OracleError};

use crate::db::query::{JsonRow, QueryExecutor};

/// Herds are read-only here; they feed the animal form's selects.
pub struct Herds;

impl Herds {
    pub fn list(conn: &Connection) -> Result<Vec<JsonRow>, OracleError> {
        QueryExecutor::query_rows(
            conn,
            "SELECT h.id_hato, r.nombre AS reserva, h.zona, h.cantidad_animales \
             FROM HATO h \
             LEFT JOIN RESERVA r ON r.id_reserva = h.id_reserva \
             ORDER BY h.id_hato",
            &[],
        )
    }
}
