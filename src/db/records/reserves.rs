use oracle::{Connection, Error as OracleError};

use super::{execute_counted, in_transaction, insert_returning_id};
use crate::db::query::{JsonRow, QueryExecutor};

#[derive(Debug, Clone, PartialEq)]
pub struct ReserveInput {
    pub nombre: String,
    pub ubicacion: Option<String>,
    pub superficie_ha: Option<f64>,
    pub categoria: Option<String>,
}

pub struct Reserves;

impl Reserves {
    pub fn list(conn: &Connection) -> Result<Vec<JsonRow>, OracleError> {
        QueryExecutor::query_rows(
            conn,
            "SELECT id_reserva, nombre, ubicacion, superficie_ha, categoria, foto_ruta \
             FROM RESERVA ORDER BY nombre",
            &[],
        )
    }

    pub fn create(conn: &Connection, input: &ReserveInput) -> Result<i64, OracleError> {
        in_transaction(conn, |conn| {
            insert_returning_id(
                conn,
                "INSERT INTO RESERVA (nombre, ubicacion, superficie_ha, categoria) \
                 VALUES (:nombre, :ubicacion, :superficie_ha, :categoria) \
                 RETURNING id_reserva INTO :new_id",
                &[
                    ("nombre", &input.nombre),
                    ("ubicacion", &input.ubicacion),
                    ("superficie_ha", &input.superficie_ha),
                    ("categoria", &input.categoria),
                ],
            )
        })
    }

    pub fn update(conn: &Connection, id: i64, input: &ReserveInput) -> Result<u64, OracleError> {
        in_transaction(conn, |conn| {
            execute_counted(
                conn,
                "UPDATE RESERVA SET nombre = :nombre, ubicacion = :ubicacion, \
                 superficie_ha = :superficie_ha, categoria = :categoria \
                 WHERE id_reserva = :id_reserva",
                &[
                    ("nombre", &input.nombre),
                    ("ubicacion", &input.ubicacion),
                    ("superficie_ha", &input.superficie_ha),
                    ("categoria", &input.categoria),
                    ("id_reserva", &id),
                ],
            )
        })
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<u64, OracleError> {
        in_transaction(conn, |conn| {
            execute_counted(
                conn,
                "DELETE FROM RESERVA WHERE id_reserva = :id_reserva",
                &[("id_reserva", &id)],
            )
        })
    }
}
