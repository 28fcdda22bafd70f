use chrono::NaiveDate;
use oracle::{Connection, Error as OracleError};

use super::{execute_counted, in_transaction, insert_returning_id};
use crate::db::query::{JsonRow, QueryExecutor};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityInput {
    pub nombre: String,
    pub tipo: Option<String>,
    pub lugar: Option<String>,
    pub fecha_realizacion: Option<NaiveDate>,
    pub duracion_min: Option<i64>,
    pub costo_soles: Option<f64>,
}

impl ActivityInput {
    /// The date as the `YYYY-MM-DD` text bound into `TO_DATE`.
    fn fecha_text(&self) -> Option<String> {
        self.fecha_realizacion
            .map(|date| date.format(DATE_FORMAT).to_string())
    }
}

/// Parse a `YYYY-MM-DD` date as sent by the activity form.
pub fn parse_activity_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

pub struct Activities;

impl Activities {
    pub fn list(conn: &Connection) -> Result<Vec<JsonRow>, OracleError> {
        QueryExecutor::query_rows(
            conn,
            "SELECT id_actividad, nombre, tipo, lugar, fecha_realizacion, duracion_min, \
             costo_soles, foto_ruta \
             FROM ACTIVIDAD ORDER BY nombre",
            &[],
        )
    }

    pub fn create(conn: &Connection, input: &ActivityInput) -> Result<i64, OracleError> {
        let fecha = input.fecha_text();
        in_transaction(conn, |conn| {
            insert_returning_id(
                conn,
                "INSERT INTO ACTIVIDAD (nombre, tipo, lugar, fecha_realizacion, \
                 duracion_min, costo_soles) \
                 VALUES (:nombre, :tipo, :lugar, TO_DATE(:fecha_realizacion, 'YYYY-MM-DD'), \
                 :duracion_min, :costo_soles) \
                 RETURNING id_actividad INTO :new_id",
                &[
                    ("nombre", &input.nombre),
                    ("tipo", &input.tipo),
                    ("lugar", &input.lugar),
                    ("fecha_realizacion", &fecha),
                    ("duracion_min", &input.duracion_min),
                    ("costo_soles", &input.costo_soles),
                ],
            )
        })
    }

    pub fn update(conn: &Connection, id: i64, input: &ActivityInput) -> Result<u64, OracleError> {
        let fecha = input.fecha_text();
        in_transaction(conn, |conn| {
            execute_counted(
                conn,
                "UPDATE ACTIVIDAD SET nombre = :nombre, tipo = :tipo, lugar = :lugar, \
                 fecha_realizacion = TO_DATE(:fecha_realizacion, 'YYYY-MM-DD'), \
                 duracion_min = :duracion_min, costo_soles = :costo_soles \
                 WHERE id_actividad = :id_actividad",
                &[
                    ("nombre", &input.nombre),
                    ("tipo", &input.tipo),
                    ("lugar", &input.lugar),
                    ("fecha_realizacion", &fecha),
                    ("duracion_min", &input.duracion_min),
                    ("costo_soles", &input.costo_soles),
                    ("id_actividad", &id),
                ],
            )
        })
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<u64, OracleError> {
        in_transaction(conn, |conn| {
            execute_counted(
                conn,
                "DELETE FROM ACTIVIDAD WHERE id_actividad = :id_actividad",
                &[("id_actividad", &id)],
            )
        })
    }
}
