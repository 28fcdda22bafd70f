use oracle::{Connection, Error as OracleError};

use super::{execute_counted, in_transaction, insert_returning_id};
use crate::db::query::{JsonRow, QueryExecutor};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesInput {
    pub nombre_comun: Option<String>,
    pub nombre_cientifico: Option<String>,
    pub estado_conservacion: Option<String>,
    pub clase: Option<String>,
    pub orden: Option<String>,
    pub familia: Option<String>,
}

pub struct Species;

impl Species {
    pub fn list(conn: &Connection) -> Result<Vec<JsonRow>, OracleError> {
        QueryExecutor::query_rows(
            conn,
            "SELECT id_especie, nombre_comun, nombre_cientifico, estado_conservacion, \
             clase, orden, familia \
             FROM ESPECIE ORDER BY nombre_comun",
            &[],
        )
    }

    pub fn create(conn: &Connection, input: &SpeciesInput) -> Result<i64, OracleError> {
        in_transaction(conn, |conn| {
            insert_returning_id(
                conn,
                "INSERT INTO ESPECIE (nombre_comun, nombre_cientifico, estado_conservacion, \
                 clase, orden, familia) \
                 VALUES (:nombre_comun, :nombre_cientifico, :estado_conservacion, \
                 :clase, :orden, :familia) \
                 RETURNING id_especie INTO :new_id",
                &[
                    ("nombre_comun", &input.nombre_comun),
                    ("nombre_cientifico", &input.nombre_cientifico),
                    ("estado_conservacion", &input.estado_conservacion),
                    ("clase", &input.clase),
                    ("orden", &input.orden),
                    ("familia", &input.familia),
                ],
            )
        })
    }

    pub fn update(conn: &Connection, id: i64, input: &SpeciesInput) -> Result<u64, OracleError> {
        in_transaction(conn, |conn| {
            execute_counted(
                conn,
                "UPDATE ESPECIE SET nombre_comun = :nombre_comun, \
                 nombre_cientifico = :nombre_cientifico, \
                 estado_conservacion = :estado_conservacion, \
                 clase = :clase, orden = :orden, familia = :familia \
                 WHERE id_especie = :id_especie",
                &[
                    ("nombre_comun", &input.nombre_comun),
                    ("nombre_cientifico", &input.nombre_cientifico),
                    ("estado_conservacion", &input.estado_conservacion),
                    ("clase", &input.clase),
                    ("orden", &input.orden),
                    ("familia", &input.familia),
                    ("id_especie", &id),
                ],
            )
        })
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<u64, OracleError> {
        in_transaction(conn, |conn| {
            execute_counted(
                conn,
                "DELETE FROM ESPECIE WHERE id_especie = :id_especie",
                &[("id_especie", &id)],
            )
        })
    }
}
