use oracle::{Connection, Error as OracleError};

use super::{execute_counted, in_transaction, insert_returning_id, PhotoTable};
use crate::db::query::{JsonRow, QueryExecutor};

#[derive(Debug, Clone, PartialEq)]
pub struct AnimalInput {
    pub id_hato: i64,
    pub id_especie: i64,
    pub sexo: Option<String>,
    pub edad_anios: Option<i64>,
    pub observaciones: Option<String>,
}

/// Result of deleting an animal: the affected rows and the photo it pointed at.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalRemoval {
    pub rows_affected: u64,
    pub foto_ruta: Option<String>,
}

pub struct Animals;

impl Animals {
    pub fn list(conn: &Connection) -> Result<Vec<JsonRow>, OracleError> {
        QueryExecutor::query_rows(
            conn,
            "SELECT a.id_animal, a.id_hato, a.id_especie, e.nombre_comun AS especie, \
             a.sexo, a.edad_anios, a.fecha_registro, a.observaciones, a.foto_ruta \
             FROM ANIMAL a \
             LEFT JOIN ESPECIE e ON e.id_especie = a.id_especie \
             ORDER BY a.id_animal",
            &[],
        )
    }

    pub fn create(conn: &Connection, input: &AnimalInput) -> Result<i64, OracleError> {
        in_transaction(conn, |conn| {
            insert_returning_id(
                conn,
                "INSERT INTO ANIMAL (id_hato, id_especie, sexo, edad_anios, observaciones) \
                 VALUES (:id_hato, :id_especie, :sexo, :edad_anios, :observaciones) \
                 RETURNING id_animal INTO :new_id",
                &[
                    ("id_hato", &input.id_hato),
                    ("id_especie", &input.id_especie),
                    ("sexo", &input.sexo),
                    ("edad_anios", &input.edad_anios),
                    ("observaciones", &input.observaciones),
                ],
            )
        })
    }

    pub fn update(conn: &Connection, id: i64, input: &AnimalInput) -> Result<u64, OracleError> {
        in_transaction(conn, |conn| {
            execute_counted(
                conn,
                "UPDATE ANIMAL SET id_hato = :id_hato, id_especie = :id_especie, \
                 sexo = :sexo, edad_anios = :edad_anios, observaciones = :observaciones \
                 WHERE id_animal = :id_animal",
                &[
                    ("id_hato", &input.id_hato),
                    ("id_especie", &input.id_especie),
                    ("sexo", &input.sexo),
                    ("edad_anios", &input.edad_anios),
                    ("observaciones", &input.observaciones),
                    ("id_animal", &id),
                ],
            )
        })
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<AnimalRemoval, OracleError> {
        in_transaction(conn, |conn| {
            let foto_ruta = PhotoTable::Animal.current_photo(conn, id)?;
            let rows_affected = execute_counted(
                conn,
                "DELETE FROM ANIMAL WHERE id_animal = :id_animal",
                &[("id_animal", &id)],
            )?;
            Ok(AnimalRemoval {
                rows_affected,
                foto_ruta,
            })
        })
    }
}
