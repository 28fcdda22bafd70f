use actix_web::{web, HttpResponse};
use log::{error, info};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;

use super::auth::AdminUser;
use super::AppState;
use crate::db::{
    split_script_units, DbError, RunFileReport, ScriptRunner, SessionGuard, StatementOutcome,
};
use crate::error::ApiError;

const EXECUTE_DISABLED: &str =
    "Execution disabled. Set ALLOW_EXECUTE=true only in a controlled environment.";
const EXECUTE_FULL_DISABLED: &str =
    "Full file execution disabled. Set ALLOW_EXECUTE_FULL=true only in a controlled environment.";

#[derive(Debug, Deserialize)]
pub struct SqlRequest {
    #[serde(default)]
    pub sql: Option<Value>,
}

impl SqlRequest {
    fn statement(&self) -> Result<String, ApiError> {
        match &self.sql {
            Some(Value::String(sql)) if !sql.trim().is_empty() => Ok(sql.clone()),
            _ => Err(ApiError::BadRequest("Missing sql field in body".to_string())),
        }
    }
}

fn ensure_execute_allowed(state: &AppState) -> Result<(), ApiError> {
    if state.config.allow_execute {
        Ok(())
    } else {
        Err(ApiError::Forbidden(EXECUTE_DISABLED.to_string()))
    }
}

/// POST /api/exec/run
pub async fn run_sql(
    admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<SqlRequest>,
) -> Result<HttpResponse, ApiError> {
    ensure_execute_allowed(&state)?;
    let sql = body.statement()?;

    let preview: String = sql.chars().take(100).collect();
    info!("{} executing SQL: {preview}...", admin.name());

    let sessions = state.sessions.clone();
    let result = web::block(move || -> Result<StatementOutcome, DbError> {
        let mut session = SessionGuard::acquire(sessions.as_ref())?;
        let result = session
            .execute(&sql)
            .and_then(|outcome| session.commit().map(|()| outcome));
        if result.is_err() {
            if let Err(rollback_err) = session.rollback() {
                error!("Rollback failed: {rollback_err}");
            }
        }
        result
    })
    .await?;

    match result {
        Ok(outcome) => {
            info!("SQL executed successfully");
            Ok(HttpResponse::Ok().json(json!({ "ok": true, "result": outcome })))
        }
        Err(err) => {
            error!("Error executing SQL: {err}");
            Err(ApiError::database("Error executing SQL", err))
        }
    }
}

/// POST /api/exec/run-file
///
/// Runs the configured script as one transaction. Both execution flags must
/// be on; they are checked before the file or the database is touched.
pub async fn run_file(
    admin: AdminUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    ensure_execute_allowed(&state)?;
    if !state.config.allow_execute_full {
        return Err(ApiError::Forbidden(EXECUTE_FULL_DISABLED.to_string()));
    }

    let path = state.config.script_path();
    info!("{} running script file {}", admin.name(), path.display());
    let script = web::block(move || fs::read_to_string(path))
        .await?
        .map_err(|err| {
            error!("Could not read SQL file: {err}");
            ApiError::io("Could not read SQL file", err)
        })?;

    let sessions = state.sessions.clone();
    let report = web::block(move || {
        let units = split_script_units(&script);
        RunFileReport::from_result(ScriptRunner::new(sessions.as_ref()).run(&units))
    })
    .await?;

    if report.is_success() {
        Ok(HttpResponse::Ok().json(report))
    } else {
        Ok(HttpResponse::InternalServerError().json(report))
    }
}

static MOCK_TABLES: Lazy<Vec<(&'static str, Value)>> = Lazy::new(|| {
    vec![
        (
            "RESERVA",
            json!([
                {
                    "ID_RESERVA": 1,
                    "NOMBRE": "Reserva Nacional Pampa Galeras Bárbara D'Achille",
                    "UBICACION": "Lucanas, Ayacucho",
                    "SUPERFICIE_HA": 6500,
                    "CATEGORIA": "Reserva Nacional"
                },
                {
                    "ID_RESERVA": 2,
                    "NOMBRE": "Zona de Amortiguamiento Norte",
                    "UBICACION": "Lucanas, Ayacucho",
                    "SUPERFICIE_HA": 2500,
                    "CATEGORIA": "Zona Amortiguamiento"
                }
            ]),
        ),
        (
            "ESPECIE",
            json!([
                {
                    "ID_ESPECIE": 1,
                    "NOMBRE_COMUN": "Vicuña",
                    "NOMBRE_CIENTIFICO": "Vicugna vicugna",
                    "CLASE": "Mammalia",
                    "ESTADO_CONSERVACION": "VU"
                },
                {
                    "ID_ESPECIE": 2,
                    "NOMBRE_COMUN": "Guanaco",
                    "NOMBRE_CIENTIFICO": "Lama guanicoe",
                    "CLASE": "Mammalia",
                    "ESTADO_CONSERVACION": "LC"
                }
            ]),
        ),
        (
            "TURISTA",
            json!([
                { "ID_TURISTA": 1, "NOMBRE": "María", "APELLIDO": "Gonzales", "NACIONALIDAD": "Peruana", "EDAD": 28 },
                { "ID_TURISTA": 2, "NOMBRE": "John", "APELLIDO": "Smith", "NACIONALIDAD": "Estadounidense", "EDAD": 35 }
            ]),
        ),
    ]
});

/// Canned answer for a console statement, without a database.
pub fn mock_response(sql: &str) -> Value {
    let upper = sql.trim().to_uppercase();

    for (table, rows) in MOCK_TABLES.iter() {
        if upper.starts_with(&format!("SELECT * FROM {table}")) {
            let count = rows.as_array().map(Vec::len).unwrap_or_default();
            return json!({ "ok": true, "rows": rows, "rowsAffected": count });
        }
    }

    if ["INSERT", "UPDATE", "DELETE"]
        .iter()
        .any(|keyword| upper.contains(keyword))
    {
        return json!({
            "ok": true,
            "message": "Mock: operation simulated successfully",
            "rowsAffected": 1
        });
    }

    json!({ "ok": true, "message": "Mock query executed", "rows": [] })
}

/// POST /api/exec/run-mock
pub async fn run_mock(
    _admin: AdminUser,
    body: web::Json<SqlRequest>,
) -> Result<HttpResponse, ApiError> {
    let sql = body.statement()?;
    Ok(HttpResponse::Ok().json(mock_response(&sql)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_selects_known_tables() {
        let response = mock_response("select * from especie where 1=1");
        assert_eq!(response["rowsAffected"], 2);
        assert_eq!(response["rows"][0]["NOMBRE_COMUN"], "Vicuña");

        let response = mock_response("  SELECT * FROM TURISTA");
        assert_eq!(response["rows"][1]["NOMBRE"], "John");
    }

    #[test]
    fn test_mock_simulates_dml() {
        let response = mock_response("UPDATE RESERVA SET nombre = 'x'");
        assert_eq!(response["rowsAffected"], 1);
        assert!(response.get("rows").is_none());
    }

    #[test]
    fn test_mock_fallback() {
        let response = mock_response("SELECT nombre FROM HATO");
        assert_eq!(response["rows"], json!([]));
        assert_eq!(response["message"], "Mock query executed");
    }
}
