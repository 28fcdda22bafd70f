use actix_web::{web, HttpResponse};
use serde_json::json;

use super::auth::AdminUser;
use super::form::{self, FormBody};
use super::{with_connection, AppState};
use crate::db::records::{Species, SpeciesInput};
use crate::error::ApiError;

fn species_input(body: &FormBody) -> SpeciesInput {
    SpeciesInput {
        nombre_comun: form::text(body, "nombre_comun"),
        nombre_cientifico: form::text(body, "nombre_cientifico"),
        estado_conservacion: form::text(body, "estado_conservacion"),
        clase: form::text(body, "clase"),
        orden: form::text(body, "orden"),
        familia: form::text(body, "familia"),
    }
}

/// GET /api/especies
pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = with_connection(&state, "Error listing species", Species::list).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rows": rows })))
}

/// POST /api/especies
pub async fn create(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<FormBody>,
) -> Result<HttpResponse, ApiError> {
    let input = species_input(&body);
    let id = with_connection(&state, "Error creating species", move |conn| {
        Species::create(conn, &input)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "id_especie": id })))
}

/// PUT /api/especies/{id}
pub async fn update(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<FormBody>,
) -> Result<HttpResponse, ApiError> {
    let id = form::parse_id(&path)?;
    let input = species_input(&body);
    let rows_affected = with_connection(&state, "Error updating species", move |conn| {
        Species::update(conn, id, &input)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rowsAffected": rows_affected })))
}

/// DELETE /api/especies/{id}
pub async fn delete(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = form::parse_id(&path)?;
    let rows_affected = with_connection(&state, "Error deleting species", move |conn| {
        Species::delete(conn, id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rowsAffected": rows_affected })))
}
