use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde_json::json;

use super::auth::AdminUser;
use super::form::{self, FormBody};
use super::uploads::replace_entity_photo;
use super::{with_connection, AppState};
use crate::db::records::{parse_activity_date, Activities, ActivityInput, PhotoTable};
use crate::error::ApiError;

fn activity_input(body: &FormBody) -> Result<ActivityInput, ApiError> {
    let fecha_realizacion = match form::text(body, "fecha_realizacion") {
        Some(text) => Some(parse_activity_date(&text).ok_or_else(|| {
            ApiError::BadRequest("Invalid fecha_realizacion, expected YYYY-MM-DD".to_string())
        })?),
        None => None,
    };

    Ok(ActivityInput {
        nombre: form::required_text(body, "nombre")?,
        tipo: form::text(body, "tipo"),
        lugar: form::text(body, "lugar"),
        fecha_realizacion,
        duracion_min: form::integer(body, "duracion_min")?,
        costo_soles: form::decimal(body, "costo_soles")?,
    })
}

/// GET /api/actividades
pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = with_connection(&state, "Error listing activities", Activities::list).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rows": rows })))
}

/// POST /api/actividades
pub async fn create(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<FormBody>,
) -> Result<HttpResponse, ApiError> {
    let input = activity_input(&body)?;
    let id = with_connection(&state, "Error creating activity", move |conn| {
        Activities::create(conn, &input)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "id_actividad": id })))
}

/// PUT /api/actividades/{id}
pub async fn update(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<FormBody>,
) -> Result<HttpResponse, ApiError> {
    let id = form::parse_id(&path)?;
    let input = activity_input(&body)?;
    let rows_affected = with_connection(&state, "Error updating activity", move |conn| {
        Activities::update(conn, id, &input)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rowsAffected": rows_affected })))
}

/// DELETE /api/actividades/{id}
pub async fn delete(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = form::parse_id(&path)?;
    let rows_affected = with_connection(&state, "Error deleting activity", move |conn| {
        Activities::delete(conn, id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rowsAffected": rows_affected })))
}

/// POST /api/actividades/{id}/foto
pub async fn upload_photo(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    replace_entity_photo(state, PhotoTable::Activity, &path, payload).await
}
