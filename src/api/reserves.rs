use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde_json::json;

use super::auth::AdminUser;
use super::form::{self, FormBody};
use super::uploads::replace_entity_photo;
use super::{with_connection, AppState};
use crate::db::records::{PhotoTable, ReserveInput, Reserves};
use crate::error::ApiError;

fn reserve_input(body: &FormBody) -> Result<ReserveInput, ApiError> {
    Ok(ReserveInput {
        nombre: form::required_text(body, "nombre")?,
        ubicacion: form::text(body, "ubicacion"),
        superficie_ha: form::decimal(body, "superficie_ha")?,
        categoria: form::text(body, "categoria"),
    })
}

/// GET /api/reservas
pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = with_connection(&state, "Error listing reserves", Reserves::list).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rows": rows })))
}

/// POST /api/reservas
pub async fn create(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<FormBody>,
) -> Result<HttpResponse, ApiError> {
    let input = reserve_input(&body)?;
    let id = with_connection(&state, "Error creating reserve", move |conn| {
        Reserves::create(conn, &input)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "id_reserva": id })))
}

/// PUT /api/reservas/{id}
pub async fn update(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<FormBody>,
) -> Result<HttpResponse, ApiError> {
    let id = form::parse_id(&path)?;
    let input = reserve_input(&body)?;
    let rows_affected = with_connection(&state, "Error updating reserve", move |conn| {
        Reserves::update(conn, id, &input)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rowsAffected": rows_affected })))
}

/// DELETE /api/reservas/{id}
pub async fn delete(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = form::parse_id(&path)?;
    let rows_affected = with_connection(&state, "Error deleting reserve", move |conn| {
        Reserves::delete(conn, id)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rowsAffected": rows_affected })))
}

/// POST /api/reservas/{id}/foto
pub async fn upload_photo(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    replace_entity_photo(state, PhotoTable::Reserve, &path, payload).await
}
