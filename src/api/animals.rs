use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;

use super::auth::AdminUser;
use super::form::{self, FormBody};
use super::uploads::{remove_stored_photo, replace_entity_photo};
use super::{with_connection, AppState};
use crate::db::records::{AnimalInput, Animals, PhotoTable};
use crate::error::ApiError;

fn animal_input(body: &FormBody) -> Result<AnimalInput, ApiError> {
    let id_hato = form::integer(body, "id_hato")?.filter(|id| *id != 0);
    let id_especie = form::integer(body, "id_especie")?.filter(|id| *id != 0);
    let (Some(id_hato), Some(id_especie)) = (id_hato, id_especie) else {
        return Err(ApiError::BadRequest(
            "Missing required fields: id_hato, id_especie".to_string(),
        ));
    };

    Ok(AnimalInput {
        id_hato,
        id_especie,
        sexo: form::text(body, "sexo"),
        edad_anios: form::integer(body, "edad_anios")?,
        observaciones: form::text(body, "observaciones"),
    })
}

/// GET /api/animales
pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = with_connection(&state, "Error listing animals", Animals::list).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rows": rows })))
}

/// POST /api/animales
pub async fn create(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<FormBody>,
) -> Result<HttpResponse, ApiError> {
    let input = animal_input(&body)?;
    let id = with_connection(&state, "Error creating animal", move |conn| {
        Animals::create(conn, &input)
    })
    .await?;
    info!("Animal created: id {id}");
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "id_animal": id })))
}

/// PUT /api/animales/{id}
pub async fn update(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<FormBody>,
) -> Result<HttpResponse, ApiError> {
    let id = form::parse_id(&path)?;
    let input = animal_input(&body)?;
    let rows_affected = with_connection(&state, "Error updating animal", move |conn| {
        Animals::update(conn, id, &input)
    })
    .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rowsAffected": rows_affected })))
}

/// DELETE /api/animales/{id}
///
/// Also removes the animal's stored photo once the row is gone.
pub async fn delete(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = form::parse_id(&path)?;
    let removal = with_connection(&state, "Error deleting animal", move |conn| {
        Animals::delete(conn, id)
    })
    .await?;

    if let Some(foto_ruta) = removal.foto_ruta.as_deref() {
        remove_stored_photo(&state.config.uploads_path(), foto_ruta);
    }
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rowsAffected": removal.rows_affected })))
}

/// POST /api/animales/{id}/foto
pub async fn upload_photo(
    _admin: AdminUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    replace_entity_photo(state, PhotoTable::Animal, &path, payload).await
}
