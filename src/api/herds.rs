use actix_web::{web, HttpResponse};
use serde_json::json;

use super::{with_connection, AppState};
use crate::db::records::Herds;
use crate::error::ApiError;

/// GET /api/hatos
pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rows = with_connection(&state, "Error listing herds", Herds::list).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "rows": rows })))
}
