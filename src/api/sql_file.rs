use actix_web::{web, HttpResponse};
use log::error;
use serde_json::json;
use std::fs;

use super::AppState;
use crate::db::split_sections;
use crate::error::ApiError;

async fn read_script(state: &web::Data<AppState>) -> Result<(String, String), ApiError> {
    let path = state.config.script_path();
    let display = path.display().to_string();
    let content = web::block(move || fs::read_to_string(path))
        .await?
        .map_err(|err| {
            error!("Could not read SQL file {display}: {err}");
            ApiError::io("Could not read SQL file", err)
        })?;
    Ok((state.config.sql_file_path.clone(), content))
}

/// GET /api/sql/raw
pub async fn raw(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let (path, content) = read_script(&state).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "path": path, "content": content })))
}

/// GET /api/sql/sections
pub async fn sections(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let (_, content) = read_script(&state).await?;
    let sections = split_sections(&content);
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "sections": sections })))
}
