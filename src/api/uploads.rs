use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures_util::StreamExt;
use log::{error, info, warn};
use serde_json::json;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::form::parse_id;
use super::{with_connection, AppState};
use crate::db::records::PhotoTable;
use crate::error::ApiError;

pub const PHOTO_FIELD: &str = "foto";
const UPLOADS_PREFIX: &str = "/uploads/";
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// An uploaded image held in memory before it is written to disk.
#[derive(Debug)]
pub struct ReceivedPhoto {
    pub extension: String,
    pub bytes: Vec<u8>,
}

fn extension_of(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// A stored file name is a single plain path component.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && !name.starts_with('.')
}

pub fn stored_file_name(table: PhotoTable, id: i64, millis: i64, extension: &str) -> String {
    format!("{}-{}-{}.{}", table.file_prefix(), id, millis, extension)
}

/// Map a `foto_ruta` value back to its file under `uploads_dir`.
pub fn photo_file_path(uploads_dir: &Path, foto_ruta: &str) -> Option<PathBuf> {
    let name = foto_ruta.strip_prefix(UPLOADS_PREFIX)?;
    is_safe_file_name(name).then(|| uploads_dir.join(name))
}

/// Read the `foto` field from a multipart body, enforcing type and size.
pub async fn receive_photo(mut payload: Multipart, max_bytes: usize) -> Result<ReceivedPhoto, ApiError> {
    let mut received: Option<ReceivedPhoto> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|err| ApiError::BadRequest(format!("Invalid upload: {err}")))?;

        if field.name() != Some(PHOTO_FIELD) || received.is_some() {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|err| ApiError::BadRequest(format!("Invalid upload: {err}")))?;
            }
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        let extension = extension_of(&file_name)
            .ok_or_else(|| ApiError::BadRequest("Only image files are allowed".to_string()))?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|err| ApiError::BadRequest(format!("Invalid upload: {err}")))?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(ApiError::PayloadTooLarge(format!(
                    "File too large (limit {max_bytes} bytes)"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        received = Some(ReceivedPhoto { extension, bytes });
    }

    received.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))
}

fn remove_file_quietly(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!("Could not remove {}: {err}", path.display()),
    }
}

/// Remove the file a `foto_ruta` points at, if it lives in `uploads_dir`.
pub fn remove_stored_photo(uploads_dir: &Path, foto_ruta: &str) {
    if let Some(path) = photo_file_path(uploads_dir, foto_ruta) {
        remove_file_quietly(&path);
    }
}

/// Store an uploaded photo and point the row at it.
///
/// The previous photo file is removed once the row is updated; the new file
/// is removed again if the update fails.
pub async fn replace_entity_photo(
    state: web::Data<AppState>,
    table: PhotoTable,
    raw_id: &str,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(raw_id)?;
    let photo = receive_photo(payload, state.config.max_upload_bytes).await?;

    let uploads_dir = state.config.uploads_path();
    let file_name = stored_file_name(table, id, Utc::now().timestamp_millis(), &photo.extension);
    let file_path = uploads_dir.join(&file_name);

    let write_dir = uploads_dir.clone();
    let write_path = file_path.clone();
    web::block(move || -> io::Result<()> {
        fs::create_dir_all(&write_dir)?;
        fs::write(&write_path, &photo.bytes)
    })
    .await?
    .map_err(|err| ApiError::io("Could not store photo", err))?;

    let foto_ruta = format!("{UPLOADS_PREFIX}{file_name}");
    let update_ruta = foto_ruta.clone();
    let replaced = with_connection(&state, "Error uploading photo", move |conn| {
        table.replace_photo(conn, id, &update_ruta)
    })
    .await;

    let replaced = match replaced {
        Ok(replaced) => replaced,
        Err(err) => {
            remove_file_quietly(&file_path);
            return Err(err);
        }
    };

    if let Some(previous) = replaced.previous.as_deref() {
        if previous != foto_ruta {
            remove_stored_photo(&uploads_dir, previous);
        }
    }

    info!("Stored photo {file_name} for {} {id}", table.table());
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "foto_ruta": foto_ruta,
        "rowsAffected": replaced.rows_affected
    })))
}

fn content_type_for(name: &str) -> ContentType {
    let mime = match extension_of(name).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    match mime.parse() {
        Ok(mime) => ContentType(mime),
        Err(_) => ContentType::octet_stream(),
    }
}

/// GET /uploads/{file}
pub async fn serve_upload(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();
    if !is_safe_file_name(&name) {
        return Err(ApiError::NotFound("File not found".to_string()));
    }

    let file_path = state.config.uploads_path().join(&name);
    let bytes = web::block(move || fs::read(file_path)).await?;
    match bytes {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .insert_header(content_type_for(&name))
            .body(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(ApiError::NotFound("File not found".to_string()))
        }
        Err(err) => {
            error!("Could not read upload {name}: {err}");
            Err(ApiError::io("Could not read file", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_whitelist() {
        assert_eq!(extension_of("vicuña.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("mapa.webp").as_deref(), Some("webp"));
        assert_eq!(extension_of("script.sql"), None);
        assert_eq!(extension_of("sin_extension"), None);
    }

    #[test]
    fn test_safe_file_names() {
        assert!(is_safe_file_name("animal-3-1700000000000.png"));
        assert!(!is_safe_file_name("../proyect.sql"));
        assert!(!is_safe_file_name("a/b.png"));
        assert!(!is_safe_file_name("a\\b.png"));
        assert!(!is_safe_file_name(".."));
        assert!(!is_safe_file_name(".env"));
        assert!(!is_safe_file_name(""));
    }

    #[test]
    fn test_stored_file_name() {
        assert_eq!(
            stored_file_name(PhotoTable::Animal, 3, 1700000000000, "png"),
            "animal-3-1700000000000.png"
        );
    }

    #[test]
    fn test_photo_file_path_stays_in_uploads() {
        let dir = Path::new("/srv/uploads");
        assert_eq!(
            photo_file_path(dir, "/uploads/reserva-1-5.jpg"),
            Some(PathBuf::from("/srv/uploads/reserva-1-5.jpg"))
        );
        assert_eq!(photo_file_path(dir, "/uploads/../proyect.sql"), None);
        assert_eq!(photo_file_path(dir, "/etc/passwd"), None);
    }

    #[test]
    fn test_remove_stored_photo() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("animal-1-1.png");
        fs::write(&file, b"png").unwrap();

        remove_stored_photo(dir.path(), "/uploads/animal-1-1.png");
        assert!(!file.exists());
        // Missing files are ignored.
        remove_stored_photo(dir.path(), "/uploads/animal-1-1.png");
    }
}
