pub mod activities;
pub mod animals;
pub mod auth;
pub mod exec;
pub mod form;
pub mod herds;
pub mod reserves;
pub mod species;
pub mod sql_file;
pub mod uploads;


use actix_web::{web, HttpResponse};
use log::error;
use oracle::{Connection, Error as OracleError};
use serde_json::json;
use std::sync::Arc;

use crate::db::{DbError, OracleConnector, SessionProvider};
use crate::error::ApiError;
use crate::utils::AppConfig;
use auth::JwtAuth;

/// Shared application state, registered once as `web::Data`.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub connector: OracleConnector,
    pub sessions: Arc<dyn SessionProvider>,
    pub auth: JwtAuth,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let sessions: Arc<dyn SessionProvider> =
            Arc::new(OracleConnector::new(config.database.clone()));
        Self::with_sessions(config, sessions)
    }

    /// Build state whose script runs go through `sessions` instead of Oracle.
    pub fn with_sessions(config: AppConfig, sessions: Arc<dyn SessionProvider>) -> Self {
        let auth = JwtAuth::new(&config.jwt_secret);
        let connector = OracleConnector::new(config.database.clone());
        Self {
            config: Arc::new(config),
            connector,
            sessions,
            auth,
        }
    }
}

/// Open a connection on the blocking pool and run `work` on it.
///
/// Failures are logged and reported as `{error: context, details}`.
pub async fn with_connection<T, F>(
    state: &web::Data<AppState>,
    context: &'static str,
    work: F,
) -> Result<T, ApiError>
where
    F: FnOnce(&Connection) -> Result<T, OracleError> + Send + 'static,
    T: Send + 'static,
{
    let connector = state.connector.clone();
    let result = web::block(move || -> Result<T, DbError> {
        let conn = connector.connect()?;
        Ok(work(&*conn)?)
    })
    .await?;

    result.map_err(|err| {
        error!("{context}: {err}");
        ApiError::database(context, err)
    })
}

/// JSON body settings: size limit plus errors in the `{error, details}` shape.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let details = err.to_string();
            ApiError::BadRequest(format!("Invalid JSON body: {details}")).into()
        })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health))
        .route("/uploads/{file}", web::get().to(uploads::serve_upload))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(auth::login))
                        .route("/config", web::get().to(auth::auth_config)),
                )
                .service(
                    web::scope("/exec")
                        .route("/run", web::post().to(exec::run_sql))
                        .route("/run-file", web::post().to(exec::run_file))
                        .route("/run-mock", web::post().to(exec::run_mock)),
                )
                .service(
                    web::scope("/sql")
                        .route("/raw", web::get().to(sql_file::raw))
                        .route("/sections", web::get().to(sql_file::sections)),
                )
                .service(
                    web::scope("/reservas")
                        .route("", web::get().to(reserves::list))
                        .route("", web::post().to(reserves::create))
                        .route("/{id}", web::put().to(reserves::update))
                        .route("/{id}", web::delete().to(reserves::delete))
                        .route("/{id}/foto", web::post().to(reserves::upload_photo)),
                )
                .service(
                    web::scope("/especies")
                        .route("", web::get().to(species::list))
                        .route("", web::post().to(species::create))
                        .route("/{id}", web::put().to(species::update))
                        .route("/{id}", web::delete().to(species::delete)),
                )
                .service(web::scope("/hatos").route("", web::get().to(herds::list)))
                .service(
                    web::scope("/animales")
                        .route("", web::get().to(animals::list))
                        .route("", web::post().to(animals::create))
                        .route("/{id}", web::put().to(animals::update))
                        .route("/{id}", web::delete().to(animals::delete))
                        .route("/{id}/foto", web::post().to(animals::upload_photo)),
                )
                .service(
                    web::scope("/actividades")
                        .route("", web::get().to(activities::list))
                        .route("", web::post().to(activities::create))
                        .route("/{id}", web::put().to(activities::update))
                        .route("/{id}", web::delete().to(activities::delete))
                        .route("/{id}/foto", web::post().to(activities::upload_photo)),
                ),
        );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Reserve backend up. Use /api/sql or /api/exec"
    }))
}
