use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use log::{info, warn};

use crate::api::{configure_routes, json_config, AppState};
use crate::utils::AppConfig;

/// Serve the HTTP API until shutdown.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    if config.database.is_configured() {
        info!("Oracle target: {}", config.database.display_string());
    } else {
        warn!("Oracle connection not configured; database endpoints will fail until ORACLE_* is set");
    }
    info!(
        "Execution console: run={} run-file={} script={}",
        config.allow_execute, config.allow_execute_full, config.sql_file_path
    );

    let bind_addr = config.bind_address();
    let json_limit = config.json_limit_bytes;
    let state = web::Data::new(AppState::new(config));

    info!("Starting HTTP server on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .app_data(json_config(json_limit))
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    info!("Server shutdown complete");
    Ok(())
}
