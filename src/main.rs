mod api;
mod app;
mod db;
mod error;
mod logging;
mod utils;

use utils::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    logging::init_logging(&config.log_level)?;
    app::run(config).await
}
