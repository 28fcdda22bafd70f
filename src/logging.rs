use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

const NOISY_TARGETS: &[(&str, &str)] = &[
    ("actix_server", "warn"),
    ("actix_http", "warn"),
    ("h2", "warn"),
    ("mio", "warn"),
];

fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    let mut directives = vec![level.to_string()];
    for (target, lvl) in NOISY_TARGETS {
        directives.push(format!("{target}={lvl}"));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", filter_str, e))
}

/// Install the global subscriber. `RUST_LOG`, when set, wins over `level`.
///
/// `log` records from the handlers reach it through `tracing_log::LogTracer`.
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    tracing_log::LogTracer::init().ok();

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_env_filter(level)?,
    };

    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_names(true),
        )
        .with(filter);

    // LogTracer is installed above, so only the tracing dispatcher is set here.
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_plain_levels() {
        assert!(build_env_filter("info").is_ok());
        assert!(build_env_filter("debug").is_ok());
    }

    #[test]
    fn test_filter_rejects_garbage() {
        assert!(build_env_filter("reserve_admin=loudest").is_err());
    }
}
