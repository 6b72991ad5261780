use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize tracing from `LOG_FORMAT` (json|pretty) and `LOG_LEVEL`.
pub fn init() {
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));

    match format.to_lowercase().as_str() {
        "pretty" | "compact" | "text" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .compact(),
                )
                .init();
        }
        _ => {
            // CloudWatch stamps the ingestion time, so the json layer
            // skips its own timestamp.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .flatten_event(true)
                        .without_time(),
                )
                .init();
        }
    }
}
