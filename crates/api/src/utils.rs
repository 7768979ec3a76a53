use axum::http::{header, HeaderMap};
use sns_common::optional_env_var;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The ID token of the `Authorization` header. A `Bearer ` prefix is optional.
pub fn extract_id_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => value,
    };

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Installs the global subscriber. `LOG_LEVEL` takes an `EnvFilter` directive;
/// `IS_LOGGER_SILENT` turns all output off.
pub fn setup_tracing() {
    let directive = if optional_env_var("IS_LOGGER_SILENT").is_some() {
        "off".to_string()
    } else {
        optional_env_var("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    };

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("invalid LOG_LEVEL '{}' ({}), using {}", directive, e, DEFAULT_LOG_LEVEL);
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    });

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {}", e);
    }
}
