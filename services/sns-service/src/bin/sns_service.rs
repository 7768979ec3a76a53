use std::time::Duration;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use tower_http::{cors::{AllowOrigin, Any, CorsLayer}, timeout::TimeoutLayer, trace::TraceLayer};

use sns_common::EnvVars;
use sns_service_api::{api_routes, setup_tracing, ApiServerEnv, GlobalState};

fn cors_layer(env: &ApiServerEnv) -> CorsLayer {
    let origins: Vec<HeaderValue> = env.allowed_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, "ignoring invalid CLIENT_ROOT_URL entry: {}", e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_tracing();

    let env = ApiServerEnv::load()?;
    let global_state = GlobalState::new().await?;

    let cors = cors_layer(&env);
    let trace = TraceLayer::new_for_http();

    let app = api_routes(global_state.clone())
        .layer(DefaultBodyLimit::max(env.request_limit_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(env.request_timeout_secs)))
        .layer(cors)
        .layer(trace)
        .with_state(global_state);

    let port = env.port;
    let listener = tokio::net::TcpListener::bind(format!(":::{port}")).await?;

    tracing::info!(app_id = %env.app_id, "LISTENING ON {port}");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
