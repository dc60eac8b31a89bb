//! Configurator API - automation rule editor endpoints

use automation_codec::CodecContext;
use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod rules;

use config::ApiConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<CodecContext>,
}

/// API response wrapper using serde_json::Value for flexibility
#[derive(Debug, Serialize)]
struct ApiResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResponse {
    fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: Some(serde_json::to_value(data).unwrap_or(serde_json::Value::Null)),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/info", get(rules::system_info))
        .route("/api/context", get(rules::get_context))
        .route("/api/rules/decode", post(rules::decode_rule))
        .route("/api/rules/encode", post(rules::encode_rule))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "configurator_api=debug,automation_codec=info,tower_http=debug".into()
            }),
        )
        .init();

    tracing::info!("Starting configurator API server");

    let config = ApiConfig::from_env()?;
    let ctx = match &config.tables {
        Some(path) => config::load_context(path).await,
        None => {
            tracing::info!("CONFIGURATOR_TABLES not set, table checks disabled");
            CodecContext::default()
        }
    };

    let state = AppState { ctx: Arc::new(ctx) };
    let app = router(state);

    tracing::info!("Listening on http://{}", config.bind);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
