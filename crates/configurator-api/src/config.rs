//! Environment configuration and codec table loading

use anyhow::Context;
use automation_codec::CodecContext;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::fs;

const DEFAULT_BIND: &str = "0.0.0.0:7780";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    /// JSON file holding the counter limits and access users
    pub tables: Option<PathBuf>,
}

impl ApiConfig {
    /// Read `CONFIGURATOR_BIND` and `CONFIGURATOR_TABLES`
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(
            std::env::var("CONFIGURATOR_BIND").ok(),
            std::env::var("CONFIGURATOR_TABLES").ok(),
        )
    }

    fn from_vars(bind: Option<String>, tables: Option<String>) -> anyhow::Result<Self> {
        let bind = bind.unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind
            .parse()
            .with_context(|| format!("invalid CONFIGURATOR_BIND address {bind:?}"))?;
        Ok(Self {
            bind,
            tables: tables.filter(|path| !path.is_empty()).map(PathBuf::from),
        })
    }
}

/// Load the codec tables from a JSON file, falling back to an empty context
pub async fn load_context(path: &Path) -> CodecContext {
    match fs::read_to_string(path).await {
        Ok(contents) => match serde_json::from_str::<CodecContext>(&contents) {
            Ok(ctx) => {
                tracing::info!(
                    "Loaded {} counter limits and {} access users from {:?}",
                    ctx.counter_limits.len(),
                    ctx.access_users.len(),
                    path
                );
                ctx
            }
            Err(e) => {
                tracing::warn!("Failed to parse tables file {:?}: {}", path, e);
                CodecContext::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No tables file found at {:?}, table checks disabled", path);
            CodecContext::default()
        }
        Err(e) => {
            tracing::warn!("Failed to read tables file {:?}: {}", path, e);
            CodecContext::default()
        }
    }
}
