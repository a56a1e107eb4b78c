//! Runtime configuration for the webhook receiver.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, net::SocketAddr, path::Path, path::PathBuf};

pub const CONFIG_PATH_VAR: &str = "MSGLOG_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngressConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    #[serde(default)]
    pub secret_token: Option<String>,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            webhook_path: default_webhook_path(),
            log_path: default_log_path(),
            secret_token: None,
        }
    }
}

impl IngressConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("invalid bind address {:?}", self.bind))
    }
}

/// Loads configuration from the process environment, preferring the YAML file
/// named by `MSGLOG_CONFIG` when it exists.
pub fn load_config() -> Result<IngressConfig> {
    load_config_with(|key| std::env::var(key).ok())
}

pub fn load_config_with<F>(lookup: F) -> Result<IngressConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(CONFIG_PATH_VAR) {
        let path = Path::new(&path);
        if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read ingress config {}", path.display()))?;
            let cfg: IngressConfig = serde_yaml_bw::from_str(&raw)
                .with_context(|| format!("parse ingress config {}", path.display()))?;
            return Ok(cfg);
        }
        tracing::warn!(
            path = %path.display(),
            "config file not found; falling back to environment"
        );
    }

    let defaults = IngressConfig::default();
    Ok(IngressConfig {
        bind: lookup("BIND").unwrap_or(defaults.bind),
        webhook_path: lookup("WEBHOOK_PATH").unwrap_or(defaults.webhook_path),
        log_path: lookup("MSGLOG_CSV_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_path),
        secret_token: lookup("TELEGRAM_SECRET_TOKEN").filter(|t| !t.is_empty()),
    })
}

fn default_bind() -> String {
    "0.0.0.0:8000".into()
}

fn default_webhook_path() -> String {
    "/webhook".into()
}

fn default_log_path() -> PathBuf {
    PathBuf::from("db").join("messages.csv")
}
