use std::env;
use std::path::PathBuf;

use anyhow::Context;

/// Environment-driven configuration, in the management console's style.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the console backend, e.g. `https://pve.example.com:8006`.
    pub base_url: String,
    /// Path the browser is sent to for reauthentication.
    pub signin_path: String,
    /// Directory holding the persisted activity buffer.
    pub state_dir: PathBuf,
    pub verify_tls: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = env::var("CONSOLE_BASE_URL")
            .context("CONSOLE_BASE_URL is not set")?
            .trim()
            .trim_end_matches('/')
            .to_string();
        let signin_path =
            env::var("CONSOLE_SIGNIN_PATH").unwrap_or_else(|_| "/login".to_string());
        let state_dir = env::var("CONSOLE_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        Ok(Self {
            base_url,
            signin_path,
            state_dir,
            verify_tls: env_flag("VERIFY_SSL", false),
        })
    }

    /// Fallback reauthentication URL for expired-session replies that carry
    /// no redirect of their own.
    pub fn signin_url(&self) -> String {
        format!("{}{}", self.base_url, self.signin_path)
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "y"
        ),
        Err(_) => default,
    }
}
