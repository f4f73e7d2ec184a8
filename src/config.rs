use std::{env, path::PathBuf};

/// Fallback backend origin used when running locally without `HMS_BACKEND_URL`.
pub const LOCAL_BACKEND_URL: &str = "http://localhost:8001";

/// Default location of the durable token file.
pub const DEFAULT_TOKEN_PATH: &str = ".medcare/session.json";

/// ClientConfig
///
/// Holds the client core's entire configuration state. Loaded once at startup and
/// shared (by clone) with the HTTP client and the token store, so every component
/// sees the same backend and storage location for the lifetime of the process.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    // Backend origin, without the `/api` suffix (e.g. `http://localhost:8001`).
    pub backend_url: String,
    // File backing the durable token entry.
    pub token_path: PathBuf,
    // Runtime environment marker. Selects the log format and the fail-fast rules.
    pub env: Env,
}

/// Env
///
/// Defines the runtime context. Local runs get developer defaults and pretty logs,
/// production runs demand an explicit backend and emit JSON logs.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for ClientConfig {
    /// default
    ///
    /// Provides a safe, non-panicking ClientConfig for test setup, without needing
    /// any environment variables to be present.
    fn default() -> Self {
        Self {
            backend_url: LOCAL_BACKEND_URL.to_string(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            env: Env::Local,
        }
    }
}

impl ClientConfig {
    /// load
    ///
    /// The canonical function for initializing the client configuration at startup.
    /// Reads all parameters from environment variables and implements the **fail-fast**
    /// principle.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `HMS_BACKEND_URL` is not set. A production
    /// client silently talking to a localhost default is worse than not starting.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let backend_url = match env {
            Env::Production => env::var("HMS_BACKEND_URL")
                .expect("FATAL: HMS_BACKEND_URL must be set in production."),
            Env::Local => {
                env::var("HMS_BACKEND_URL").unwrap_or_else(|_| LOCAL_BACKEND_URL.to_string())
            }
        };

        let token_path = env::var("HMS_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOKEN_PATH));

        Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            token_path,
            env,
        }
    }

    /// api_base
    ///
    /// Every REST call is rooted at `<backend>/api`.
    pub fn api_base(&self) -> String {
        format!("{}/api", self.backend_url.trim_end_matches('/'))
    }
}
