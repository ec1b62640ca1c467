use anyhow::Context;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Evaluate bezier segments without usable control points linearly
    /// instead of failing, unless a request says otherwise (default: `false`).
    pub lenient_bezier: bool,
    /// Maximum number of tracks accepted by one import request (default: `500`).
    pub max_tracks_per_import: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `LENIENT_BEZIER`        | `false`                 |
    /// | `MAX_TRACKS_PER_IMPORT` | `500`                   |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");

        let port: u16 = var("PORT", "3000")
            .parse()
            .context("PORT must be a valid u16")?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .context("REQUEST_TIMEOUT_SECS must be a valid u64")?;

        let lenient_bezier: bool = var("LENIENT_BEZIER", "false")
            .parse()
            .context("LENIENT_BEZIER must be `true` or `false`")?;

        let max_tracks_per_import: usize = var("MAX_TRACKS_PER_IMPORT", "500")
            .parse()
            .context("MAX_TRACKS_PER_IMPORT must be a valid usize")?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            lenient_bezier,
            max_tracks_per_import,
        })
    }
}
