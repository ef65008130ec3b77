//! Engine configuration from environment variables.

use kindred_domain::DEFAULT_FREEBIE_BASE;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    /// Freebie points each new session starts with
    pub freebie_base: u32,
    /// Raw `CORS_ALLOWED_ORIGINS` value; `*` allows any origin
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".into(),
            server_port: 3000,
            freebie_base: DEFAULT_FREEBIE_BASE,
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let server_host = lookup("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .map(|raw| {
                raw.trim().parse().unwrap_or_else(|_| {
                    tracing::warn!(value = %raw, "Invalid SERVER_PORT, using default");
                    defaults.server_port
                })
            })
            .unwrap_or(defaults.server_port);
        let freebie_base = lookup("FREEBIE_BASE")
            .map(|raw| {
                raw.trim().parse().unwrap_or_else(|_| {
                    tracing::warn!(value = %raw, "Invalid FREEBIE_BASE, using default");
                    defaults.freebie_base
                })
            })
            .unwrap_or(defaults.freebie_base);
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            server_host,
            server_port,
            freebie_base,
            cors_allowed_origins,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
