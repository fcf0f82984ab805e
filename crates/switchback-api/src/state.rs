use std::sync::Arc;
use switchback_sim::SimConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Server settings and per-request simulation defaults
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    /// Base configuration; query parameters override individual fields
    pub sim_defaults: SimConfig,
    /// Raw request rows echoed back in each response
    pub raw_sample_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            sim_defaults: SimConfig::default(),
            raw_sample_size: 5,
        }
    }
}

impl ApiConfig {
    /// Defaults, with the bind address taken from `SWITCHBACK_API_ADDR` if set
    pub fn from_env() -> Self {
        let mut config = ApiConfig::default();
        if let Ok(addr) = std::env::var("SWITCHBACK_API_ADDR") {
            config.bind_addr = addr;
        }
        config
    }
}

/// Shared application state; read-only after startup
#[derive(Clone, Default)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        AppState {
            config: Arc::new(config),
        }
    }
}
