use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use switchback_sim::{SimConfig, SimRunner};

use crate::state::AppState;
use crate::views::{RequestView, SimulationResponse, WindowMetricView};

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Root endpoint
pub async fn root() -> impl IntoResponse {
    Json(StatusResponse {
        status: "Switchback Experimentation API Active".to_string(),
    })
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Query overrides for a simulation run; unset fields use the server defaults
#[derive(Debug, Default, Deserialize)]
pub struct SimulationParams {
    pub days: Option<u32>,
    pub uplift_factor: Option<f64>,
    pub window_minutes: Option<u32>,
    pub seed: Option<u64>,
}

impl SimulationParams {
    fn apply(&self, defaults: &SimConfig) -> SimConfig {
        let mut config = defaults.clone();
        if let Some(days) = self.days {
            config.horizon_days = days;
        }
        if let Some(uplift) = self.uplift_factor {
            config.uplift_factor = uplift;
        }
        if let Some(window) = self.window_minutes {
            config.window_length_minutes = window;
        }
        if let Some(seed) = self.seed {
            config.random_seed = Some(seed);
        }
        config
    }
}

/// Simulate a switchback experiment and return its analysis
pub async fn run_simulation(
    State(state): State<AppState>,
    Query(params): Query<SimulationParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    let config = params.apply(&state.config.sim_defaults);
    let sample_size = state.config.raw_sample_size;

    // Simulation is CPU-bound; keep it off the async workers
    let joined = tokio::task::spawn_blocking(move || SimRunner::new().run_config(&config)).await;

    let result = match joined {
        Ok(Ok(result)) => result,
        Ok(Err(e)) if e.is_config_error() => {
            tracing::warn!(error = %e, "rejected simulation request");
            return (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": e.to_string()})));
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "simulation failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({"error": e.to_string()})));
        }
        Err(e) => {
            tracing::error!(error = %e, "simulation task panicked");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Simulation task failed"})),
            );
        }
    };

    let response = SimulationResponse {
        summary: result.summary,
        revenue: result.diagnostics.revenue,
        window_metrics: result.window_metrics.iter().map(WindowMetricView::from).collect(),
        raw_data_sample: result.requests.iter().take(sample_size).map(RequestView::from).collect(),
    };

    match serde_json::to_value(&response) {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialise simulation response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to serialise response"})),
            )
        }
    }
}
