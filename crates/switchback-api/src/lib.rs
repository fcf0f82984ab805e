mod server;
mod handlers;
mod state;
mod views;

pub use server::create_app;
pub use state::{ApiConfig, AppState};
pub use views::{RequestView, SimulationResponse, WindowMetricView};
