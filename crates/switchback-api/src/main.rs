use switchback_api::{create_app, ApiConfig, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ApiConfig::from_env();
    let addr = config.bind_addr.clone();

    let app = create_app(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Switchback API server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
