use health_assistant::api::{create_router, AppState};
use health_assistant::infrastructure::{telemetry, AppConfig};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("api=debug,health_assistant=debug,tower_http=debug");

    let config = AppConfig::load()?;
    let addr = SocketAddr::new(
        config.config.server.host.parse()?,
        config.config.server.port,
    );
    info!(
        space = %config.config.space.space_id,
        model = %config.config.llm.model,
        index = %config.config.rag.index_path,
        "configuration loaded"
    );

    let state = AppState::from_config(config);
    let app = create_router(state);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
