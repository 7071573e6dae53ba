use anyhow::Result;
use onion_storage_monitor::{api, config, controller, telemetry};
use config::Config;
use controller::TokioScheduler;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_tracing(&cfg.logging);
    let app_state = controller::AppState::new(cfg.clone());
    let app = api::router(app_state.clone(), &cfg);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - dashboard API is reachable from the network");
    }

    info!(
        %addr,
        session_id = %app_state.monitor.session_id(),
        history_capacity = cfg.monitor.history_capacity,
        active = cfg.monitor.start_active,
        "starting Onion Storage Monitor"
    );

    let scheduler = TokioScheduler::new();
    let tasks = controller::spawn_controller_tasks(&app_state, &scheduler);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    scheduler.shutdown();
    for task in tasks {
        task.shutdown().await;
    }

    warn!("shutdown complete");
    Ok(())
}
