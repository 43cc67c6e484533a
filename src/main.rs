//! Stretch Reminder - a single-timer reminder with a local HTTP control surface
//!
//! This is the main entry point for the stretch-reminder application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use stretch_reminder::{
    api::create_router,
    config::Config,
    services::{SystemClock, DesktopNotifier},
    state::AppState,
    tasks::spawn_reminder_loop,
    utils::{install_panic_hook, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("stretch_reminder={},tower_http=info", config.log_level()))
        .init();
    install_panic_hook();

    info!("Starting stretch-reminder v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, interval={:?}, mute={}",
          config.host, config.port, config.interval, config.mute);

    // Start the reminder loop, which owns the single timer
    let (reminders, reminder_task) = spawn_reminder_loop(SystemClock, DesktopNotifier::new(!config.mute));

    if let Some(minutes) = config.interval {
        reminders.start(minutes).await?;
    }

    let state = Arc::new(AppState::new(reminders, config.port, config.host.clone()));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start   - Start a reminder cycle ({{\"minutes\": n}})");
    info!("  POST /stop    - Stop the timer");
    info!("  POST /resolve - Answer a reminder ({{\"choice\": \"continue\"|\"stop\"}})");
    info!("  GET  /status  - Check timer and pending reminder");
    info!("  GET  /health  - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    reminder_task.abort();
    info!("Server shutdown complete");
    Ok(())
}
