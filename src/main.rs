//! Gatepass Kiosk - Visitor Gate Controller
//!
//! Main entry point for the kiosk application.

use gatepass_kiosk::{
    camera::CameraService,
    gate_client::GateClient,
    kiosk_controller::KioskController,
    pass_printer::PassPrinter,
    state::{AppConfig, AppState},
    web_api,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatepass_kiosk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gatepass Kiosk v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::default();
    tracing::info!(
        backend_url = %config.backend_url,
        camera_device = ?config.camera_device,
        snapshot_dir = %config.snapshot_dir.display(),
        spool_dir = %config.spool_dir.display(),
        printer_cmd = ?config.printer_cmd,
        "Configuration loaded"
    );

    // Initialize components
    let camera = Arc::new(
        CameraService::new(
            config.camera_device.clone(),
            config.camera_snapshot_url.clone(),
            config.snapshot_dir.clone(),
            config.capture_timeout_sec,
        )
        .await?,
    );

    // Camera absence degrades capture instead of failing startup; the
    // operator sees the error on the capture button.
    if camera.probe().await {
        tracing::info!("CameraService initialized");
    } else {
        tracing::warn!("CameraService initialized in degraded mode (no usable capture source)");
    }

    let gate = Arc::new(GateClient::with_timeout(
        config.backend_url.clone(),
        Duration::from_secs(config.request_timeout_sec),
    ));
    tracing::info!(backend_url = %gate.base_url(), "GateClient initialized");

    let printer = Arc::new(
        PassPrinter::new(
            config.spool_dir.clone(),
            config.printer_cmd.clone(),
            config.print_timeout_sec,
        )
        .await?,
    );
    if printer.has_printer() {
        tracing::info!("PassPrinter initialized");
    } else {
        tracing::info!("PassPrinter initialized (spool-only, set PRINTER_CMD to print)");
    }

    let controller = Arc::new(KioskController::new(
        camera.clone(),
        gate.clone(),
        printer.clone(),
    ));
    tracing::info!("KioskController initialized");

    // Create application state
    let state = AppState {
        config,
        controller,
        gate,
        camera,
        printer,
    };

    // Watch backend reachability; log transitions only
    let gate_watchdog = state.gate.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        let mut was_online = true;
        loop {
            interval.tick().await;
            let online = gate_watchdog.health_check().await;
            if online != was_online {
                if online {
                    tracing::info!("Visitor backend recovered");
                } else {
                    tracing::warn!("Visitor backend unreachable");
                }
                was_online = online;
            }
        }
    });

    // Create router with static file serving
    let static_dir = state.config.static_dir.clone();
    let serve_dir = ServeDir::new(&static_dir)
        .not_found_service(ServeFile::new(format!("{}/index.html", static_dir)));

    let app = web_api::create_router(state.clone())
        .fallback_service(serve_dir)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    tracing::info!(static_dir = %static_dir, "Static file serving enabled");

    // Start server
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
