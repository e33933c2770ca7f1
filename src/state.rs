//! Application state
//!
//! Holds all shared components and state

use crate::camera::CameraService;
use crate::gate_client::GateClient;
use crate::kiosk_controller::KioskController;
use crate::pass_printer::PassPrinter;
use std::path::PathBuf;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Visitor backend base URL
    pub backend_url: String,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// V4L2 webcam device (unset disables local capture)
    pub camera_device: Option<String>,
    /// HTTP snapshot URL fallback (IP camera mode)
    pub camera_snapshot_url: Option<String>,
    /// Preview cache directory
    pub snapshot_dir: PathBuf,
    /// Spool directory for rendered passes
    pub spool_dir: PathBuf,
    /// Printer command (unset spools only)
    pub printer_cmd: Option<String>,
    /// Frontend dist directory
    pub static_dir: String,
    /// Camera capture timeout in seconds
    pub capture_timeout_sec: u64,
    /// Backend request timeout in seconds
    pub request_timeout_sec: u64,
    /// Printer command timeout in seconds
    pub print_timeout_sec: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: std::env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            camera_device: std::env::var("CAMERA_DEVICE")
                .ok()
                .or_else(|| Some("/dev/video0".to_string())),
            camera_snapshot_url: std::env::var("CAMERA_SNAPSHOT_URL").ok(),
            snapshot_dir: std::env::var("SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/var/lib/gatepass/snapshots")),
            spool_dir: std::env::var("SPOOL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/var/lib/gatepass/spool")),
            printer_cmd: std::env::var("PRINTER_CMD").ok(),
            static_dir: std::env::var("STATIC_DIR")
                .unwrap_or_else(|_| "/opt/gatepass/frontend/dist".to_string()),
            capture_timeout_sec: std::env::var("CAPTURE_TIMEOUT_SEC")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            request_timeout_sec: std::env::var("REQUEST_TIMEOUT_SEC")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            print_timeout_sec: std::env::var("PRINT_TIMEOUT_SEC")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// KioskController (entry/exit orchestration)
    pub controller: Arc<KioskController>,
    /// GateClient (visitor backend adapter)
    pub gate: Arc<GateClient>,
    /// CameraService (webcam stills)
    pub camera: Arc<CameraService>,
    /// PassPrinter (pass spool/print)
    pub printer: Arc<PassPrinter>,
}
