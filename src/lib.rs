//! Gatepass Kiosk Library
//!
//! Visitor gate controller: bridges the kiosk webcam and pass printer to the
//! visitor backend.
//!
//! ## Architecture (7 Components)
//!
//! 1. CameraService - Still capture from the kiosk webcam
//! 2. CaptureSession - Pending capture slot (one visitor at a time)
//! 3. GateClient - Visitor backend adapter (lookup/entry/exit)
//! 4. VisitForm - Typed entry form state
//! 5. KioskController - Entry/exit orchestration and phase machine
//! 6. PassPrinter - Printable pass rendering and spooling
//! 7. WebAPI - Action endpoints for the kiosk frontend
//!
//! ## Design Principles
//!
//! - The backend owns all visitor data; the kiosk holds per-visitor state
//!   only until the pass prints
//! - Every backend call is timeout-bounded; failures are surfaced, never
//!   swallowed
//! - One submission in flight at a time (busy-guard)

pub mod camera;
pub mod capture;
pub mod gate_client;
pub mod kiosk_controller;
pub mod models;
pub mod pass_printer;
pub mod status;
pub mod validation;
pub mod visit_form;
pub mod web_api;
pub mod error;
pub mod state;

pub use error::{Error, Result};
pub use state::AppState;
