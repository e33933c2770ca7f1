//! KioskController - Entry/Exit Orchestration
//!
//! ## Responsibilities
//!
//! - Drive the capture -> submit -> print flow and its phase machine
//! - Visitor lookup with form autofill
//! - Exit recording
//! - Busy-guard: one entry/exit submission in flight at a time
//!
//! ## Phase machine
//!
//! `Idle -> Captured -> Submitting -> Printed -> (reset) Idle`
//!
//! Lookup and exit are side actions and never transition the machine. A
//! failed submission reverts to Captured (the capture and form survive for
//! correction); reset is explicit and replaces the page reload of older
//! kiosk builds.

use crate::camera::CameraService;
use crate::capture::CaptureSession;
use crate::error::{Error, Result};
use crate::gate_client::{ExitRequest, GateClient};
use crate::pass_printer::{PassPrinter, PassTicket};
use crate::status::StatusMessage;
use crate::validation::is_valid_mobile;
use crate::visit_form::VisitForm;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Inline status for a malformed lookup mobile
const MSG_LOOKUP_INVALID: &str = "Error: Mobile number must be exactly 10 digits.";
/// Inline status for a found visitor
const MSG_VISITOR_FOUND: &str = "Visitor Found! Details Autofilled.";
/// Inline status for an unknown mobile
const MSG_NEW_VISITOR: &str = "New Visitor";
/// Inline status when the backend is unreachable during lookup
const MSG_LOOKUP_FAILED: &str = "Error: Visitor lookup failed. Please try again.";
/// Blocking message for a malformed entry mobile
const MSG_ENTRY_INVALID_MOBILE: &str = "Invalid Mobile Number! It must be exactly 10 digits.";
/// Blocking message for a malformed exit mobile
const MSG_EXIT_INVALID_MOBILE: &str = "Please enter a valid 10-digit mobile number.";
/// Blocking message while a submission is in flight
const MSG_BUSY: &str = "Another submission is in progress. Please wait.";

/// Kiosk phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KioskPhase {
    /// Waiting for the next visitor
    Idle,
    /// A photo is pending in the capture slot
    Captured,
    /// Entry request in flight
    Submitting,
    /// Pass handed to the printer
    Printed,
}

impl KioskPhase {
    /// Convert to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            KioskPhase::Idle => "idle",
            KioskPhase::Captured => "captured",
            KioskPhase::Submitting => "submitting",
            KioskPhase::Printed => "printed",
        }
    }
}

/// Result of a capture action
#[derive(Debug, Clone, Serialize)]
pub struct CaptureOutcome {
    pub capture_id: Uuid,
    pub captured_at: DateTime<Utc>,
    /// Capture source ("device" or "http")
    pub source: &'static str,
    /// JPEG data URL for the frontend preview
    pub preview: String,
}

/// Result of a lookup action
#[derive(Debug, Clone, Serialize)]
pub struct LookupOutcome {
    pub found: bool,
    /// Inline status to show next to the mobile field (None clears it)
    pub status: Option<StatusMessage>,
    /// Form state after any autofill
    pub form: VisitForm,
}

/// Result of a successful entry submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub ticket: PassTicket,
    /// True when the pass went to a configured printer
    pub printed: bool,
    /// Spool file of the rendered pass, if spooling succeeded
    pub spool_path: Option<String>,
}

/// Result of a successful exit action
#[derive(Debug, Clone, Serialize)]
pub struct ExitOutcome {
    /// User-facing confirmation, e.g. `Out Time Recorded: 18:00`
    pub message: String,
    pub out_time: String,
}

/// Full kiosk view state for the frontend
#[derive(Debug, Clone, Serialize)]
pub struct KioskSnapshot {
    pub phase: KioskPhase,
    pub form: VisitForm,
    pub exit_mobile: String,
    pub status: Option<StatusMessage>,
    pub has_capture: bool,
}

/// KioskController instance
pub struct KioskController {
    camera: Arc<CameraService>,
    gate: Arc<GateClient>,
    printer: Arc<PassPrinter>,
    session: CaptureSession,
    form: RwLock<VisitForm>,
    exit_mobile: RwLock<String>,
    phase: RwLock<KioskPhase>,
    status: RwLock<Option<StatusMessage>>,
    /// Busy-guard: held for the duration of an entry/exit submission
    submit_gate: Mutex<()>,
}

impl KioskController {
    /// Create a new controller
    pub fn new(camera: Arc<CameraService>, gate: Arc<GateClient>, printer: Arc<PassPrinter>) -> Self {
        Self {
            camera,
            gate,
            printer,
            session: CaptureSession::new(),
            form: RwLock::new(VisitForm::default()),
            exit_mobile: RwLock::new(String::new()),
            phase: RwLock::new(KioskPhase::Idle),
            status: RwLock::new(None),
            submit_gate: Mutex::new(()),
        }
    }

    /// Take a photo and store it as the pending capture
    ///
    /// Re-capturing simply overwrites the slot.
    pub async fn capture(&self) -> Result<CaptureOutcome> {
        let result = self.camera.capture().await?;

        if let Err(e) = self.camera.save_preview(&result.data).await {
            tracing::warn!(error = %e, "Preview cache write failed");
        }

        let frame = self.session.store(result.data).await;
        self.set_phase(KioskPhase::Captured).await;

        Ok(CaptureOutcome {
            capture_id: frame.capture_id,
            captured_at: frame.captured_at,
            source: result.source.as_str(),
            preview: frame.data_url(),
        })
    }

    /// Look up a returning visitor and autofill the form
    ///
    /// Empty input is a silent no-op that clears any prior status. Invalid
    /// input shows an inline error without issuing a request. Transport
    /// failure shows an inline error rather than failing the action.
    pub async fn lookup(&self, mobile: &str) -> LookupOutcome {
        self.set_status(None).await;

        if mobile.is_empty() {
            return LookupOutcome {
                found: false,
                status: None,
                form: self.form.read().await.clone(),
            };
        }

        if !is_valid_mobile(mobile) {
            let status = StatusMessage::error(MSG_LOOKUP_INVALID);
            self.set_status(Some(status.clone())).await;
            return LookupOutcome {
                found: false,
                status: Some(status),
                form: self.form.read().await.clone(),
            };
        }

        self.form.write().await.mobile = mobile.to_string();

        let (found, status) = match self.gate.check_visitor(mobile).await {
            Ok(lookup) if lookup.found => {
                self.form.write().await.apply_lookup(&lookup);
                tracing::info!(mobile = %mobile, is_booking = lookup.is_booking, "Visitor found");
                (true, StatusMessage::success(MSG_VISITOR_FOUND))
            }
            Ok(_) => {
                tracing::info!(mobile = %mobile, "New visitor");
                (false, StatusMessage::info(MSG_NEW_VISITOR))
            }
            Err(e) => {
                tracing::warn!(mobile = %mobile, error = %e, "Visitor lookup failed");
                (false, StatusMessage::error(MSG_LOOKUP_FAILED))
            }
        };

        self.set_status(Some(status.clone())).await;
        LookupOutcome {
            found,
            status: Some(status),
            form: self.form.read().await.clone(),
        }
    }

    /// Submit a visitor entry and print the pass
    ///
    /// Validation failures block before any request is sent. On success the
    /// kiosk resets for the next visitor; on failure form and capture are
    /// left untouched for correction.
    pub async fn submit_entry(&self, input: VisitForm) -> Result<SubmitOutcome> {
        let _guard = self
            .submit_gate
            .try_lock()
            .map_err(|_| Error::Busy(MSG_BUSY.to_string()))?;

        if !is_valid_mobile(&input.mobile) {
            return Err(Error::Validation(MSG_ENTRY_INVALID_MOBILE.to_string()));
        }

        *self.form.write().await = input.clone();

        let capture = self.session.get().await;
        let missing = input.missing_required(capture.is_some());
        if !missing.is_empty() {
            return Err(Error::Validation(format!(
                "Please fill {}.",
                missing.join(", ")
            )));
        }

        self.set_phase(KioskPhase::Submitting).await;

        let request = input.to_entry_request(capture.map(|frame| frame.data_url()));
        let response = match self.gate.submit_entry(&request).await {
            Ok(response) => response,
            Err(e) => {
                self.revert_phase().await;
                return Err(e);
            }
        };

        if !response.is_success() {
            self.revert_phase().await;
            let message = response
                .message
                .unwrap_or_else(|| "Entry submission failed".to_string());
            tracing::warn!(mobile = %request.mobile, message = %message, "Entry rejected by backend");
            return Err(Error::Backend(message));
        }

        let ticket = PassTicket::from_entry(&response, &input, &request.laptop);
        tracing::info!(
            pass_id = %ticket.pass_id,
            mobile = %ticket.mobile,
            "Entry recorded"
        );

        self.set_phase(KioskPhase::Printed).await;

        // The entry is already recorded server-side; a print failure is
        // reported but does not undo it.
        let (printed, spool_path) = match self.printer.print(&ticket).await {
            Ok(path) => (
                self.printer.has_printer(),
                Some(path.display().to_string()),
            ),
            Err(e) => {
                tracing::error!(pass_id = %ticket.pass_id, error = %e, "Pass printing failed");
                (false, None)
            }
        };

        self.reset().await;

        Ok(SubmitOutcome {
            ticket,
            printed,
            spool_path,
        })
    }

    /// Record a visitor exit
    ///
    /// `out_time` optionally overrides the recorded time (`HH:MM`). The
    /// exit-mobile field clears on success and is kept on failure.
    pub async fn mark_exit(&self, mobile: &str, out_time: Option<String>) -> Result<ExitOutcome> {
        let _guard = self
            .submit_gate
            .try_lock()
            .map_err(|_| Error::Busy(MSG_BUSY.to_string()))?;

        *self.exit_mobile.write().await = mobile.to_string();

        if !is_valid_mobile(mobile) {
            return Err(Error::Validation(MSG_EXIT_INVALID_MOBILE.to_string()));
        }

        let request = ExitRequest {
            mobile: mobile.to_string(),
            out_time,
        };
        let response = self.gate.mark_exit(&request).await?;

        if !response.is_success() {
            let message = response
                .message
                .unwrap_or_else(|| "Exit recording failed".to_string());
            tracing::warn!(mobile = %mobile, message = %message, "Exit rejected by backend");
            return Err(Error::Backend(message));
        }

        let out_time = response.out_time.unwrap_or_default();
        tracing::info!(mobile = %mobile, out_time = %out_time, "Exit recorded");

        self.exit_mobile.write().await.clear();

        Ok(ExitOutcome {
            message: format!("Out Time Recorded: {}", out_time),
            out_time,
        })
    }

    /// Reset all kiosk state for the next visitor
    ///
    /// Clears form, exit field, capture slot and status, and returns the
    /// phase to Idle.
    pub async fn reset(&self) {
        self.form.write().await.clear();
        self.exit_mobile.write().await.clear();
        self.session.clear().await;
        self.set_status(None).await;
        self.set_phase(KioskPhase::Idle).await;
        tracing::debug!("Kiosk state reset");
    }

    /// Current view state for the frontend
    pub async fn snapshot(&self) -> KioskSnapshot {
        KioskSnapshot {
            phase: *self.phase.read().await,
            form: self.form.read().await.clone(),
            exit_mobile: self.exit_mobile.read().await.clone(),
            status: self.status.read().await.clone(),
            has_capture: self.session.has_capture().await,
        }
    }

    /// Current phase
    pub async fn phase(&self) -> KioskPhase {
        *self.phase.read().await
    }

    /// Current exit-mobile field value
    pub async fn exit_mobile(&self) -> String {
        self.exit_mobile.read().await.clone()
    }

    async fn set_phase(&self, next: KioskPhase) {
        let mut phase = self.phase.write().await;
        if *phase != next {
            tracing::debug!(from = phase.as_str(), to = next.as_str(), "Kiosk phase");
            *phase = next;
        }
    }

    /// After a failed submission the capture and form survive; the phase
    /// falls back to whatever the capture slot implies.
    async fn revert_phase(&self) {
        let next = if self.session.has_capture().await {
            KioskPhase::Captured
        } else {
            KioskPhase::Idle
        };
        self.set_phase(next).await;
    }

    async fn set_status(&self, status: Option<StatusMessage>) {
        *self.status.write().await = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Severity;

    // Controller whose gate points at a closed port; only paths that return
    // before any request are exercised here. The full flow runs against a
    // stub backend in tests/kiosk_flow.rs.
    async fn offline_controller() -> KioskController {
        let tmp = std::env::temp_dir().join(format!("kiosk-ctl-{}", Uuid::new_v4()));
        let camera = Arc::new(
            CameraService::new(None, None, tmp.join("snap"), 5)
                .await
                .unwrap(),
        );
        let gate = Arc::new(GateClient::new("http://127.0.0.1:9".to_string()));
        let printer = Arc::new(
            PassPrinter::new(tmp.join("spool"), None, 5).await.unwrap(),
        );
        KioskController::new(camera, gate, printer)
    }

    #[tokio::test]
    async fn test_lookup_empty_is_noop_and_clears_status() {
        let controller = offline_controller().await;

        // leave a stale status behind, then look up with an empty field
        controller.lookup("12345").await;
        assert!(controller.snapshot().await.status.is_some());

        let outcome = controller.lookup("").await;
        assert!(!outcome.found);
        assert!(outcome.status.is_none());
        assert!(controller.snapshot().await.status.is_none());
    }

    #[tokio::test]
    async fn test_lookup_invalid_shows_red_status() {
        let controller = offline_controller().await;
        let outcome = controller.lookup("12345").await;

        let status = outcome.status.unwrap();
        assert_eq!(status.text, "Error: Mobile number must be exactly 10 digits.");
        assert_eq!(status.severity, Severity::Error);
        assert_eq!(status.color, "red");
        // form untouched
        assert_eq!(outcome.form.mobile, "");
    }

    #[tokio::test]
    async fn test_entry_invalid_mobile_blocks() {
        let controller = offline_controller().await;
        let form = VisitForm {
            mobile: "12345".to_string(),
            name: "X".to_string(),
            to_meet: "Y".to_string(),
            ..Default::default()
        };

        let err = controller.submit_entry(form).await.unwrap_err();
        match err {
            Error::Validation(msg) => {
                assert_eq!(msg, "Invalid Mobile Number! It must be exactly 10 digits.")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(controller.phase().await, KioskPhase::Idle);
    }

    #[tokio::test]
    async fn test_entry_without_capture_blocks_before_request() {
        let controller = offline_controller().await;
        let form = VisitForm {
            mobile: "9876543210".to_string(),
            name: "X".to_string(),
            to_meet: "Y".to_string(),
            ..Default::default()
        };

        let err = controller.submit_entry(form).await.unwrap_err();
        match err {
            Error::Validation(msg) => assert_eq!(msg, "Please fill Capture Photo."),
            other => panic!("expected validation error, got {other:?}"),
        }
        // never reached Submitting
        assert_eq!(controller.phase().await, KioskPhase::Idle);
    }

    #[tokio::test]
    async fn test_entry_missing_fields_are_enumerated() {
        let controller = offline_controller().await;
        let form = VisitForm {
            mobile: "9876543210".to_string(),
            ..Default::default()
        };

        let err = controller.submit_entry(form).await.unwrap_err();
        match err {
            Error::Validation(msg) => {
                assert_eq!(msg, "Please fill Name, To Meet, Capture Photo.")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exit_invalid_mobile_blocks() {
        let controller = offline_controller().await;

        let err = controller.mark_exit("98765", None).await.unwrap_err();
        match err {
            Error::Validation(msg) => {
                assert_eq!(msg, "Please enter a valid 10-digit mobile number.")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        // failed exits keep the field for correction
        assert_eq!(controller.exit_mobile().await, "98765");
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let controller = offline_controller().await;
        controller.lookup("12345").await;
        controller.mark_exit("bad", None).await.ok();

        controller.reset().await;

        let snap = controller.snapshot().await;
        assert_eq!(snap.phase, KioskPhase::Idle);
        assert_eq!(snap.form, VisitForm::default());
        assert_eq!(snap.exit_mobile, "");
        assert!(snap.status.is_none());
        assert!(!snap.has_capture);
    }

    #[test]
    fn test_phase_as_str() {
        assert_eq!(KioskPhase::Idle.as_str(), "idle");
        assert_eq!(KioskPhase::Submitting.as_str(), "submitting");
    }
}
