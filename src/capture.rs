//! CaptureSession - Pending Capture Slot
//!
//! ## Responsibilities
//!
//! - Hold the most recent camera still for the next entry submission
//! - Overwrite on re-capture, clear on kiosk reset
//! - Encode the JPEG as the data URL transmitted to the backend
//!
//! A single slot: the kiosk registers one visitor at a time, so at most one
//! pending capture exists. Frames never outlive a reset.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A captured camera still
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// Capture id (one per shutter press)
    pub capture_id: Uuid,
    /// Capture timestamp
    pub captured_at: DateTime<Utc>,
    /// JPEG bytes
    pub data: Vec<u8>,
}

impl CapturedFrame {
    /// Encode as a `data:image/jpeg;base64,...` URL
    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", BASE64.encode(&self.data))
    }
}

/// Single-slot capture session
pub struct CaptureSession {
    slot: RwLock<Option<CapturedFrame>>,
}

impl CaptureSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Store a new capture, replacing any previous one
    pub async fn store(&self, data: Vec<u8>) -> CapturedFrame {
        let frame = CapturedFrame {
            capture_id: Uuid::new_v4(),
            captured_at: Utc::now(),
            data,
        };

        let mut slot = self.slot.write().await;
        if let Some(prev) = slot.replace(frame.clone()) {
            tracing::debug!(
                replaced = %prev.capture_id,
                capture_id = %frame.capture_id,
                size = frame.data.len(),
                "Capture overwritten"
            );
        } else {
            tracing::debug!(
                capture_id = %frame.capture_id,
                size = frame.data.len(),
                "Capture stored"
            );
        }

        frame
    }

    /// Get the pending capture, if any
    pub async fn get(&self) -> Option<CapturedFrame> {
        self.slot.read().await.clone()
    }

    /// Whether a capture is pending
    pub async fn has_capture(&self) -> bool {
        self.slot.read().await.is_some()
    }

    /// Drop the pending capture
    pub async fn clear(&self) {
        let mut slot = self.slot.write().await;
        if slot.take().is_some() {
            tracing::debug!("Capture cleared");
        }
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_overwrites_previous() {
        let session = CaptureSession::new();
        assert!(!session.has_capture().await);

        let first = session.store(vec![1, 2, 3]).await;
        let second = session.store(vec![4, 5, 6]).await;
        assert_ne!(first.capture_id, second.capture_id);

        let pending = session.get().await.unwrap();
        assert_eq!(pending.capture_id, second.capture_id);
        assert_eq!(pending.data, vec![4, 5, 6]);
    }

    #[tokio::test]
    async fn test_clear_empties_slot() {
        let session = CaptureSession::new();
        session.store(vec![1]).await;
        session.clear().await;
        assert!(session.get().await.is_none());
    }

    #[test]
    fn test_data_url_encoding() {
        let frame = CapturedFrame {
            capture_id: Uuid::new_v4(),
            captured_at: Utc::now(),
            data: vec![0xFF, 0xD8, 0xFF],
        };
        let url = frame.data_url();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(url, "data:image/jpeg;base64,/9j/");
    }
}
