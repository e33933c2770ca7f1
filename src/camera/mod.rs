//! CameraService - Still Capture from the Kiosk Webcam
//!
//! ## Responsibilities
//!
//! - Single-frame JPEG grab from a local V4L2 device using ffmpeg
//! - Fallback to an HTTP snapshot URL (IP camera mode)
//! - Preview cache for the kiosk frontend
//!
//! The device is opened per shot, not held across captures, so no hardware
//! handle survives a kiosk reset.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;

/// Capture source used for a grab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    /// ffmpeg V4L2 single-frame grab
    Device,
    /// HTTP snapshot URL
    Http,
}

impl CaptureSource {
    /// Convert to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureSource::Device => "device",
            CaptureSource::Http => "http",
        }
    }
}

/// Result of a capture, including how the image was obtained
#[derive(Debug)]
pub struct CaptureResult {
    /// JPEG image data
    pub data: Vec<u8>,
    /// Source of the capture
    pub source: CaptureSource,
}

/// CameraService instance
pub struct CameraService {
    /// HTTP client for snapshot URLs
    client: reqwest::Client,
    /// V4L2 device path (e.g. /dev/video0), if a local webcam is attached
    device: Option<String>,
    /// HTTP snapshot URL fallback (IP camera)
    snapshot_url: Option<String>,
    /// Directory for the preview cache
    snapshot_dir: PathBuf,
    /// ffmpeg timeout in seconds
    capture_timeout_sec: u64,
}

impl CameraService {
    /// Create a new CameraService
    ///
    /// # Arguments
    /// * `device` - V4L2 device path, if any
    /// * `snapshot_url` - HTTP snapshot fallback, if any
    /// * `snapshot_dir` - Directory for the preview cache (latest.jpg)
    /// * `capture_timeout_sec` - Timeout for a single grab
    pub async fn new(
        device: Option<String>,
        snapshot_url: Option<String>,
        snapshot_dir: PathBuf,
        capture_timeout_sec: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(capture_timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        fs::create_dir_all(&snapshot_dir).await?;

        Ok(Self {
            client,
            device,
            snapshot_url,
            snapshot_dir,
            capture_timeout_sec,
        })
    }

    /// Whether any capture source is configured
    pub fn has_source(&self) -> bool {
        self.device.is_some() || self.snapshot_url.is_some()
    }

    /// Probe capture prerequisites at startup
    ///
    /// Camera absence degrades the capture feature instead of failing the
    /// kiosk; the operator sees the error on the next capture attempt.
    pub async fn probe(&self) -> bool {
        if !self.has_source() {
            tracing::error!("Camera error: no capture device or snapshot URL configured");
            return false;
        }

        if self.device.is_some() {
            match Self::check_ffmpeg().await {
                Ok(version) => {
                    tracing::info!(ffmpeg = %version, "Camera probe ok");
                    true
                }
                Err(e) => {
                    tracing::error!(error = %e, "Camera error: ffmpeg unavailable, device capture disabled");
                    self.snapshot_url.is_some()
                }
            }
        } else {
            true
        }
    }

    /// Capture one still frame
    ///
    /// Tries the local device first, then the HTTP snapshot URL.
    pub async fn capture(&self) -> Result<CaptureResult> {
        if let Some(ref device) = self.device {
            match self.capture_device(device).await {
                Ok(data) => {
                    tracing::debug!(
                        device = %device,
                        size = data.len(),
                        source = "device",
                        "Still captured from webcam"
                    );
                    return Ok(CaptureResult {
                        data,
                        source: CaptureSource::Device,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        device = %device,
                        error = %e,
                        "Webcam capture failed, trying HTTP snapshot"
                    );
                }
            }
        }

        if let Some(ref url) = self.snapshot_url {
            let data = self.capture_http(url).await?;
            tracing::debug!(size = data.len(), source = "http", "Still captured via HTTP");
            return Ok(CaptureResult {
                data,
                source: CaptureSource::Http,
            });
        }

        Err(Error::Camera(
            "No capture device or snapshot URL available".to_string(),
        ))
    }

    /// Grab a single frame from a V4L2 device using ffmpeg
    ///
    /// Uses kill_on_drop(true) so that when the timeout fires and the future
    /// is cancelled, the dropped Child sends SIGKILL to ffmpeg. This keeps a
    /// wedged webcam from accumulating zombie ffmpeg processes.
    async fn capture_device(&self, device: &str) -> Result<Vec<u8>> {
        use std::process::Stdio;

        // -frames:v 1: capture only 1 frame
        // -f image2pipe -vcodec mjpeg: output as MJPEG to pipe
        let child = Command::new("ffmpeg")
            .args([
                "-f", "v4l2",
                "-i", device,
                "-frames:v", "1",
                "-f", "image2pipe",
                "-vcodec", "mjpeg",
                "-loglevel", "error",
                "-y",
                "-",
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Camera(format!("ffmpeg spawn failed: {}", e)))?;

        let timeout = Duration::from_secs(self.capture_timeout_sec);

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    return Err(Error::Camera(format!("ffmpeg failed: {}", stderr.trim())));
                }

                if output.stdout.is_empty() {
                    return Err(Error::Camera("ffmpeg returned empty output".to_string()));
                }

                Ok(output.stdout)
            }
            Ok(Err(e)) => Err(Error::Camera(format!("ffmpeg execution failed: {}", e))),
            Err(_) => {
                tracing::warn!(
                    timeout_sec = self.capture_timeout_sec,
                    device = %device,
                    "ffmpeg timeout, process killed via kill_on_drop"
                );

                Err(Error::Camera(format!(
                    "Capture timeout ({}s)",
                    self.capture_timeout_sec
                )))
            }
        }
    }

    /// Capture via HTTP snapshot URL (fallback)
    async fn capture_http(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(url).send().await?;

        if !resp.status().is_success() {
            return Err(Error::Camera(format!(
                "Snapshot HTTP error: {}",
                resp.status()
            )));
        }

        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(Error::Camera("Snapshot URL returned no data".to_string()));
        }
        Ok(bytes.to_vec())
    }

    /// Save the latest capture for frontend preview (latest.jpg)
    ///
    /// Returns the path to the saved file
    pub async fn save_preview(&self, data: &[u8]) -> Result<PathBuf> {
        let path = self.snapshot_dir.join("latest.jpg");
        fs::write(&path, data).await?;

        tracing::debug!(
            path = %path.display(),
            size = data.len(),
            "Saved preview cache"
        );

        Ok(path)
    }

    /// Check if ffmpeg is available
    pub async fn check_ffmpeg() -> Result<String> {
        let output = Command::new("ffmpeg")
            .arg("-version")
            .output()
            .await
            .map_err(|e| Error::Camera(format!("ffmpeg not found: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Camera("ffmpeg version check failed".to_string()));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        let first_line = version.lines().next().unwrap_or("unknown");
        Ok(first_line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_capture_without_sources_fails() {
        let dir = std::env::temp_dir().join(format!("kiosk-cam-{}", uuid::Uuid::new_v4()));
        let camera = CameraService::new(None, None, dir.clone(), 5).await.unwrap();
        assert!(!camera.has_source());

        let err = camera.capture().await.unwrap_err();
        assert!(err.to_string().contains("No capture device"));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_save_preview_writes_latest() {
        let dir = std::env::temp_dir().join(format!("kiosk-cam-{}", uuid::Uuid::new_v4()));
        let camera = CameraService::new(None, None, dir.clone(), 5).await.unwrap();

        let path = camera.save_preview(&[0xFF, 0xD8, 0xFF]).await.unwrap();
        assert!(path.ends_with("latest.jpg"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), vec![0xFF, 0xD8, 0xFF]);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
