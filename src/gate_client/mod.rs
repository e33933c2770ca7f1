//! GateClient - Visitor Backend Adapter
//!
//! ## Responsibilities
//!
//! - Lookup, entry and exit calls against the visitor backend
//! - Response parsing
//! - Request timeouts (a hung backend must not hang the kiosk)
//!
//! Transport failures and non-2xx statuses surface as errors; logical
//! failures (`status != "success"`) are returned to the caller to interpret.

mod types;

pub use types::{
    ActiveVisitor, Booking, EntryRequest, EntryResponse, ExitRequest, ExitResponse,
    LookupResponse, NextIdResponse, PassId,
};

use crate::error::{Error, Result};
use std::time::Duration;

/// Visitor backend client
pub struct GateClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GateClient {
    /// Create a new client with the default 10s timeout
    pub fn new(base_url: String) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    /// Create a new client with a custom timeout
    pub fn with_timeout(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            timeout,
        }
    }

    /// Check backend reachability
    ///
    /// The backend has no dedicated health endpoint; the next-id call is the
    /// cheapest read it serves.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/get_next_id", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Look up a returning visitor by mobile number
    pub async fn check_visitor(&self, mobile: &str) -> Result<LookupResponse> {
        let url = format!("{}/api/check_visitor", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("mobile", mobile)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::Backend(format!(
                "Visitor lookup failed: {}",
                resp.status()
            )));
        }

        let result: LookupResponse = resp.json().await?;
        Ok(result)
    }

    /// Submit a new visitor entry
    pub async fn submit_entry(&self, request: &EntryRequest) -> Result<EntryResponse> {
        let url = format!("{}/api/entry", self.base_url);
        let resp = self.client.post(&url).json(request).send().await?;

        if !resp.status().is_success() {
            return Err(Error::Backend(format!(
                "Entry submission failed: {}",
                resp.status()
            )));
        }

        let result: EntryResponse = resp.json().await?;
        Ok(result)
    }

    /// Record a visitor exit
    pub async fn mark_exit(&self, request: &ExitRequest) -> Result<ExitResponse> {
        let url = format!("{}/api/exit", self.base_url);
        let resp = self.client.post(&url).json(request).send().await?;

        if !resp.status().is_success() {
            return Err(Error::Backend(format!(
                "Exit recording failed: {}",
                resp.status()
            )));
        }

        let result: ExitResponse = resp.json().await?;
        Ok(result)
    }

    /// Preview the next pass number
    pub async fn next_pass_id(&self) -> Result<NextIdResponse> {
        let url = format!("{}/api/get_next_id", self.base_url);
        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(Error::Backend(format!(
                "Next pass id fetch failed: {}",
                resp.status()
            )));
        }

        let result: NextIdResponse = resp.json().await?;
        Ok(result)
    }

    /// Visitors currently inside (no out-time yet)
    pub async fn active_visitors(&self) -> Result<Vec<ActiveVisitor>> {
        let url = format!("{}/api/get_active_visitors", self.base_url);
        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(Error::Backend(format!(
                "Active visitors fetch failed: {}",
                resp.status()
            )));
        }

        let result: Vec<ActiveVisitor> = resp.json().await?;
        Ok(result)
    }

    /// Today's pending bookings (expected visitors)
    pub async fn today_bookings(&self) -> Result<Vec<Booking>> {
        let url = format!("{}/api/get_today_bookings", self.base_url);
        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(Error::Backend(format!(
                "Bookings fetch failed: {}",
                resp.status()
            )));
        }

        let result: Vec<Booking> = resp.json().await?;
        Ok(result)
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
