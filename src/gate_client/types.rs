//! Wire types for the visitor backend API

use serde::{Deserialize, Serialize};

/// Pass id as returned by the backend
///
/// Older backend builds return the sheet row number, newer ones a formatted
/// string, so accept both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PassId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for PassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassId::Text(s) => write!(f, "{}", s),
            PassId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Response of `GET /api/check_visitor`
///
/// `name`..`vehicle` are the autofill fields; `laptop`, `to_meet`,
/// `department` and booking info are only present for some matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupResponse {
    pub found: bool,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub designation: Option<String>,

    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub vehicle: Option<String>,

    #[serde(default)]
    pub laptop: Option<String>,

    #[serde(default)]
    pub to_meet: Option<String>,

    #[serde(default)]
    pub department: Option<String>,

    /// True when the match came from a pending booking rather than a past visit
    #[serde(default)]
    pub is_booking: bool,

    #[serde(default)]
    pub purpose: Option<String>,

    #[serde(default)]
    pub booked_by: Option<String>,
}

/// Request body of `POST /api/entry`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRequest {
    pub mobile: String,
    pub name: String,
    pub designation: String,
    pub company: String,
    pub vehicle_number: String,
    /// `"None"` when the visitor carries no laptop
    pub laptop: String,
    pub to_meet: String,
    pub department: String,

    /// Captured photo as a JPEG data URL, omitted when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Response of `POST /api/entry`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResponse {
    pub status: String,

    #[serde(default)]
    pub pass_id: Option<PassId>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub in_time: Option<String>,

    /// Server-stored photo reference (the backend uploads the capture and
    /// returns its own URL; the pass shows this, not the local data URL)
    #[serde(default)]
    pub photo: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl EntryResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Request body of `POST /api/exit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitRequest {
    pub mobile: String,

    /// Optional `HH:MM` override for the recorded out-time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_time: Option<String>,
}

/// Response of `POST /api/exit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitResponse {
    pub status: String,

    #[serde(default)]
    pub out_time: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl ExitResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Response of `GET /api/get_next_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextIdResponse {
    pub next_id: PassId,
}

/// One row of `GET /api/get_active_visitors`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveVisitor {
    #[serde(default)]
    pub in_time: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vehicle: String,
    #[serde(default)]
    pub to_meet: String,
    #[serde(default)]
    pub dept: String,
    #[serde(default)]
    pub photo: String,
}

/// One row of `GET /api/get_today_bookings`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub booked_by: String,
    #[serde(default)]
    pub dept: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub visitor: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub vehicle_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_response_without_vehicle() {
        let json = r#"{"found":true,"name":"A","designation":"B","company":"C"}"#;
        let resp: LookupResponse = serde_json::from_str(json).unwrap();
        assert!(resp.found);
        assert_eq!(resp.name.as_deref(), Some("A"));
        assert_eq!(resp.designation.as_deref(), Some("B"));
        assert_eq!(resp.company.as_deref(), Some("C"));
        assert!(resp.vehicle.is_none());
        assert!(!resp.is_booking);
    }

    #[test]
    fn test_lookup_response_not_found() {
        let resp: LookupResponse = serde_json::from_str(r#"{"found":false}"#).unwrap();
        assert!(!resp.found);
        assert!(resp.name.is_none());
    }

    #[test]
    fn test_entry_request_omits_absent_image() {
        let req = EntryRequest {
            mobile: "9876543210".to_string(),
            name: "X".to_string(),
            designation: String::new(),
            company: String::new(),
            vehicle_number: String::new(),
            laptop: "None".to_string(),
            to_meet: "Y".to_string(),
            department: String::new(),
            image: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("image"));

        let req = EntryRequest {
            image: Some("data:image/jpeg;base64,/9j/".to_string()),
            ..req
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""image":"data:image/jpeg;base64,/9j/""#));
    }

    #[test]
    fn test_entry_response_pass_id_string_or_number() {
        let resp: EntryResponse = serde_json::from_str(
            r#"{"status":"success","pass_id":"P1","date":"2024-01-01","in_time":"10:00"}"#,
        )
        .unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.pass_id.unwrap().to_string(), "P1");

        let resp: EntryResponse =
            serde_json::from_str(r#"{"status":"success","pass_id":42}"#).unwrap();
        assert_eq!(resp.pass_id.unwrap().to_string(), "42");
    }

    #[test]
    fn test_entry_response_failure_message() {
        let resp: EntryResponse =
            serde_json::from_str(r#"{"status":"error","message":"Photo Upload Failed."}"#).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.message.as_deref(), Some("Photo Upload Failed."));
    }

    #[test]
    fn test_exit_request_omits_absent_out_time() {
        let req = ExitRequest {
            mobile: "9876543210".to_string(),
            out_time: None,
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"mobile":"9876543210"}"#
        );
    }
}
