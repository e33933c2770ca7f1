//! VisitForm - Typed Entry Form State
//!
//! The view-model behind the registration form. All autofill and payload
//! assembly goes through this struct, so the flow is testable without a UI.

use crate::gate_client::{EntryRequest, LookupResponse};
use serde::{Deserialize, Serialize};

/// Sentinel sent when the visitor carries no laptop
pub const NO_LAPTOP: &str = "None";

/// Entry form fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitForm {
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub vehicle: String,
    #[serde(default)]
    pub laptop: String,
    #[serde(default)]
    pub to_meet: String,
    #[serde(default)]
    pub department: String,
}

impl VisitForm {
    /// Autofill from a lookup match
    ///
    /// Vehicle is blanked when the record has none. The supplemental fields
    /// (laptop, to_meet, department) are filled only when the backend sent
    /// them, so a plain lookup never clobbers operator input.
    pub fn apply_lookup(&mut self, lookup: &LookupResponse) {
        self.name = lookup.name.clone().unwrap_or_default();
        self.designation = lookup.designation.clone().unwrap_or_default();
        self.company = lookup.company.clone().unwrap_or_default();
        self.vehicle = lookup.vehicle.clone().unwrap_or_default();

        if let Some(ref laptop) = lookup.laptop {
            self.laptop = laptop.clone();
        }
        if let Some(ref to_meet) = lookup.to_meet {
            self.to_meet = to_meet.clone();
        }
        if let Some(ref department) = lookup.department {
            self.department = department.clone();
        }
    }

    /// Required inputs that are still missing, in display order
    ///
    /// Name and To Meet come from the form, the photo from the capture slot.
    pub fn missing_required(&self, has_photo: bool) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("Name");
        }
        if self.to_meet.trim().is_empty() {
            missing.push("To Meet");
        }
        if !has_photo {
            missing.push("Capture Photo");
        }
        missing
    }

    /// Assemble the entry payload; a blank laptop field becomes the
    /// `"None"` sentinel
    pub fn to_entry_request(&self, image: Option<String>) -> EntryRequest {
        let laptop = if self.laptop.is_empty() {
            NO_LAPTOP.to_string()
        } else {
            self.laptop.clone()
        };

        EntryRequest {
            mobile: self.mobile.clone(),
            name: self.name.clone(),
            designation: self.designation.clone(),
            company: self.company.clone(),
            vehicle_number: self.vehicle.clone(),
            laptop,
            to_meet: self.to_meet.clone(),
            department: self.department.clone(),
            image,
        }
    }

    /// Reset every field
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_lookup_autofill() {
        let lookup: LookupResponse = serde_json::from_str(
            r#"{"found":true,"name":"A","designation":"B","company":"C"}"#,
        )
        .unwrap();

        let mut form = VisitForm {
            vehicle: "KA01AB1234".to_string(),
            ..Default::default()
        };
        form.apply_lookup(&lookup);

        assert_eq!(form.name, "A");
        assert_eq!(form.designation, "B");
        assert_eq!(form.company, "C");
        // record without a vehicle blanks the field
        assert_eq!(form.vehicle, "");
    }

    #[test]
    fn test_apply_lookup_keeps_operator_input_for_supplemental_fields() {
        let lookup: LookupResponse =
            serde_json::from_str(r#"{"found":true,"name":"A"}"#).unwrap();

        let mut form = VisitForm {
            to_meet: "Dr. Rao".to_string(),
            ..Default::default()
        };
        form.apply_lookup(&lookup);
        assert_eq!(form.to_meet, "Dr. Rao");

        let lookup: LookupResponse = serde_json::from_str(
            r#"{"found":true,"name":"A","to_meet":"Principal","department":"CSE"}"#,
        )
        .unwrap();
        form.apply_lookup(&lookup);
        assert_eq!(form.to_meet, "Principal");
        assert_eq!(form.department, "CSE");
    }

    #[test]
    fn test_missing_required() {
        let form = VisitForm::default();
        assert_eq!(
            form.missing_required(false),
            vec!["Name", "To Meet", "Capture Photo"]
        );

        let form = VisitForm {
            name: "X".to_string(),
            to_meet: "Y".to_string(),
            ..Default::default()
        };
        assert_eq!(form.missing_required(false), vec!["Capture Photo"]);
        assert!(form.missing_required(true).is_empty());

        // whitespace-only input does not count
        let form = VisitForm {
            name: "  ".to_string(),
            to_meet: "Y".to_string(),
            ..Default::default()
        };
        assert_eq!(form.missing_required(true), vec!["Name"]);
    }

    #[test]
    fn test_entry_request_laptop_sentinel() {
        let form = VisitForm {
            mobile: "9876543210".to_string(),
            name: "X".to_string(),
            to_meet: "Y".to_string(),
            ..Default::default()
        };

        let req = form.to_entry_request(None);
        assert_eq!(req.laptop, "None");

        let form = VisitForm {
            laptop: "Dell XPS".to_string(),
            ..form
        };
        let req = form.to_entry_request(None);
        assert_eq!(req.laptop, "Dell XPS");
    }

    #[test]
    fn test_clear() {
        let mut form = VisitForm {
            mobile: "9876543210".to_string(),
            name: "X".to_string(),
            ..Default::default()
        };
        form.clear();
        assert_eq!(form, VisitForm::default());
    }
}
