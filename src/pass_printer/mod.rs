//! PassPrinter - Printable Visitor Pass
//!
//! ## Responsibilities
//!
//! - Assemble the pass from the entry response and the submitted form
//! - Render a self-contained printable HTML document
//! - Spool to disk and optionally pipe to a printer command
//!
//! The photo on the pass is the server-stored copy from the entry response,
//! not the local capture; the backend may have transformed or re-hosted it.

use crate::error::{Error, Result};
use crate::gate_client::EntryResponse;
use crate::visit_form::VisitForm;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;

/// A filled visitor pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassTicket {
    pub pass_id: String,
    pub date: String,
    pub in_time: String,
    pub mobile: String,
    pub name: String,
    pub designation: String,
    pub company: String,
    pub vehicle: String,
    pub laptop: String,
    pub to_meet: String,
    pub department: String,
    /// Server-stored photo reference
    pub photo: String,
}

impl PassTicket {
    /// Build the pass: id/date/time/photo from the response, visitor and
    /// visit metadata from the submitted form
    pub fn from_entry(response: &EntryResponse, form: &VisitForm, laptop: &str) -> Self {
        Self {
            pass_id: response
                .pass_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            date: response.date.clone().unwrap_or_default(),
            in_time: response.in_time.clone().unwrap_or_default(),
            mobile: form.mobile.clone(),
            name: form.name.clone(),
            designation: form.designation.clone(),
            company: form.company.clone(),
            vehicle: form.vehicle.clone(),
            laptop: laptop.to_string(),
            to_meet: form.to_meet.clone(),
            department: form.department.clone(),
            photo: response.photo.clone().unwrap_or_default(),
        }
    }

    /// Render as a self-contained printable HTML document
    pub fn render_html(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Visitor Pass #{pass_id}</title>
<style>
  body {{ font-family: sans-serif; width: 320px; margin: 0 auto; }}
  .pass {{ border: 2px solid #000; padding: 12px; }}
  .pass h1 {{ font-size: 16px; text-align: center; margin: 0 0 8px; }}
  .photo {{ display: block; width: 120px; height: 120px; object-fit: cover; margin: 0 auto 8px; }}
  table {{ width: 100%; font-size: 12px; border-collapse: collapse; }}
  td {{ padding: 2px 4px; vertical-align: top; }}
  td:first-child {{ font-weight: bold; white-space: nowrap; }}
</style>
</head>
<body>
<div class="pass">
  <h1>VISITOR PASS</h1>
  <img class="photo" src="{photo}" alt="visitor photo">
  <table>
    <tr><td>Pass No.</td><td>{pass_id}</td></tr>
    <tr><td>Date</td><td>{date}</td></tr>
    <tr><td>In Time</td><td>{in_time}</td></tr>
    <tr><td>Name</td><td>{name}</td></tr>
    <tr><td>Designation</td><td>{designation}</td></tr>
    <tr><td>Company</td><td>{company}</td></tr>
    <tr><td>Mobile</td><td>{mobile}</td></tr>
    <tr><td>Laptop</td><td>{laptop}</td></tr>
    <tr><td>Vehicle</td><td>{vehicle}</td></tr>
    <tr><td>To Meet</td><td>{to_meet}</td></tr>
    <tr><td>Department</td><td>{department}</td></tr>
  </table>
</div>
</body>
</html>
"#,
            pass_id = esc(&self.pass_id),
            date = esc(&self.date),
            in_time = esc(&self.in_time),
            name = esc(&self.name),
            designation = esc(&self.designation),
            company = esc(&self.company),
            mobile = esc(&self.mobile),
            laptop = esc(&self.laptop),
            vehicle = esc(&self.vehicle),
            to_meet = esc(&self.to_meet),
            department = esc(&self.department),
            photo = esc(&self.photo),
        )
    }
}

/// Escape form input for HTML embedding
fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// PassPrinter instance
pub struct PassPrinter {
    /// Spool directory for rendered passes
    spool_dir: PathBuf,
    /// Printer command (e.g. "lp"); spool-only when unset
    printer_cmd: Option<String>,
    /// Printer command timeout in seconds
    print_timeout_sec: u64,
}

impl PassPrinter {
    /// Create a new PassPrinter
    pub async fn new(
        spool_dir: PathBuf,
        printer_cmd: Option<String>,
        print_timeout_sec: u64,
    ) -> Result<Self> {
        fs::create_dir_all(&spool_dir).await?;

        Ok(Self {
            spool_dir,
            printer_cmd,
            print_timeout_sec,
        })
    }

    /// Whether a printer command is configured
    pub fn has_printer(&self) -> bool {
        self.printer_cmd.is_some()
    }

    /// Spool the pass and print it when a printer is configured
    ///
    /// Returns the spool path. Spool file names follow the backend's photo
    /// naming: date, mobile, time.
    pub async fn print(&self, ticket: &PassTicket) -> Result<PathBuf> {
        let now = chrono::Local::now();
        let filename = format!(
            "{}_{}_{}.html",
            now.format("%d-%m-%Y"),
            ticket.mobile,
            now.format("%H%M%S")
        );
        let path = self.spool_dir.join(filename);

        fs::write(&path, ticket.render_html()).await?;
        tracing::info!(
            pass_id = %ticket.pass_id,
            path = %path.display(),
            "Pass spooled"
        );

        if let Some(ref cmd) = self.printer_cmd {
            self.run_printer(cmd, &path).await?;
        }

        Ok(path)
    }

    /// Pipe a spooled pass to the printer command
    ///
    /// kill_on_drop(true): a wedged print subprocess is killed when the
    /// timeout cancels the wait.
    async fn run_printer(&self, cmd: &str, path: &PathBuf) -> Result<()> {
        let child = Command::new(cmd)
            .arg(path)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Printer(format!("{} spawn failed: {}", cmd, e)))?;

        let timeout = Duration::from_secs(self.print_timeout_sec);

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) if output.status.success() => {
                tracing::info!(cmd = %cmd, path = %path.display(), "Pass sent to printer");
                Ok(())
            }
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(Error::Printer(format!(
                    "{} failed: {}",
                    cmd,
                    stderr.trim()
                )))
            }
            Ok(Err(e)) => Err(Error::Printer(format!("{} execution failed: {}", cmd, e))),
            Err(_) => {
                tracing::warn!(
                    timeout_sec = self.print_timeout_sec,
                    cmd = %cmd,
                    "Printer timeout, process killed via kill_on_drop"
                );
                Err(Error::Printer(format!(
                    "Printer timeout ({}s)",
                    self.print_timeout_sec
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate_client::EntryResponse;

    fn sample_response() -> EntryResponse {
        serde_json::from_str(
            r#"{"status":"success","pass_id":"P1","date":"2024-01-01","in_time":"10:00","photo":"https://photos.example/p1.jpg"}"#,
        )
        .unwrap()
    }

    fn sample_form() -> VisitForm {
        VisitForm {
            mobile: "9876543210".to_string(),
            name: "X".to_string(),
            designation: "Engineer".to_string(),
            company: "Acme".to_string(),
            vehicle: "KA01AB1234".to_string(),
            to_meet: "Y".to_string(),
            department: "CSE".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ticket_fields_from_response_and_form() {
        let ticket = PassTicket::from_entry(&sample_response(), &sample_form(), "None");

        assert_eq!(ticket.pass_id, "P1");
        assert_eq!(ticket.date, "2024-01-01");
        assert_eq!(ticket.in_time, "10:00");
        assert_eq!(ticket.name, "X");
        assert_eq!(ticket.to_meet, "Y");
        assert_eq!(ticket.laptop, "None");
        // photo comes from the server, never the local capture
        assert_eq!(ticket.photo, "https://photos.example/p1.jpg");
    }

    #[test]
    fn test_render_html_contains_every_field() {
        let ticket = PassTicket::from_entry(&sample_response(), &sample_form(), "None");
        let html = ticket.render_html();

        for value in [
            "P1",
            "2024-01-01",
            "10:00",
            "X",
            "Engineer",
            "Acme",
            "9876543210",
            "None",
            "KA01AB1234",
            "Y",
            "CSE",
            "https://photos.example/p1.jpg",
        ] {
            assert!(html.contains(value), "missing {value} in rendered pass");
        }
    }

    #[test]
    fn test_render_html_escapes_input() {
        let mut form = sample_form();
        form.company = "<script>alert(1)</script>".to_string();
        let ticket = PassTicket::from_entry(&sample_response(), &form, "None");
        let html = ticket.render_html();

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_print_spools_without_printer() {
        let dir = std::env::temp_dir().join(format!("kiosk-spool-{}", uuid::Uuid::new_v4()));
        let printer = PassPrinter::new(dir.clone(), None, 5).await.unwrap();
        assert!(!printer.has_printer());

        let ticket = PassTicket::from_entry(&sample_response(), &sample_form(), "None");
        let path = printer.print(&ticket).await.unwrap();

        let spooled = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(spooled.contains("VISITOR PASS"));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .contains("9876543210"));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
