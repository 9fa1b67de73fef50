use url::form_urlencoded;

use crate::{LogSink, Severity};

/// Query parameters a completed bulk operation redirects back with. Parsed
/// once at page load, used to seed the activity log retroactively, then
/// discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnParams {
    pub bulk: Option<String>,
    pub done: u32,
    pub failed: u32,
    pub skipped: u32,
    pub success_list: Vec<String>,
    pub skip_list: Vec<String>,
    pub fail_list: Vec<String>,
    /// `jobs=1` — wait for outstanding jobs, then refresh. The sole
    /// automatic trigger of a polling session.
    pub wait_jobs: bool,
}

impl ReturnParams {
    /// Parses a raw query string (without the leading `?`).
    pub fn parse(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "bulk" if !value.is_empty() => params.bulk = Some(value.into_owned()),
                "done" => params.done = value.parse().unwrap_or(0),
                "failed" => params.failed = value.parse().unwrap_or(0),
                "skipped" => params.skipped = value.parse().unwrap_or(0),
                "success_list" => params.success_list = split_list(&value),
                "skip_list" => params.skip_list = split_list(&value),
                "fail_list" => params.fail_list = split_list(&value),
                "jobs" => params.wait_jobs = value == "1",
                _ => {}
            }
        }
        params
    }

    /// Appends the retroactive entries for the previous bulk operation:
    /// summary first, then per-target success, skip, and failure lines.
    pub fn seed(&self, log: &mut dyn LogSink) {
        if let Some(action) = &self.bulk {
            let mut summary = format!(
                "Bulk {} summary: {} ok, {} failed",
                action, self.done, self.failed
            );
            if self.skipped > 0 {
                summary.push_str(&format!(", {} skipped", self.skipped));
            }
            let severity = if self.failed > 0 {
                Severity::Warn
            } else {
                Severity::Success
            };
            log.append(&summary, severity);
        }
        for item in &self.success_list {
            log.append(&format!("\u{2714} {item}"), Severity::Success);
        }
        for item in &self.skip_list {
            log.append(&format!("\u{21b7} {item}"), Severity::Info);
        }
        for item in &self.fail_list {
            log.append(&format!("\u{2716} {item}"), Severity::Error);
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
