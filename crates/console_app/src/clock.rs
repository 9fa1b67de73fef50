use chrono::{SecondsFormat, Utc};
use console_core::Clock;

/// Wall-clock timestamps in the ISO-8601 form the activity log renders.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_iso(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
