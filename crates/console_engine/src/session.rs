use std::time::Duration;

use serde::Deserialize;

use crate::client::HttpReply;
use crate::scheduler::Scheduler;
use crate::types::{EngineEvent, EventSink, Severity};

/// Delay between the expiry log entry and the navigation event, so the
/// entry settles visibly before the page goes away.
pub const REDIRECT_SETTLE_DELAY: Duration = Duration::from_millis(250);

const UNAUTHENTICATED_STATUS: u16 = 401;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionVerdict {
    pub redirect_target: String,
}

#[derive(Debug, Deserialize)]
struct RedirectBody {
    redirect: Option<String>,
}

/// Detects unauthenticated responses and runs the uniform
/// redirect-to-reauthenticate flow. Every remote call site routes its reply
/// through [`SessionGuard::verdict`] before interpreting the body.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    default_redirect: String,
}

impl SessionGuard {
    pub fn new(default_redirect: impl Into<String>) -> Self {
        Self {
            default_redirect: default_redirect.into(),
        }
    }

    /// `Some` iff the reply signals session expiry. The redirect target is
    /// taken from the JSON body when present; an absent or unparsable body
    /// falls back to the configured reauthentication URL and never raises.
    pub fn verdict(&self, reply: &HttpReply) -> Option<SessionVerdict> {
        if reply.status != UNAUTHENTICATED_STATUS {
            return None;
        }
        let redirect = serde_json::from_slice::<RedirectBody>(&reply.body)
            .ok()
            .and_then(|body| body.redirect)
            .unwrap_or_else(|| self.default_redirect.clone());
        Some(SessionVerdict {
            redirect_target: redirect,
        })
    }

    /// Logs the expiry, then schedules navigation after the settle delay.
    pub async fn announce(
        &self,
        verdict: SessionVerdict,
        sink: &dyn EventSink,
        scheduler: &dyn Scheduler,
    ) {
        sink.emit(EngineEvent::Log {
            severity: Severity::Warn,
            message: "Session expired; redirecting to sign-in".to_string(),
        });
        sink.emit(EngineEvent::SessionExpired {
            redirect: verdict.redirect_target.clone(),
        });
        scheduler.sleep(REDIRECT_SETTLE_DELAY).await;
        sink.emit(EngineEvent::Navigate {
            url: verdict.redirect_target,
        });
    }
}
