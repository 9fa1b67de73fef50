use serde::Deserialize;

use crate::client::ManagementApi;
use crate::scheduler::Scheduler;
use crate::session::SessionGuard;
use crate::types::{EngineEvent, EventSink, Severity, VmSummary};

#[derive(Debug, Deserialize)]
struct VmListBody {
    vms: Vec<VmSummary>,
}

/// Fetches fresh per-VM statuses on user demand. The reply goes through the
/// session guard before the body is touched; any failure is a logged entry,
/// never a crash.
pub async fn refresh_statuses(
    api: &dyn ManagementApi,
    guard: &SessionGuard,
    scheduler: &dyn Scheduler,
    sink: &dyn EventSink,
) -> Option<Vec<VmSummary>> {
    let reply = match api.vm_list().await {
        Ok(reply) => reply,
        Err(err) => {
            sink.emit(EngineEvent::Log {
                severity: Severity::Error,
                message: format!("Refresh failed: {err}"),
            });
            return None;
        }
    };

    if let Some(verdict) = guard.verdict(&reply) {
        guard.announce(verdict, sink, scheduler).await;
        return None;
    }
    if !reply.is_success() {
        sink.emit(EngineEvent::Log {
            severity: Severity::Error,
            message: format!("Refresh failed: HTTP {}", reply.status),
        });
        return None;
    }

    let body: VmListBody = match serde_json::from_slice(&reply.body) {
        Ok(body) => body,
        Err(err) => {
            sink.emit(EngineEvent::Log {
                severity: Severity::Error,
                message: format!("Refresh failed: malformed body ({err})"),
            });
            return None;
        }
    };

    sink.emit(EngineEvent::StatusesRefreshed {
        vms: body.vms.clone(),
    });
    sink.emit(EngineEvent::Log {
        severity: Severity::Info,
        message: format!("Refresh completed ({} statuses)", body.vms.len()),
    });
    Some(body.vms)
}
