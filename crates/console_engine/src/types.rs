use std::sync::mpsc;

use serde::Deserialize;

/// One point-in-time read of aggregate job progress, as returned by the
/// job-status endpoint. Immutable once received; superseded by the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct JobSnapshot {
    pub total: u32,
    pub done: u32,
    pub failed: u32,
}

impl JobSnapshot {
    /// `done <= total` and `failed <= done`; anything else is a malformed
    /// payload and takes the transport-failure path.
    pub fn is_consistent(&self) -> bool {
        self.done <= self.total && self.failed <= self.done
    }

    /// No outstanding work at all, the steady-state answer when no bulk
    /// action is in flight.
    pub fn is_idle(&self) -> bool {
        self.total == 0
    }

    pub fn is_settled(&self) -> bool {
        self.done >= self.total
    }
}

/// One row of the vm-list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VmSummary {
    pub node: String,
    pub vmid: String,
    pub status: String,
}

/// Severity of an engine-emitted activity line. The application maps this
/// onto the core log severity at the crate boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A human-readable activity line for the session log.
    Log { severity: Severity, message: String },
    /// The remote no longer recognizes the session; navigation follows
    /// after the settle delay.
    SessionExpired { redirect: String },
    /// Navigate to the reauthentication target now.
    Navigate { url: String },
    /// A polling session reached a terminal snapshot.
    JobsSettled { snapshot: JobSnapshot },
    /// A manual refresh produced fresh per-VM statuses.
    StatusesRefreshed { vms: Vec<VmSummary> },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
