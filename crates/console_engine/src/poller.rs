use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use console_logging::console_debug;

use crate::client::ManagementApi;
use crate::scheduler::Scheduler;
use crate::session::{SessionGuard, SessionVerdict};
use crate::types::{EngineEvent, EventSink, JobSnapshot, Severity};

/// Delay before the first status request, so a burst of submissions does
/// not stampede the endpoint.
pub const INITIAL_POLL_DELAY: Duration = Duration::from_millis(250);

const BACKOFF_BASE_MS: u64 = 2000;
const BACKOFF_STEP_MS: u64 = 200;
const BACKOFF_CAP_MS: u64 = 6000;

/// Delay before poll attempt `attempts` (1-based): grows by one step per
/// cycle, soft-capped, never reset mid-session.
pub fn backoff_delay(attempts: u32) -> Duration {
    let ms = BACKOFF_BASE_MS + u64::from(attempts) * BACKOFF_STEP_MS;
    Duration::from_millis(ms.min(BACKOFF_CAP_MS))
}

enum Cycle {
    Settled(JobSnapshot),
    Outstanding(JobSnapshot),
    Expired(SessionVerdict),
    Failed,
}

/// Adaptive polling loop over the job-status endpoint. One in-flight
/// request at a time; a session ends on a terminal snapshot or on session
/// expiry, never on a transport failure.
pub struct JobStatusPoller {
    api: Arc<dyn ManagementApi>,
    guard: SessionGuard,
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn EventSink>,
    active: AtomicBool,
}

struct ActiveGuard<'a>(&'a AtomicBool);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl JobStatusPoller {
    pub fn new(
        api: Arc<dyn ManagementApi>,
        guard: SessionGuard,
        scheduler: Arc<dyn Scheduler>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            api,
            guard,
            scheduler,
            sink,
            active: AtomicBool::new(false),
        }
    }

    /// Polls until the remote reports no outstanding work. Resolves with
    /// the final snapshot, or `None` when the session expired mid-poll or
    /// another polling session is already active.
    pub async fn start(&self, skip_initial_wait: bool) -> Option<JobSnapshot> {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.log(
                Severity::Warn,
                "Job status poll already active; ignoring duplicate trigger".to_string(),
            );
            return None;
        }
        let _active = ActiveGuard(&self.active);

        let mut attempts: u32 = 0;
        if !skip_initial_wait {
            self.scheduler.sleep(INITIAL_POLL_DELAY).await;
        }

        loop {
            match self.poll_once().await {
                Cycle::Settled(snapshot) => {
                    if !snapshot.is_idle() {
                        self.log(
                            Severity::Info,
                            format!(
                                "All jobs completed: {} total, {} failed",
                                snapshot.done, snapshot.failed
                            ),
                        );
                    }
                    self.sink.emit(EngineEvent::JobsSettled { snapshot });
                    return Some(snapshot);
                }
                Cycle::Expired(verdict) => {
                    self.guard
                        .announce(verdict, self.sink.as_ref(), self.scheduler.as_ref())
                        .await;
                    return None;
                }
                Cycle::Outstanding(snapshot) => {
                    console_debug!("Jobs outstanding: {}/{} done", snapshot.done, snapshot.total);
                }
                Cycle::Failed => {}
            }
            attempts += 1;
            self.scheduler.sleep(backoff_delay(attempts)).await;
        }
    }

    async fn poll_once(&self) -> Cycle {
        let reply = match self.api.jobs_status().await {
            Ok(reply) => reply,
            Err(err) => {
                self.log(Severity::Error, format!("Job status poll failed: {err}"));
                return Cycle::Failed;
            }
        };

        if let Some(verdict) = self.guard.verdict(&reply) {
            return Cycle::Expired(verdict);
        }
        if !reply.is_success() {
            self.log(
                Severity::Error,
                format!("Job status poll failed: HTTP {}", reply.status),
            );
            return Cycle::Failed;
        }

        let snapshot: JobSnapshot = match serde_json::from_slice(&reply.body) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.log(
                    Severity::Error,
                    format!("Job status poll failed: malformed body ({err})"),
                );
                return Cycle::Failed;
            }
        };
        if !snapshot.is_consistent() {
            self.log(
                Severity::Error,
                format!(
                    "Job status poll failed: inconsistent counts total={} done={} failed={}",
                    snapshot.total, snapshot.done, snapshot.failed
                ),
            );
            return Cycle::Failed;
        }

        if snapshot.is_settled() {
            Cycle::Settled(snapshot)
        } else {
            Cycle::Outstanding(snapshot)
        }
    }

    fn log(&self, severity: Severity, message: String) {
        self.sink.emit(EngineEvent::Log { severity, message });
    }
}
