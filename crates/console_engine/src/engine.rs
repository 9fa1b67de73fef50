use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crate::client::{ApiSettings, ManagementApi, ReqwestApi};
use crate::poller::JobStatusPoller;
use crate::refresh::refresh_statuses;
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::session::SessionGuard;
use crate::types::{ChannelEventSink, EngineEvent, EventSink};
use crate::RemoteError;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api: ApiSettings,
    /// Reauthentication URL used when an expired-session reply carries no
    /// redirect of its own.
    pub default_redirect: String,
}

enum EngineCommand {
    WaitForJobs { skip_initial_wait: bool },
    RefreshStatuses,
}

/// Handle to the remote-I/O worker: a dedicated thread owning a tokio
/// runtime, commands in, events out. The poller instance is shared across
/// spawned tasks so its single-flight guard holds across triggers.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, RemoteError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let api: Arc<dyn ManagementApi> = Arc::new(ReqwestApi::new(config.api)?);
        let guard = SessionGuard::new(config.default_redirect);
        let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler);
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
        let poller = Arc::new(JobStatusPoller::new(
            api.clone(),
            guard.clone(),
            scheduler.clone(),
            sink.clone(),
        ));

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::WaitForJobs { skip_initial_wait } => {
                        let poller = poller.clone();
                        runtime.spawn(async move {
                            poller.start(skip_initial_wait).await;
                        });
                    }
                    EngineCommand::RefreshStatuses => {
                        let api = api.clone();
                        let guard = guard.clone();
                        let scheduler = scheduler.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            refresh_statuses(
                                api.as_ref(),
                                &guard,
                                scheduler.as_ref(),
                                sink.as_ref(),
                            )
                            .await;
                        });
                    }
                }
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn wait_for_jobs(&self, skip_initial_wait: bool) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::WaitForJobs { skip_initial_wait });
    }

    pub fn refresh_statuses(&self) {
        let _ = self.cmd_tx.send(EngineCommand::RefreshStatuses);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}
