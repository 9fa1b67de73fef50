use std::process::Command;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use console_core::{
    ActionRequest, ActivityLog, BulkAction, BulkActionController, ProgressPresenter,
    ProgressSink, ReturnParams, Selection, Severity, SubmitGate, TargetId,
};
use console_engine::{
    ApiSettings, ChannelEventSink, Click, ConsoleLauncher, EngineConfig, EngineEvent,
    EngineHandle, JobSnapshot, LaunchOutcome, OpenStyle, VmSummary, WindowOpener,
};
use console_logging::{console_debug, console_info, console_warn};

use crate::clock::SystemClock;
use crate::config::AppConfig;
use crate::persistence::FileLogStore;

/// How long one quiet stretch may last before the wait loop re-checks; the
/// poller emits nothing between non-terminal cycles, so this is not a
/// deadline, just a heartbeat.
const EVENT_WAIT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    Settled(JobSnapshot),
    Navigated(String),
}

/// One page load's worth of console-client state: the activity log, the
/// selection, the bulk controller, the progress surface, and the remote
/// engine, wired together the way the page wires them.
pub struct PageSession {
    config: AppConfig,
    log: ActivityLog,
    selection: Selection,
    controller: BulkActionController,
    presenter: ProgressPresenter,
    engine: EngineHandle,
    launcher_sink: Arc<ChannelEventSink>,
    launcher_events: mpsc::Receiver<EngineEvent>,
}

impl PageSession {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let mut api = ApiSettings::for_base(&config.base_url);
        api.verify_tls = config.verify_tls;
        let engine = EngineHandle::new(EngineConfig {
            api,
            default_redirect: config.signin_url(),
        })?;

        let log = ActivityLog::new(
            Box::new(FileLogStore::new(config.state_dir.clone())),
            Box::new(SystemClock),
        );

        let (launcher_tx, launcher_events) = mpsc::channel();
        Ok(Self {
            config,
            log,
            selection: Selection::new(),
            controller: BulkActionController::new(),
            presenter: ProgressPresenter::new(),
            engine,
            launcher_sink: Arc::new(ChannelEventSink::new(launcher_tx)),
            launcher_events,
        })
    }

    /// Page-load sequence: restore the persisted log, seed it from the
    /// return query, and honor the wait-for-jobs flag.
    pub fn bootstrap(&mut self, return_query: Option<&str>) {
        self.log.restore();
        if let Some(query) = return_query {
            let params = ReturnParams::parse(query);
            params.seed(&mut self.log);
            if params.wait_jobs {
                if let WaitOutcome::Settled(_) = self.wait_for_jobs(false) {
                    self.refresh();
                }
            }
        }
    }

    /// Blocks until the outstanding jobs settle or the session expires.
    pub fn wait_for_jobs(&mut self, skip_initial_wait: bool) -> WaitOutcome {
        self.engine.wait_for_jobs(skip_initial_wait);
        loop {
            let Some(event) = self.engine.recv_timeout(EVENT_WAIT) else {
                console_debug!("Still waiting for outstanding jobs");
                continue;
            };
            match self.apply_event(event) {
                Applied::Settled(snapshot) => return WaitOutcome::Settled(snapshot),
                Applied::Navigated(url) => return WaitOutcome::Navigated(url),
                Applied::Refreshed(_) | Applied::Other => {}
            }
        }
    }

    /// Manual refresh of per-VM statuses, busy overlay up while in flight.
    pub fn refresh(&mut self) -> Option<Vec<VmSummary>> {
        self.presenter.show("Refreshing VM status...");
        self.engine.refresh_statuses();
        let mut result = None;
        loop {
            let Some(event) = self.engine.recv_timeout(EVENT_WAIT) else {
                console_debug!("Still waiting for the status refresh");
                continue;
            };
            // The refresh surfaces failures only as error-severity entries;
            // one of those ends the wait just like a result does.
            let failed = matches!(
                &event,
                EngineEvent::Log {
                    severity: console_engine::Severity::Error,
                    ..
                }
            );
            match self.apply_event(event) {
                Applied::Refreshed(vms) => {
                    result = Some(vms);
                    break;
                }
                Applied::Navigated(_) => break,
                Applied::Settled(_) | Applied::Other => {
                    if failed {
                        break;
                    }
                }
            }
        }
        self.presenter.hide();
        result
    }

    /// Replaces the selection with the parsed targets; unparsable values
    /// are dropped with a facade warning.
    pub fn set_targets(&mut self, raws: &[String]) {
        self.selection.clear();
        for raw in raws {
            match TargetId::parse(raw) {
                Some(target) => {
                    self.selection.select(target);
                }
                None => console_warn!("Ignoring malformed target value {:?}", raw),
            }
        }
    }

    /// Runs the full gate → confirm → dispatch flow. `confirm` receives the
    /// prompt text and answers for the user. Returns the confirmed request
    /// for the page-level submission mechanism.
    pub fn run_bulk(
        &mut self,
        action: BulkAction,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Option<ActionRequest> {
        let gate = self
            .controller
            .request_submit(action, &self.selection, &mut self.log);
        let prompt = match gate {
            SubmitGate::Rejected => return None,
            SubmitGate::Confirm { prompt } => prompt,
        };

        let accepted = confirm(&prompt);
        let submission =
            self.controller
                .resolve_confirmation(accepted, &mut self.log, &mut self.presenter)?;

        // Let the overlay render before the controls freeze.
        thread::sleep(submission.disable_delay);
        self.controller
            .mark_dispatched(&mut self.log, &mut self.presenter);
        Some(submission.request)
    }

    /// Opens the noVNC console for one VM through the fallback chain.
    pub fn open_console(&mut self, node: &str, vmid: &str) -> LaunchOutcome {
        let url = console_url(&self.config.base_url, node, vmid);
        let mut launcher =
            ConsoleLauncher::new(Box::new(ExecOpener::from_env()), self.launcher_sink.clone());
        let outcome = launcher.launch(Click::plain_primary(), &url, vmid);
        while let Ok(event) = self.launcher_events.try_recv() {
            self.apply_event(event);
        }
        outcome
    }

    pub fn presenter(&self) -> &ProgressPresenter {
        &self.presenter
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.log.rendered_lines()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn apply_event(&mut self, event: EngineEvent) -> Applied {
        match event {
            EngineEvent::Log { severity, message } => {
                self.log.append(&message, map_severity(severity));
                Applied::Other
            }
            EngineEvent::SessionExpired { .. } => {
                self.presenter.show("Session expired; redirecting...");
                Applied::Other
            }
            EngineEvent::Navigate { url } => {
                console_info!("Navigating to {}", url);
                Applied::Navigated(url)
            }
            EngineEvent::JobsSettled { snapshot } => Applied::Settled(snapshot),
            EngineEvent::StatusesRefreshed { vms } => Applied::Refreshed(vms),
        }
    }
}

enum Applied {
    Settled(JobSnapshot),
    Navigated(String),
    Refreshed(Vec<VmSummary>),
    Other,
}

fn map_severity(severity: console_engine::Severity) -> Severity {
    match severity {
        console_engine::Severity::Info => Severity::Info,
        console_engine::Severity::Warn => Severity::Warn,
        console_engine::Severity::Error => Severity::Error,
    }
}

fn console_url(base: &str, node: &str, vmid: &str) -> String {
    format!("{base}/proxmox/?console=kvm&novnc=1&node={node}&vmid={vmid}&resize=scale")
}

/// Opens console URLs through the desktop's browser handler. The same-tab
/// terminal strategy prints the URL so the user can follow it by hand.
struct ExecOpener {
    command: String,
}

impl ExecOpener {
    fn from_env() -> Self {
        Self {
            command: std::env::var("BROWSER").unwrap_or_else(|_| "xdg-open".to_string()),
        }
    }
}

impl WindowOpener for ExecOpener {
    fn open(&mut self, url: &str, style: &OpenStyle) -> bool {
        match style {
            OpenStyle::NamedPopup { .. } | OpenStyle::BlankTab => {
                Command::new(&self.command).arg(url).spawn().is_ok()
            }
            OpenStyle::SameTab => {
                println!("{url}");
                true
            }
        }
    }
}
