//! Console engine: remote I/O, job polling, and session recovery.
mod client;
mod engine;
mod error;
mod launcher;
mod persist;
mod poller;
mod refresh;
mod scheduler;
mod session;
mod types;

pub use client::{ApiSettings, HttpReply, ManagementApi, ReqwestApi};
pub use engine::{EngineConfig, EngineHandle};
pub use error::RemoteError;
pub use launcher::{
    Click, ConsoleLauncher, LaunchOutcome, Modifiers, MouseButton, OpenStyle, WindowOpener,
    POPUP_FEATURES,
};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use poller::{backoff_delay, JobStatusPoller, INITIAL_POLL_DELAY};
pub use refresh::refresh_statuses;
pub use scheduler::{Scheduler, TokioScheduler};
pub use session::{SessionGuard, SessionVerdict, REDIRECT_SETTLE_DELAY};
pub use types::{
    ChannelEventSink, EngineEvent, EventSink, JobSnapshot, Severity, VmSummary,
};
