//! Console core: pure state machines and view-model helpers.
mod action;
mod activity;
mod controller;
mod params;
mod presenter;
mod selection;
mod target;

pub use action::{confirmation_prompt, ActionRequest, BulkAction, CONFIRM_PREVIEW_LIMIT};
pub use activity::{
    ActivityLog, Clock, LogEntry, LogSink, LogStore, MemoryLogStore, Severity, StoreError,
    LOG_CAPACITY,
};
pub use controller::{
    BulkActionController, BulkPhase, Submission, SubmitGate, CONTROL_DISABLE_DELAY,
};
pub use params::ReturnParams;
pub use presenter::{ProgressPresenter, ProgressSink};
pub use selection::{Selection, SelectionSource};
pub use target::TargetId;
