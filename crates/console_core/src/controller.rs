use std::time::Duration;

use crate::{
    confirmation_prompt, ActionRequest, BulkAction, LogSink, ProgressSink, SelectionSource,
    Severity,
};

/// Delay before interactive controls are disabled after dispatch, so the
/// progress indicator renders first.
pub const CONTROL_DISABLE_DELAY: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkPhase {
    #[default]
    Idle,
    AwaitingConfirmation,
    Submitting,
    Disabled,
}

/// Outcome of a submission gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitGate {
    /// Nothing selected, or the gesture arrived in a phase that cannot
    /// accept it. No state change beyond logging.
    Rejected,
    /// The gesture passed the gate; present this prompt and feed the answer
    /// to [`BulkActionController::resolve_confirmation`].
    Confirm { prompt: String },
}

/// A confirmed request ready for dispatch to the page-level submission
/// mechanism. `disable_delay` is how long the driver waits before disabling
/// controls and calling [`BulkActionController::mark_dispatched`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub request: ActionRequest,
    pub disable_delay: Duration,
}

/// State machine governing selection, confirmation, submission and the
/// disabled-in-flight window for multi-target operations. Re-enabling of
/// controls belongs to the next full page load, not to this controller.
#[derive(Debug, Default)]
pub struct BulkActionController {
    phase: BulkPhase,
    pending: Option<ActionRequest>,
}

impl BulkActionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> BulkPhase {
        self.phase
    }

    /// Handles a submission gesture. Reads the selection once, here; an
    /// empty selection rejects the gesture without a state change.
    pub fn request_submit(
        &mut self,
        action: BulkAction,
        selection: &dyn SelectionSource,
        log: &mut dyn LogSink,
    ) -> SubmitGate {
        if self.phase != BulkPhase::Idle {
            return SubmitGate::Rejected;
        }
        let targets = selection.selected();
        if targets.is_empty() {
            log.append("No VMs selected; action aborted", Severity::Warn);
            return SubmitGate::Rejected;
        }
        let prompt = confirmation_prompt(action, &targets);
        self.pending = Some(ActionRequest::new(action, targets));
        self.phase = BulkPhase::AwaitingConfirmation;
        SubmitGate::Confirm { prompt }
    }

    /// Programmatic entry point for dedicated single-action buttons. Shows
    /// the overlay up front, then runs the identical gate; confirmation is
    /// never bypassed.
    pub fn trigger(
        &mut self,
        action: BulkAction,
        selection: &dyn SelectionSource,
        log: &mut dyn LogSink,
        progress: &mut dyn ProgressSink,
    ) -> SubmitGate {
        progress.show(&format!("Submitting {} request...", action.tag()));
        let gate = self.request_submit(action, selection, log);
        if gate == SubmitGate::Rejected {
            progress.hide();
        }
        gate
    }

    /// Applies the user's answer to the pending confirmation.
    ///
    /// Rejection clears the pending request so a retried gesture is not
    /// silently treated as already confirmed. Acceptance records the
    /// diagnostic entry, raises the progress overlay, and hands the request
    /// back for dispatch.
    pub fn resolve_confirmation(
        &mut self,
        accepted: bool,
        log: &mut dyn LogSink,
        progress: &mut dyn ProgressSink,
    ) -> Option<Submission> {
        if self.phase != BulkPhase::AwaitingConfirmation {
            return None;
        }
        let mut request = self.pending.take()?;

        if !accepted {
            log.append(
                &format!("Bulk {} canceled by user", request.action.tag()),
                Severity::Warn,
            );
            progress.hide();
            self.phase = BulkPhase::Idle;
            return None;
        }

        request.confirmed = true;
        let values = request
            .targets
            .iter()
            .map(|t| t.form_value())
            .collect::<Vec<_>>()
            .join(",");
        log.append(
            &format!(
                "Bulk submit: action={} total_selected={} values=[{}]",
                request.action.tag(),
                request.targets.len(),
                values
            ),
            Severity::Info,
        );
        progress.show(&format!(
            "Submitting {} for {} VM(s)...",
            request.action.tag(),
            request.targets.len()
        ));
        self.phase = BulkPhase::Submitting;
        Some(Submission {
            request,
            disable_delay: CONTROL_DISABLE_DELAY,
        })
    }

    /// Called by the driver once the submission has been handed off and the
    /// disable delay has elapsed. Controls stay disabled until the next page
    /// load builds a fresh controller.
    pub fn mark_dispatched(&mut self, log: &mut dyn LogSink, progress: &mut dyn ProgressSink) {
        if self.phase != BulkPhase::Submitting {
            return;
        }
        progress.disable_controls(None);
        log.append("Bulk action submitted (deferred disable)", Severity::Info);
        self.phase = BulkPhase::Disabled;
    }
}
