/// Write side of the non-blocking progress surface. The controller and the
/// session write through this; the presenter itself makes no decisions.
pub trait ProgressSink {
    fn show(&mut self, message: &str);
    fn hide(&mut self);
    /// Disables interactive controls. `label` replaces every control's text;
    /// `None` keeps the original labels for later restoration.
    fn disable_controls(&mut self, label: Option<&str>);
    fn enable_controls(&mut self);
}

/// Observational UI state: busy flag, overlay message, and the sign-out
/// redirect countdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressPresenter {
    busy: bool,
    overlay: Option<String>,
    controls_disabled: bool,
    busy_label: Option<String>,
    countdown: Option<u32>,
}

impl ProgressPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn overlay_message(&self) -> Option<&str> {
        self.overlay.as_deref()
    }

    pub fn controls_disabled(&self) -> bool {
        self.controls_disabled
    }

    pub fn busy_label(&self) -> Option<&str> {
        self.busy_label.as_deref()
    }

    pub fn countdown(&self) -> Option<u32> {
        self.countdown
    }

    pub fn start_countdown(&mut self, seconds: u32) {
        self.countdown = Some(seconds);
    }

    /// Decrements the countdown; returns the remaining seconds, `None` once
    /// it has elapsed.
    pub fn tick(&mut self) -> Option<u32> {
        self.countdown = match self.countdown {
            Some(0) | None => None,
            Some(n) => Some(n - 1),
        };
        self.countdown
    }
}

impl ProgressSink for ProgressPresenter {
    fn show(&mut self, message: &str) {
        self.busy = true;
        self.overlay = Some(message.to_owned());
    }

    fn hide(&mut self) {
        self.busy = false;
        self.overlay = None;
    }

    fn disable_controls(&mut self, label: Option<&str>) {
        self.controls_disabled = true;
        self.busy_label = label.map(str::to_owned);
    }

    fn enable_controls(&mut self) {
        self.controls_disabled = false;
        self.busy_label = None;
    }
}
