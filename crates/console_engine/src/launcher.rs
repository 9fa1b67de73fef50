use std::sync::Arc;

use crate::types::{EngineEvent, EventSink, Severity};

/// Feature string for the chrome-less console popup.
pub const POPUP_FEATURES: &str =
    "width=1100,height=760,menubar=no,toolbar=no,location=no,status=no,resizable=yes,scrollbars=yes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl Click {
    pub fn plain_primary() -> Self {
        Self {
            button: MouseButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    fn is_plain_primary(&self) -> bool {
        self.button == MouseButton::Primary && !self.modifiers.any()
    }
}

/// One way of opening the console window, tried in order until one works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenStyle {
    /// Fixed-size chrome-less window keyed per target, so repeated launches
    /// reuse one window instead of spawning duplicates.
    NamedPopup {
        name: String,
        features: &'static str,
    },
    /// Unnamed new window or tab.
    BlankTab,
    /// Navigation in the current tab; cannot fail.
    SameTab,
}

pub trait WindowOpener {
    /// Returns false when the host refused the window (popup blocked).
    fn open(&mut self, url: &str, style: &OpenStyle) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Modified or non-primary click; the host's native behavior applies.
    Ignored,
    Popup,
    NewTab,
    SameTab,
}

/// Best-effort console-window opener with an ordered fallback chain.
pub struct ConsoleLauncher {
    opener: Box<dyn WindowOpener>,
    sink: Arc<dyn EventSink>,
}

impl ConsoleLauncher {
    pub fn new(opener: Box<dyn WindowOpener>, sink: Arc<dyn EventSink>) -> Self {
        Self { opener, sink }
    }

    pub fn launch(&mut self, click: Click, url: &str, vmid: &str) -> LaunchOutcome {
        if !click.is_plain_primary() {
            return LaunchOutcome::Ignored;
        }

        let windowed = [
            (
                OpenStyle::NamedPopup {
                    name: format!("vm_console_{vmid}"),
                    features: POPUP_FEATURES,
                },
                LaunchOutcome::Popup,
            ),
            (OpenStyle::BlankTab, LaunchOutcome::NewTab),
        ];
        for (style, outcome) in windowed {
            if self.opener.open(url, &style) {
                self.log(Severity::Info, format!("Opened console for VM {vmid}"));
                return outcome;
            }
        }

        // Terminal strategy: same-tab navigation, which cannot be refused.
        self.log(
            Severity::Warn,
            "Popup blocked; falling back to same-tab navigation".to_string(),
        );
        self.opener.open(url, &OpenStyle::SameTab);
        self.log(
            Severity::Info,
            format!("Opened console (same tab) for VM {vmid}"),
        );
        LaunchOutcome::SameTab
    }

    fn log(&self, severity: Severity, message: String) {
        self.sink.emit(EngineEvent::Log { severity, message });
    }
}
