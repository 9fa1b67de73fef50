use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use console_engine::{
    Click, ConsoleLauncher, EngineEvent, EventSink, LaunchOutcome, Modifiers, MouseButton,
    OpenStyle, Severity, WindowOpener, POPUP_FEATURES,
};

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Default)]
struct OpenerState {
    popup_ok: bool,
    blank_ok: bool,
    attempts: Vec<OpenStyle>,
}

/// Clones share one state so the test can inspect attempts after moving the
/// opener into the launcher.
#[derive(Clone, Default)]
struct ScriptedOpener {
    state: Rc<RefCell<OpenerState>>,
}

impl ScriptedOpener {
    fn new(popup_ok: bool, blank_ok: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(OpenerState {
                popup_ok,
                blank_ok,
                attempts: Vec::new(),
            })),
        }
    }

    fn attempts(&self) -> Vec<OpenStyle> {
        self.state.borrow().attempts.clone()
    }
}

impl WindowOpener for ScriptedOpener {
    fn open(&mut self, _url: &str, style: &OpenStyle) -> bool {
        let mut state = self.state.borrow_mut();
        state.attempts.push(style.clone());
        match style {
            OpenStyle::NamedPopup { .. } => state.popup_ok,
            OpenStyle::BlankTab => state.blank_ok,
            OpenStyle::SameTab => true,
        }
    }
}

fn launcher(opener: ScriptedOpener, sink: Arc<TestSink>) -> ConsoleLauncher {
    ConsoleLauncher::new(Box::new(opener), sink)
}

fn log_messages(events: &[EngineEvent]) -> Vec<(Severity, String)> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Log { severity, message } => Some((*severity, message.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn modified_clicks_are_left_to_the_host() {
    let opener = ScriptedOpener::new(true, true);
    let sink = Arc::new(TestSink::default());
    let mut launcher = launcher(opener.clone(), sink.clone());

    let ctrl_click = Click {
        button: MouseButton::Primary,
        modifiers: Modifiers {
            ctrl: true,
            ..Modifiers::default()
        },
    };
    assert_eq!(
        launcher.launch(ctrl_click, "/console?vmid=100", "100"),
        LaunchOutcome::Ignored
    );

    let middle_click = Click {
        button: MouseButton::Auxiliary,
        modifiers: Modifiers::default(),
    };
    assert_eq!(
        launcher.launch(middle_click, "/console?vmid=100", "100"),
        LaunchOutcome::Ignored
    );

    assert!(opener.attempts().is_empty());
    assert!(sink.take().is_empty());
}

#[test]
fn popup_succeeds_with_a_per_target_window_name() {
    let opener = ScriptedOpener::new(true, true);
    let sink = Arc::new(TestSink::default());
    let mut launcher = launcher(opener.clone(), sink.clone());

    let outcome = launcher.launch(Click::plain_primary(), "/console?vmid=100", "100");

    assert_eq!(outcome, LaunchOutcome::Popup);
    let attempts = opener.attempts();
    assert_eq!(attempts.len(), 1);
    assert_eq!(
        attempts[0],
        OpenStyle::NamedPopup {
            name: "vm_console_100".to_string(),
            features: POPUP_FEATURES,
        }
    );
    assert_eq!(
        log_messages(&sink.take()),
        vec![(Severity::Info, "Opened console for VM 100".to_string())]
    );

    // Relaunching the same target reuses the same window name.
    launcher.launch(Click::plain_primary(), "/console?vmid=100", "100");
    assert_eq!(opener.attempts()[1], opener.attempts()[0]);
}

#[test]
fn blocked_popup_falls_back_to_a_blank_tab() {
    let opener = ScriptedOpener::new(false, true);
    let sink = Arc::new(TestSink::default());
    let mut launcher = launcher(opener.clone(), sink.clone());

    let outcome = launcher.launch(Click::plain_primary(), "/console?vmid=7", "7");

    assert_eq!(outcome, LaunchOutcome::NewTab);
    let attempts = opener.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[1], OpenStyle::BlankTab);
    assert_eq!(
        log_messages(&sink.take()),
        vec![(Severity::Info, "Opened console for VM 7".to_string())]
    );
}

#[test]
fn fully_blocked_launch_navigates_in_the_same_tab() {
    let opener = ScriptedOpener::new(false, false);
    let sink = Arc::new(TestSink::default());
    let mut launcher = launcher(opener.clone(), sink.clone());

    let outcome = launcher.launch(Click::plain_primary(), "/console?vmid=7", "7");

    assert_eq!(outcome, LaunchOutcome::SameTab);
    let attempts = opener.attempts();
    assert_eq!(attempts.len(), 3);
    assert_eq!(attempts[2], OpenStyle::SameTab);
    assert_eq!(
        log_messages(&sink.take()),
        vec![
            (
                Severity::Warn,
                "Popup blocked; falling back to same-tab navigation".to_string()
            ),
            (Severity::Info, "Opened console (same tab) for VM 7".to_string()),
        ]
    );
}
