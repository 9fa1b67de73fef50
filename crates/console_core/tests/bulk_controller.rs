use console_core::{
    ActivityLog, BulkAction, BulkActionController, BulkPhase, Clock, MemoryLogStore,
    ProgressPresenter, Selection, Severity, SubmitGate, TargetId, CONTROL_DISABLE_DELAY,
};

struct FixedClock;

impl Clock for FixedClock {
    fn now_iso(&self) -> String {
        "2026-08-07T12:00:00.000Z".to_string()
    }
}

fn new_log() -> ActivityLog {
    ActivityLog::new(Box::new(MemoryLogStore::new()), Box::new(FixedClock))
}

fn selection_of(values: &[&str]) -> Selection {
    let mut selection = Selection::new();
    for value in values {
        selection.select(TargetId::parse(value).unwrap());
    }
    selection
}

fn init_logging() {
    console_logging::initialize_for_tests();
}

#[test]
fn empty_selection_is_rejected_at_the_gate() {
    init_logging();
    let mut controller = BulkActionController::new();
    let mut log = new_log();
    let selection = Selection::new();

    let gate = controller.request_submit(BulkAction::Start, &selection, &mut log);

    assert_eq!(gate, SubmitGate::Rejected);
    assert_eq!(controller.phase(), BulkPhase::Idle);
    let entry = log.entries().next().unwrap();
    assert_eq!(entry.message, "No VMs selected; action aborted");
    assert_eq!(entry.severity, Severity::Warn);
    assert_eq!(log.len(), 1);
}

#[test]
fn poweroff_flow_confirms_logs_and_raises_overlay() {
    init_logging();
    let mut controller = BulkActionController::new();
    let mut log = new_log();
    let mut presenter = ProgressPresenter::new();
    let selection = selection_of(&["node1|100|vmA", "node1|101|vmB"]);

    let gate = controller.request_submit(BulkAction::Poweroff, &selection, &mut log);
    let prompt = match gate {
        SubmitGate::Confirm { prompt } => prompt,
        SubmitGate::Rejected => panic!("gate rejected a non-empty selection"),
    };
    assert!(prompt.contains("POWEROFF"));
    assert!(prompt.contains("2 VM(s)"));
    assert!(prompt.contains("vmA"));
    assert!(prompt.contains("vmB"));
    assert_eq!(controller.phase(), BulkPhase::AwaitingConfirmation);

    let submission = controller
        .resolve_confirmation(true, &mut log, &mut presenter)
        .expect("confirmed submission");
    assert_eq!(submission.request.action, BulkAction::Poweroff);
    assert!(submission.request.confirmed);
    assert_eq!(submission.disable_delay, CONTROL_DISABLE_DELAY);
    assert_eq!(controller.phase(), BulkPhase::Submitting);

    // The diagnostic entry carries the two raw values.
    let diagnostic = log.entries().next().unwrap();
    assert_eq!(diagnostic.severity, Severity::Info);
    assert!(diagnostic.message.contains("action=poweroff"));
    assert!(diagnostic.message.contains("total_selected=2"));
    assert!(diagnostic
        .message
        .contains("values=[node1|100|vmA,node1|101|vmB]"));

    assert!(presenter.is_busy());
    assert_eq!(
        presenter.overlay_message(),
        Some("Submitting poweroff for 2 VM(s)...")
    );

    controller.mark_dispatched(&mut log, &mut presenter);
    assert_eq!(controller.phase(), BulkPhase::Disabled);
    assert!(presenter.controls_disabled());
    // Original labels are preserved for the next page load.
    assert_eq!(presenter.busy_label(), None);
    let last = log.entries().last().unwrap();
    assert_eq!(last.message, "Bulk action submitted (deferred disable)");
}

#[test]
fn cancel_returns_to_idle_and_clears_the_pending_request() {
    init_logging();
    let mut controller = BulkActionController::new();
    let mut log = new_log();
    let mut presenter = ProgressPresenter::new();
    let selection = selection_of(&["node1|100|vmA"]);

    controller.request_submit(BulkAction::Start, &selection, &mut log);
    let submission = controller.resolve_confirmation(false, &mut log, &mut presenter);

    assert!(submission.is_none());
    assert_eq!(controller.phase(), BulkPhase::Idle);
    assert!(!presenter.is_busy());
    let entry = log.entries().next().unwrap();
    assert_eq!(entry.message, "Bulk start canceled by user");
    assert_eq!(entry.severity, Severity::Warn);

    // A retried gesture starts from a clean gate rather than a stale marker.
    let gate = controller.request_submit(BulkAction::Start, &selection, &mut log);
    assert!(matches!(gate, SubmitGate::Confirm { .. }));
}

#[test]
fn preview_lists_all_labels_up_to_fifteen() {
    init_logging();
    let mut controller = BulkActionController::new();
    let mut log = new_log();
    let selection = selection_of(&["n|1|a", "n|2|b", "n|3|c"]);

    let gate = controller.request_submit(BulkAction::Poweroff, &selection, &mut log);
    let SubmitGate::Confirm { prompt } = gate else {
        panic!("gate rejected");
    };
    let (_, vmids) = prompt.split_once("VMIDs: ").unwrap();
    assert_eq!(vmids, "a, b, c");
}

#[test]
fn preview_truncates_to_fifteen_with_ellipsis() {
    init_logging();
    let mut controller = BulkActionController::new();
    let mut log = new_log();
    let values: Vec<String> = (0..20).map(|i| format!("n|{i}|vm{i}")).collect();
    let refs: Vec<&str> = values.iter().map(String::as_str).collect();
    let selection = selection_of(&refs);

    let gate = controller.request_submit(BulkAction::Start, &selection, &mut log);
    let SubmitGate::Confirm { prompt } = gate else {
        panic!("gate rejected");
    };
    let (_, vmids) = prompt.split_once("VMIDs: ").unwrap();
    assert!(vmids.ends_with(" ..."));
    let listed = vmids.trim_end_matches(" ...").split(", ").count();
    assert_eq!(listed, 15);
}

#[test]
fn restore_prompt_carries_a_distinct_data_loss_warning() {
    init_logging();
    let selection = selection_of(&["node1|100|vmA"]);
    let targets = console_core::SelectionSource::selected(&selection);

    let restore = console_core::confirmation_prompt(BulkAction::Restore, &targets);
    let poweroff = console_core::confirmation_prompt(BulkAction::Poweroff, &targets);

    assert!(restore.contains("permanently lost"));
    assert!(restore.contains("WARNING"));
    assert!(!poweroff.contains("permanently lost"));
    assert_ne!(restore, poweroff);
}

#[test]
fn trigger_shows_overlay_first_and_hides_it_on_rejection() {
    init_logging();
    let mut controller = BulkActionController::new();
    let mut log = new_log();
    let mut presenter = ProgressPresenter::new();

    // Rejection path: nothing selected, overlay comes down again.
    let gate = controller.trigger(
        BulkAction::Poweroff,
        &Selection::new(),
        &mut log,
        &mut presenter,
    );
    assert_eq!(gate, SubmitGate::Rejected);
    assert!(!presenter.is_busy());

    // Accepted path: overlay stays up while awaiting confirmation.
    let selection = selection_of(&["node1|100|vmA"]);
    let gate = controller.trigger(BulkAction::Poweroff, &selection, &mut log, &mut presenter);
    assert!(matches!(gate, SubmitGate::Confirm { .. }));
    assert_eq!(
        presenter.overlay_message(),
        Some("Submitting poweroff request...")
    );
}

#[test]
fn gestures_in_flight_are_ignored() {
    init_logging();
    let mut controller = BulkActionController::new();
    let mut log = new_log();
    let mut presenter = ProgressPresenter::new();
    let selection = selection_of(&["node1|100|vmA"]);

    controller.request_submit(BulkAction::Start, &selection, &mut log);
    // A second gesture while awaiting confirmation is rejected silently.
    let gate = controller.request_submit(BulkAction::Poweroff, &selection, &mut log);
    assert_eq!(gate, SubmitGate::Rejected);

    controller.resolve_confirmation(true, &mut log, &mut presenter);
    controller.mark_dispatched(&mut log, &mut presenter);
    let gate = controller.request_submit(BulkAction::Start, &selection, &mut log);
    assert_eq!(gate, SubmitGate::Rejected);
    assert_eq!(controller.phase(), BulkPhase::Disabled);
}
