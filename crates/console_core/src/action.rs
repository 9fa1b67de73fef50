use crate::TargetId;

/// How many target labels the confirmation preview lists before trailing off.
pub const CONFIRM_PREVIEW_LIMIT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Start,
    Poweroff,
    Restore,
}

impl BulkAction {
    pub fn tag(&self) -> &'static str {
        match self {
            BulkAction::Start => "start",
            BulkAction::Poweroff => "poweroff",
            BulkAction::Restore => "restore",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "start" => Some(BulkAction::Start),
            "poweroff" => Some(BulkAction::Poweroff),
            "restore" => Some(BulkAction::Restore),
            _ => None,
        }
    }
}

impl std::fmt::Display for BulkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One user gesture's worth of bulk-action intent. Constructed fresh per
/// gesture and discarded after submission or cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: BulkAction,
    pub targets: Vec<TargetId>,
    pub confirmed: bool,
}

impl ActionRequest {
    pub fn new(action: BulkAction, targets: Vec<TargetId>) -> Self {
        Self {
            action,
            targets,
            confirmed: false,
        }
    }
}

/// Human-readable confirmation text for a bulk action. Restore carries a
/// harsher warning than the other actions: it destroys data.
pub fn confirmation_prompt(action: BulkAction, targets: &[TargetId]) -> String {
    let preview = preview_list(targets);
    let question = format!(
        "Proceed with {} on {} VM(s)?\nVMIDs: {}",
        action.tag().to_uppercase(),
        targets.len(),
        preview
    );
    match action {
        BulkAction::Restore => format!(
            "WARNING: RESTORE overwrites the current disk state of {} VM(s). \
             Any data written since the backup will be permanently lost and \
             cannot be recovered.\n{}",
            targets.len(),
            question
        ),
        _ => question,
    }
}

fn preview_list(targets: &[TargetId]) -> String {
    let mut preview = targets
        .iter()
        .take(CONFIRM_PREVIEW_LIMIT)
        .map(TargetId::label)
        .collect::<Vec<_>>()
        .join(", ");
    if targets.len() > CONFIRM_PREVIEW_LIMIT {
        preview.push_str(" ...");
    }
    preview
}
