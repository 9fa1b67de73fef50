use crate::TargetId;

/// Read side of the current selection. The controller reads it at submission
/// time only; there is no live subscription.
pub trait SelectionSource {
    fn selected(&self) -> Vec<TargetId>;
}

/// Ordered, duplicate-free set of selected targets, mutated by direct user
/// gestures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    targets: Vec<TargetId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target unless already present. Returns true if it was added.
    pub fn select(&mut self, target: TargetId) -> bool {
        if self.targets.contains(&target) {
            return false;
        }
        self.targets.push(target);
        true
    }

    pub fn deselect(&mut self, target: &TargetId) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| t != target);
        self.targets.len() != before
    }

    pub fn toggle(&mut self, target: TargetId) {
        if !self.deselect(&target) {
            self.targets.push(target);
        }
    }

    pub fn select_all(&mut self, targets: impl IntoIterator<Item = TargetId>) {
        for target in targets {
            self.select(target);
        }
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl SelectionSource for Selection {
    fn selected(&self) -> Vec<TargetId> {
        self.targets.clone()
    }
}
