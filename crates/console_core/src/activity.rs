use std::collections::VecDeque;
use std::fmt;

/// Maximum number of entries kept in memory and in the persisted buffer.
/// The oldest entry is evicted first once the cap is reached.
pub const LOG_CAPACITY: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
    Success,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
            Severity::Success => write!(f, "success"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
    pub severity: Severity,
}

impl LogEntry {
    /// Rendered form shown to the user: `[<timestamp>] <message>`.
    pub fn render(&self) -> String {
        format!("[{}] {}", self.timestamp, self.message)
    }
}

/// Source of timestamps for new entries.
pub trait Clock {
    fn now_iso(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Persistence contract for the activity buffer. The whole buffer is
/// replaced on every save; there is no partial-write visibility.
pub trait LogStore {
    fn load(&self) -> Result<Vec<LogEntry>, StoreError>;
    fn save(&mut self, entries: &[LogEntry]) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Sink through which components record activity entries.
pub trait LogSink {
    fn append(&mut self, message: &str, severity: Severity);
}

/// Append-only, size-bounded activity record. Survives reloads of the same
/// session through the injected [`LogStore`]; persistence failures are
/// swallowed so logging can never crash the caller.
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    store: Box<dyn LogStore>,
    clock: Box<dyn Clock>,
    restored: bool,
}

impl ActivityLog {
    pub fn new(store: Box<dyn LogStore>, clock: Box<dyn Clock>) -> Self {
        Self {
            entries: VecDeque::new(),
            store,
            clock,
            restored: false,
        }
    }

    /// Re-renders any previously persisted entries in their original order.
    /// Runs once; later calls are no-ops.
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        if let Ok(previous) = self.store.load() {
            self.entries.extend(previous);
        }
    }

    /// Empties the visible log and the persisted buffer, then records a
    /// confirmation entry. The confirmation stays out of the store so a
    /// reload right after clearing starts from an empty buffer.
    pub fn clear(&mut self) {
        self.entries.clear();
        let _ = self.store.clear();
        self.entries.push_back(LogEntry {
            timestamp: self.clock.now_iso(),
            message: "Activity log cleared".to_owned(),
            severity: Severity::Info,
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rendered_lines(&self) -> Vec<String> {
        self.entries.iter().map(LogEntry::render).collect()
    }

    pub fn append(&mut self, message: &str, severity: Severity) {
        self.entries.push_back(LogEntry {
            timestamp: self.clock.now_iso(),
            message: message.to_owned(),
            severity,
        });
        while self.entries.len() > LOG_CAPACITY {
            self.entries.pop_front();
        }
        // Last writer wins; a failed save leaves the previous buffer intact.
        let full: Vec<LogEntry> = self.entries.iter().cloned().collect();
        let _ = self.store.save(&full);
    }
}

impl LogSink for ActivityLog {
    fn append(&mut self, message: &str, severity: Severity) {
        ActivityLog::append(self, message, severity);
    }
}

/// In-memory store for tests and hosts without durable storage. Clones share
/// one buffer so a test can keep a handle to the store it moved into the log.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogStore {
    entries: std::rc::Rc<std::cell::RefCell<Vec<LogEntry>>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persisted(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }
}

impl LogStore for MemoryLogStore {
    fn load(&self) -> Result<Vec<LogEntry>, StoreError> {
        Ok(self.entries.borrow().clone())
    }

    fn save(&mut self, entries: &[LogEntry]) -> Result<(), StoreError> {
        *self.entries.borrow_mut() = entries.to_vec();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.borrow_mut().clear();
        Ok(())
    }
}
