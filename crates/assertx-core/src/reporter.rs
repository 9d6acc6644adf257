//! Test-reporting handles the assertions report through.

use std::cell::{Cell, RefCell};

/// Receives assertion failures.
pub trait Reporter {
    /// Mark the calling frame as a helper for failure attribution.
    fn helper(&self) {}

    /// Fail the current test with `message`.
    fn fatal(&self, message: &str);
}

/// Fails the current Rust test by panicking with the message.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    #[track_caller]
    fn fatal(&self, message: &str) {
        panic!("{message}");
    }
}

/// Records reported failures instead of failing, for testing assertion
/// helpers themselves.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    helper_calls: Cell<usize>,
    messages: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any failure was reported.
    pub fn failed(&self) -> bool {
        !self.messages.borrow().is_empty()
    }

    /// Whether `helper` was called at least once.
    pub fn helper_called(&self) -> bool {
        self.helper_calls.get() > 0
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

impl Reporter for RecordingReporter {
    fn helper(&self) {
        self.helper_calls.set(self.helper_calls.get() + 1);
    }

    fn fatal(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_records() {
        let r = RecordingReporter::new();
        assert!(!r.failed());
        r.helper();
        r.fatal("first");
        r.fatal("second");
        assert!(r.failed());
        assert!(r.helper_called());
        assert_eq!(r.messages(), vec!["first", "second"]);
        assert_eq!(r.last_message().as_deref(), Some("second"));
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_panic_reporter_panics() {
        PanicReporter.fatal("boom");
    }
}
