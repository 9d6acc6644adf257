#![allow(clippy::unwrap_used, clippy::expect_used)]

use assertx_core::assertions::{equal, no_error};
use assertx_core::suite::{setup, Suite};
use assertx_core::{PanicReporter, RecordingReporter, Reporter};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static TEARDOWNS: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct Workspace {
    root: Option<PathBuf>,
    files: Vec<String>,
}

impl Suite for Workspace {
    fn setup(&mut self, r: &dyn Reporter) {
        let root = std::env::temp_dir().join(format!("assertx-suite-{}", std::process::id()));
        no_error(r, &std::fs::create_dir_all(&root));
        self.root = Some(root);
    }

    fn teardown(&mut self, r: &dyn Reporter) {
        if let Some(root) = self.root.take() {
            no_error(r, &std::fs::remove_dir_all(&root));
        }
        TEARDOWNS.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_suite_sets_up_and_tears_down() {
    let r = RecordingReporter::new();
    let root = {
        let mut suite = setup::<Workspace>(&r);
        let root = suite.root.clone().unwrap();
        assert!(root.is_dir());
        suite.files.push("a.txt".into());
        equal(&r, &suite.files, &vec!["a.txt".to_string()], &[]);
        root
    };
    assert!(!root.exists());
    assert!(!r.failed(), "{:?}", r.messages());
    assert!(TEARDOWNS.load(Ordering::SeqCst) >= 1);
}

#[derive(Default)]
struct Counter {
    ticks: u32,
}

impl Suite for Counter {
    fn teardown(&mut self, r: &dyn Reporter) {
        r.fatal(&format!("torn down after {} ticks", self.ticks));
    }
}

#[test]
fn test_teardown_runs_when_the_body_panics() {
    let r = RecordingReporter::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut suite = setup::<Counter>(&r);
        suite.ticks = 3;
        equal(&PanicReporter, &suite.ticks, &4, &[]);
    }));
    assert!(outcome.is_err());
    assert_eq!(r.messages(), vec!["torn down after 3 ticks"]);
}
