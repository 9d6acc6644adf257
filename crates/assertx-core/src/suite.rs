//! Per-test setup and teardown.
//!
//! ```
//! use assertx_core::reporter::{PanicReporter, Reporter};
//! use assertx_core::suite::{setup, Suite};
//!
//! #[derive(Default)]
//! struct Scratch {
//!     dir: Option<std::path::PathBuf>,
//! }
//!
//! impl Suite for Scratch {
//!     fn setup(&mut self, _r: &dyn Reporter) {
//!         self.dir = Some(std::env::temp_dir());
//!     }
//! }
//!
//! let suite = setup::<Scratch>(&PanicReporter);
//! assert!(suite.dir.is_some());
//! ```

use crate::reporter::Reporter;
use crate::{log_op_end, log_op_start};
use assertx_core_types::schema::OP_SUITE;
use std::ops::{Deref, DerefMut};
use std::time::Instant;

/// Test fixture with lifecycle hooks.
pub trait Suite {
    /// Runs once before the test body.
    fn setup(&mut self, _r: &dyn Reporter) {}

    /// Runs when the guard returned by [`setup`] is dropped, including when
    /// the test body panics.
    fn teardown(&mut self, _r: &dyn Reporter) {}
}

/// Owns a set-up suite and tears it down on drop.
pub struct SuiteGuard<'r, S: Suite> {
    suite: S,
    reporter: &'r dyn Reporter,
}

impl<S: Suite> Deref for SuiteGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.suite
    }
}

impl<S: Suite> DerefMut for SuiteGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.suite
    }
}

impl<S: Suite> Drop for SuiteGuard<'_, S> {
    fn drop(&mut self) {
        let start = Instant::now();
        log_op_start!(OP_SUITE, phase = "teardown", type_name = std::any::type_name::<S>());
        self.suite.teardown(self.reporter);
        log_op_end!(
            OP_SUITE,
            duration_ms = start.elapsed().as_millis() as u64,
            phase = "teardown"
        );
    }
}

/// Create a default `S`, run its setup hook and guard its teardown.
pub fn setup<S: Suite + Default>(r: &dyn Reporter) -> SuiteGuard<'_, S> {
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_SUITE, phase = "setup", type_name = std::any::type_name::<S>());

    let mut suite = S::default();
    suite.setup(r);

    log_op_end!(
        OP_SUITE,
        duration_ms = start.elapsed().as_millis() as u64,
        phase = "setup"
    );
    SuiteGuard { suite, reporter: r }
}
