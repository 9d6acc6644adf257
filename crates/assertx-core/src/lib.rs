//! assertx Core - Configurable deep equality and test assertions
//!
//! This crate provides the assertion helpers for Rust tests, including:
//! - Value inspection (`Inspect`) describing values as shapes and layouts
//! - Comparison policies that ignore unexported, empty, zero or named fields
//! - A structural comparator that tolerates cycles and honors custom equality
//! - Structured diffs and human-readable failure summaries
//! - Error-chain matching by text, value, I/O kind or type
//! - Assertion functions reporting through a `Reporter`, and suite fixtures
//!
//! ```
//! use assertx_core::assertions::equal;
//! use assertx_core::{inspectable, skip_field_names, PanicReporter};
//!
//! inspectable! {
//!     pub struct Account {
//!         pub id: u64,
//!         pub name: String,
//!         pub updated_at: i64,
//!     }
//! }
//!
//! let got = Account { id: 1, name: "ada".into(), updated_at: 99 };
//! let want = Account { id: 1, name: "ada".into(), updated_at: 0 };
//! equal(&PanicReporter, &got, &want, &[skip_field_names(["updated_at"])]);
//! ```

pub mod assertions;
pub mod compare;
pub mod config;
pub mod diff;
pub mod errmatch;
pub mod errors;
pub mod inspect;
pub mod logging_facility;
pub mod policy;
pub mod render;
pub mod reporter;
pub mod suite;

// Re-export commonly used types
pub use compare::{compare, is_equal, Comparison};
pub use errmatch::ErrorTarget;
pub use errors::{AssertXError, AxError, AxErrorKind, Result};
pub use inspect::{Inspect, Shape};
pub use policy::{
    compare_unexported, ignore_unexported, skip_empty_fields, skip_field_names, skip_zero_fields,
    CompareOption,
};
pub use reporter::{PanicReporter, RecordingReporter, Reporter};
pub use suite::Suite;

#[doc(hidden)]
pub mod __private {
    pub use assertx_core_types::schema;
    pub use tracing;
}
