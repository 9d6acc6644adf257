//! Diff engine for failed comparisons.
//!
//! Explains why two values are not equal, honoring the same field filter
//! that decided the comparison, and renders the explanation for failure
//! messages.
//!
//! ## Entry point
//!
//! ```ignore
//! use assertx_core::diff::{compute_diff, render_human_summary};
//!
//! let report = compute_diff(&got, &want, &rules, assertx_core::config::diff_options());
//! let text = render_human_summary(&report);
//! ```
//!
//! ## Guarantees
//!
//! - **Filter fidelity**: a field ignored by the rules never appears in a report.
//! - **Determinism**: map entries and set members are reported in rendered
//!   key order.
//! - **Laziness**: reports are only computed for failed comparisons.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::compute_diff;
pub use human_summary::render_human_summary;
pub use model::{Change, ChangeKind, DiffBody, DiffLine, DiffReport};
