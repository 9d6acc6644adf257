//! Structural comparator.
//!
//! ## Entry point
//!
//! ```
//! use assertx_core::compare::{compare, Comparison};
//! use assertx_core::policy::skip_zero_fields;
//!
//! let got = vec![1u32, 2, 3];
//! let want = vec![1u32, 2, 4];
//! match compare(&got, &want, &[skip_zero_fields()]).unwrap() {
//!     Comparison::Equal => unreachable!(),
//!     Comparison::NotEqual(mismatch) => {
//!         let report = mismatch.report();
//!         assert_eq!(report.changes().len(), 1);
//!     }
//! }
//! ```
//!
//! ## Equality rules
//!
//! 1. Two nil values are equal, a nil and a non-nil value are not.
//! 2. Values with different dynamic type names are not equal.
//! 3. A custom equality capability decides when present.
//! 4. Byte sequences compare by content.
//! 5. Everything else compares structurally. Pointers are followed, never
//!    compared by identity, and a pointer pair already under comparison is
//!    assumed equal.
//!
//! The diff of a mismatch is only computed when asked for, with the same
//! rules that decided the mismatch.

pub(crate) mod engine;

pub use engine::errors_equivalent;

use crate::config;
use crate::diff::{self, DiffReport};
use crate::errors::Result;
use crate::inspect::Inspect;
use crate::policy::{CompareOption, FieldFilter, Policy, RuleSet};
use crate::{log_op_end, log_op_start};
use assertx_core_types::schema::OP_COMPARE;
use engine::Walk;
use std::time::Instant;

/// Outcome of a comparison.
pub enum Comparison<'a> {
    Equal,
    NotEqual(Mismatch<'a>),
}

impl Comparison<'_> {
    pub fn is_equal(&self) -> bool {
        matches!(self, Comparison::Equal)
    }
}

/// A failed comparison, holding what is needed to explain it.
pub struct Mismatch<'a> {
    got: &'a dyn Inspect,
    want: &'a dyn Inspect,
    rules: RuleSet,
}

impl<'a> Mismatch<'a> {
    /// The rules that decided the mismatch.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Compute the diff with the process-wide diff options.
    pub fn report(&self) -> DiffReport {
        diff::compute_diff(self.got, self.want, &self.rules, config::diff_options())
    }
}

/// Compare two values under the given options.
///
/// # Errors
///
/// Returns a usage error if the options name fields that `T` does not have.
pub fn compare<'a, T: Inspect>(
    got: &'a T,
    want: &'a T,
    options: &[CompareOption],
) -> Result<Comparison<'a>> {
    let rules = Policy::from_options(options).resolve::<T>()?;
    let type_name = std::any::type_name::<T>();

    let start = Instant::now();
    log_op_start!(OP_COMPARE, type_name = type_name, rule_count = rules.len());
    let equal = equal_with(got, want, &rules);
    log_op_end!(
        OP_COMPARE,
        duration_ms = start.elapsed().as_millis() as u64,
        type_name = type_name,
        equal = equal
    );

    if equal {
        Ok(Comparison::Equal)
    } else {
        Ok(Comparison::NotEqual(Mismatch { got, want, rules }))
    }
}

/// Whether two values are equal under the given options.
///
/// # Errors
///
/// See [`compare`].
pub fn is_equal<T: Inspect>(got: &T, want: &T, options: &[CompareOption]) -> Result<bool> {
    compare(got, want, options).map(|c| c.is_equal())
}

/// Compare two values under an arbitrary field filter.
pub fn equal_with(got: &dyn Inspect, want: &dyn Inspect, filter: &dyn FieldFilter) -> bool {
    Walk::new(filter).equal(got, want)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspectable;
    use crate::policy::skip_field_names;

    inspectable! {
        #[derive(Debug, Clone, Default)]
        struct Leaf {
            pub value: u32,
            pub note: String,
        }
    }

    #[test]
    fn test_equal_comparison_has_no_mismatch() {
        let a = Leaf { value: 1, note: "x".into() };
        assert!(compare(&a, &a.clone(), &[]).unwrap().is_equal());
    }

    #[test]
    fn test_mismatch_keeps_its_rules() {
        let a = Leaf { value: 1, note: "x".into() };
        let b = Leaf { value: 2, note: "y".into() };
        let options = [skip_field_names(["note"])];
        let Comparison::NotEqual(mismatch) = compare(&a, &b, &options).unwrap() else {
            panic!("expected a mismatch");
        };
        assert_eq!(
            mismatch.rules(),
            &Policy::from_options(&options).resolve::<Leaf>().unwrap()
        );
        let report = mismatch.report();
        let paths: Vec<_> = report.changes().iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["value"]);
    }

    #[test]
    fn test_usage_errors_surface_from_compare() {
        let a = Leaf::default();
        assert!(compare(&a, &a.clone(), &[skip_field_names(["missing"])]).is_err());
    }
}
