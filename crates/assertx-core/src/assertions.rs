//! Assertion functions
//!
//! Every check takes a [`Reporter`]. On failure it calls
//! [`Reporter::fatal`] with a rendered message and returns; whether the test
//! stops is up to the reporter. Mistakes in the test code itself, such as
//! passing an error to [`equal`] or skipping a field that does not exist,
//! panic immediately instead.
//!
//! ```
//! use assertx_core::assertions::{equal, error_contains};
//! use assertx_core::reporter::PanicReporter;
//!
//! let r = PanicReporter;
//! equal(&r, &vec![1, 2], &vec![1, 2], &[]);
//!
//! let parsed: Result<u8, _> = "300".parse::<u8>();
//! error_contains(&r, parsed, "too large");
//! ```

use crate::compare::{compare, Comparison};
use crate::diff::render_human_summary;
use crate::errmatch::{match_error, panic_message, ErrorTarget, MatchOutcome};
use crate::errors::AssertXError;
use crate::inspect::{Inspect, Shape};
use crate::policy::CompareOption;
use crate::render;
use crate::reporter::Reporter;
use crate::{log_op_end, log_op_error, log_op_fail, log_op_start};
use assertx_core_types::schema::OP_ASSERT;
use std::any::Any;
use std::error::Error;
use std::fmt::{Debug, Display};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[track_caller]
fn fail<R: Reporter + ?Sized>(r: &R, check: &'static str, start: Instant, message: &str) {
    log_op_fail!(
        OP_ASSERT,
        duration_ms = elapsed_ms(start),
        check = check,
        message = message
    );
    r.fatal(message);
}

fn pass(check: &'static str, start: Instant) {
    log_op_end!(OP_ASSERT, duration_ms = elapsed_ms(start), check = check);
}

/// Abort on a usage error.
#[track_caller]
fn usage(check: &'static str, err: AssertXError) -> ! {
    log_op_error!(OP_ASSERT, err.clone(), duration_ms = 0, check = check);
    panic!("{err}");
}

/// Errors behind pointers or inside `Some` count as error values too.
fn holds_error(value: &dyn Inspect) -> bool {
    match value.shape() {
        Shape::Error(_) => true,
        Shape::Pointer { target, .. } => holds_error(target),
        Shape::Some(inner) => holds_error(inner),
        _ => false,
    }
}

#[track_caller]
fn reject_error_value(check: &'static str, value: &dyn Inspect, hint: &'static str) {
    if holds_error(value) {
        usage(check, AssertXError::ErrorValueMisuse { hint });
    }
}

/// Check that `got` equals `want` under the options.
///
/// # Panics
///
/// Panics if `got` is an error value or the options name fields `T` does not
/// have.
#[track_caller]
pub fn equal<T: Inspect, R: Reporter + ?Sized>(
    r: &R,
    got: &T,
    want: &T,
    options: &[CompareOption],
) {
    r.helper();
    reject_error_value("equal", got, "error_contains()");
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "equal", type_name = std::any::type_name::<T>());

    match compare(got, want, options) {
        Ok(Comparison::Equal) => pass("equal", start),
        Ok(Comparison::NotEqual(mismatch)) => {
            let summary = render_human_summary(&mismatch.report());
            fail(r, "equal", start, &format!("expected equal\n{summary}"));
        }
        Err(err) => usage("equal", err),
    }
}

/// Check that `got` differs from `want` under the options.
///
/// # Panics
///
/// Panics if `got` is an error value or the options name fields `T` does not
/// have.
#[track_caller]
pub fn not_equal<T: Inspect, R: Reporter + ?Sized>(
    r: &R,
    got: &T,
    want: &T,
    options: &[CompareOption],
) {
    r.helper();
    reject_error_value("not_equal", got, "error_contains()");
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "not_equal", type_name = std::any::type_name::<T>());

    match compare(got, want, options) {
        Ok(Comparison::Equal) => fail(r, "not_equal", start, "expected not equal, but got equal"),
        Ok(Comparison::NotEqual(_)) => pass("not_equal", start),
        Err(err) => usage("not_equal", err),
    }
}

/// Check that `result` is an error.
#[track_caller]
pub fn error<T, E, R: Reporter + ?Sized>(r: &R, result: &Result<T, E>) {
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "error");
    match result {
        Ok(_) => fail(r, "error", start, "expected error, got Ok"),
        Err(_) => pass("error", start),
    }
}

/// Check that `result` is not an error.
#[track_caller]
pub fn no_error<T, E: Display, R: Reporter + ?Sized>(r: &R, result: &Result<T, E>) {
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "no_error");
    match result {
        Ok(_) => pass("no_error", start),
        Err(err) => fail(r, "no_error", start, &format!("unexpected error: {err}")),
    }
}

/// Check that `result` is an error matching `target`.
///
/// The target is text, an error value, an I/O error kind, or an error type;
/// see [`errmatch`](crate::errmatch). A panic while matching is reported as a
/// failure.
#[track_caller]
pub fn error_contains<'t, T, E, R>(r: &R, result: Result<T, E>, target: impl Into<ErrorTarget<'t>>)
where
    E: Into<Box<dyn Error + Send + Sync>>,
    R: Reporter + ?Sized,
{
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "error_contains");

    let err: Box<dyn Error + Send + Sync> = match result {
        Ok(_) => return fail(r, "error_contains", start, "error is nil"),
        Err(err) => err.into(),
    };
    let target = target.into();
    let err: &(dyn Error + 'static) = &*err;
    match match_error(err, &target) {
        Ok(MatchOutcome::Matched) => pass("error_contains", start),
        Ok(MatchOutcome::Mismatch(message)) => fail(r, "error_contains", start, &message),
        Err(err) => fail(r, "error_contains", start, &err.to_string()),
    }
}

/// Check that `result` is an error exactly when `want_err` is set.
#[track_caller]
pub fn error_want<T, E: Display, R: Reporter + ?Sized>(
    r: &R,
    want_err: bool,
    result: &Result<T, E>,
) {
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "error_want");
    match (want_err, result) {
        (true, Ok(_)) => fail(r, "error_want", start, "expected error: got Ok"),
        (false, Err(err)) => fail(r, "error_want", start, &format!("unexpected error: {err}")),
        _ => pass("error_want", start),
    }
}

/// Check that `got` is its type's default value.
#[track_caller]
pub fn zero<T: Default + PartialEq + Debug, R: Reporter + ?Sized>(r: &R, got: &T) {
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "zero", type_name = std::any::type_name::<T>());
    if *got == T::default() {
        pass("zero", start);
    } else {
        fail(r, "zero", start, &format!("expected zero, got {got:?}"));
    }
}

/// Check that `got` is not its type's default value.
#[track_caller]
pub fn not_zero<T: Default + PartialEq + Debug, R: Reporter + ?Sized>(r: &R, got: &T) {
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "not_zero", type_name = std::any::type_name::<T>());
    if *got == T::default() {
        fail(r, "not_zero", start, &format!("expected not zero, got {got:?}"));
    } else {
        pass("not_zero", start);
    }
}

/// Check that `got` is absent (`None`, an unset cell, JSON `null`).
///
/// # Panics
///
/// Panics if `got` is an error value.
#[track_caller]
pub fn nil<T: Inspect + ?Sized, R: Reporter + ?Sized>(r: &R, got: &T) {
    r.helper();
    let got: &dyn Inspect = &got;
    reject_error_value("nil", got, "no_error()");
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "nil", type_name = got.type_name());
    if matches!(got.shape(), Shape::Nil) {
        pass("nil", start);
    } else {
        let message = format!("expected nil, got {}", render::compact(got));
        fail(r, "nil", start, &message);
    }
}

/// Check that `got` is present.
///
/// # Panics
///
/// Panics if `got` is an error value.
#[track_caller]
pub fn not_nil<T: Inspect + ?Sized, R: Reporter + ?Sized>(r: &R, got: &T) {
    r.helper();
    let got: &dyn Inspect = &got;
    reject_error_value("not_nil", got, "error()");
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "not_nil", type_name = got.type_name());
    if matches!(got.shape(), Shape::Nil) {
        fail(r, "not_nil", start, "expected not nil, got nil");
    } else {
        pass("not_nil", start);
    }
}

/// Check that `got` has `want` elements (bytes for strings).
///
/// # Panics
///
/// Panics if `got` has no length.
#[track_caller]
pub fn len<T: Inspect + ?Sized, R: Reporter + ?Sized>(r: &R, got: &T, want: usize) {
    r.helper();
    let got: &dyn Inspect = &got;
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "len", type_name = got.type_name());
    let Some(len) = got.shape().len() else {
        usage(
            "len",
            AssertXError::LenUndefined {
                type_name: got.type_name().to_string(),
            },
        );
    };
    if len == want {
        pass("len", start);
    } else {
        fail(r, "len", start, &format!("expected length {want}, got {len}"));
    }
}

/// Check that `got` is true.
#[track_caller]
pub fn is_true<R: Reporter + ?Sized>(r: &R, got: bool) {
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "is_true");
    if got {
        pass("is_true", start);
    } else {
        fail(r, "is_true", start, "expected true, got false");
    }
}

/// Check that `got` is false.
#[track_caller]
pub fn is_false<R: Reporter + ?Sized>(r: &R, got: bool) {
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "is_false");
    if got {
        fail(r, "is_false", start, "expected false, got true");
    } else {
        pass("is_false", start);
    }
}

/// Check that `f` panics.
#[track_caller]
pub fn panics<F: FnOnce(), R: Reporter + ?Sized>(r: &R, f: F) {
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "panics");
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => fail(r, "panics", start, "expected panic, got nothing"),
        Err(_) => pass("panics", start),
    }
}

/// Check that `f` does not panic.
#[track_caller]
pub fn not_panics<F: FnOnce(), R: Reporter + ?Sized>(r: &R, f: F) {
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "not_panics");
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => pass("not_panics", start),
        Err(payload) => {
            let message = format!("unexpected panic: {}", panic_message(payload.as_ref()));
            fail(r, "not_panics", start, &message);
        }
    }
}

/// Runs a deferred check when dropped. Created by [`defer_check`].
#[must_use = "the check runs when the guard is dropped"]
pub struct DeferGuard<'r, R: Reporter + ?Sized> {
    reporter: &'r R,
    check: Option<Box<dyn FnOnce() -> Option<String> + 'r>>,
}

impl<R: Reporter + ?Sized> Drop for DeferGuard<'_, R> {
    fn drop(&mut self) {
        let Some(check) = self.check.take() else {
            return;
        };
        // Reporting while unwinding would abort the process.
        if std::thread::panicking() {
            return;
        }
        let start = Instant::now();
        log_op_start!(OP_ASSERT, check = "defer_check");
        match check() {
            None => pass("defer_check", start),
            Some(err) => fail(
                self.reporter,
                "defer_check",
                start,
                &format!("unexpected defer error: {err}"),
            ),
        }
    }
}

/// Run `f` when the returned guard goes out of scope and report its error.
///
/// ```
/// use assertx_core::assertions::defer_check;
/// use assertx_core::reporter::RecordingReporter;
///
/// let r = RecordingReporter::new();
/// {
///     let _guard = defer_check(&r, || Err::<(), _>("close failed"));
/// }
/// assert_eq!(r.last_message().as_deref(), Some("unexpected defer error: close failed"));
/// ```
pub fn defer_check<'r, R, F, E>(r: &'r R, f: F) -> DeferGuard<'r, R>
where
    R: Reporter + ?Sized,
    F: FnOnce() -> Result<(), E> + 'r,
    E: Display,
{
    r.helper();
    DeferGuard {
        reporter: r,
        check: Some(Box::new(move || f().err().map(|err| err.to_string()))),
    }
}

/// Check that `got` is a `V` and return it.
#[track_caller]
pub fn type_assert<'a, V: Any, R: Reporter + ?Sized>(r: &R, got: &'a dyn Any) -> Option<&'a V> {
    r.helper();
    let start = Instant::now();
    log_op_start!(OP_ASSERT, check = "type_assert", type_name = std::any::type_name::<V>());
    match got.downcast_ref::<V>() {
        Some(value) => {
            pass("type_assert", start);
            Some(value)
        }
        None => {
            let message = format!("type assertion to {} failed", std::any::type_name::<V>());
            fail(r, "type_assert", start, &message);
            None
        }
    }
}

/// Unwrap `result`.
///
/// # Panics
///
/// Panics with `unexpected error: <err>` if `result` is an error.
#[track_caller]
pub fn must<T, E: Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("unexpected error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::RecordingReporter;

    #[test]
    fn test_equal_passes_and_fails() {
        let r = RecordingReporter::new();
        equal(&r, &3u8, &3u8, &[]);
        assert!(!r.failed());
        assert!(r.helper_called());

        equal(&r, &3u8, &4u8, &[]);
        assert_eq!(
            r.last_message().as_deref(),
            Some("expected equal\n got: 3\nwant: 4")
        );
    }

    #[test]
    #[should_panic(expected = "use error_contains() for errors")]
    fn test_equal_rejects_errors() {
        let r = RecordingReporter::new();
        let a = std::io::Error::new(std::io::ErrorKind::Other, "a");
        let b = std::io::Error::new(std::io::ErrorKind::Other, "a");
        equal(&r, &a, &b, &[]);
    }

    #[test]
    fn test_errors_behind_pointers_are_error_values() {
        let err = || std::io::Error::new(std::io::ErrorKind::Other, "a");
        assert!(holds_error(&Box::new(err())));
        assert!(holds_error(&Some(std::sync::Arc::new(err()))));
        assert!(!holds_error(&Some(Box::new(3u8))));
        assert!(!holds_error(&None::<std::io::Error>));
    }

    #[test]
    #[should_panic(expected = "length is not defined")]
    fn test_len_of_scalar_is_a_usage_error() {
        len(&RecordingReporter::new(), &5u32, 1);
    }

    #[test]
    fn test_zero_checks() {
        let r = RecordingReporter::new();
        zero(&r, &0u32);
        not_zero(&r, &String::from("x"));
        assert!(!r.failed());
        zero(&r, &7i32);
        assert_eq!(r.last_message().as_deref(), Some("expected zero, got 7"));
    }

    #[test]
    fn test_must() {
        assert_eq!(must("42".parse::<u32>()), 42);
    }

    #[test]
    #[should_panic(expected = "unexpected error: invalid digit found in string")]
    fn test_must_panics_on_error() {
        must("x".parse::<u32>());
    }
}
