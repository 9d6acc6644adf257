//! Error-chain matching
//!
//! An error matches a target when any error in its `source()` chain does:
//!
//! - **Text**: the chain rendered as `outer: inner: ...` contains the text,
//!   or matches it as a regular expression. Text that is not a valid
//!   expression only matches as a literal substring.
//! - **Error value**: an error in the chain is the same value, or renders the
//!   same through `Display` and `Debug`.
//! - **I/O kind**: an `std::io::Error` in the chain has the kind.
//! - **Type**: an error in the chain downcasts to the type.
//!
//! Matching runs behind a panic boundary; a panicking `Display`, `Debug` or
//! `source()` implementation becomes a `MatchPanicked` error.

use crate::compare::errors_equivalent;
use crate::errors::{AssertXError, Result};
use crate::{log_op_end, log_op_error, log_op_start};
use assertx_core_types::schema::OP_MATCH_ERROR;
use regex::Regex;
use std::any::Any;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// What an error is expected to be or contain.
#[derive(Clone)]
pub enum ErrorTarget<'a> {
    Text(Cow<'a, str>),
    Error(&'a (dyn Error + 'static)),
    Kind(io::ErrorKind),
    Type {
        name: &'static str,
        probe: fn(&(dyn Error + 'static)) -> bool,
    },
}

impl<'a> ErrorTarget<'a> {
    /// Match errors whose chain contains or matches `text`.
    pub fn text(text: impl Into<Cow<'a, str>>) -> Self {
        ErrorTarget::Text(text.into())
    }

    /// Match errors whose chain contains `err`.
    pub fn error(err: &'a (dyn Error + 'static)) -> Self {
        ErrorTarget::Error(err)
    }

    /// Match errors whose chain contains an I/O error of `kind`.
    pub fn kind(kind: io::ErrorKind) -> Self {
        ErrorTarget::Kind(kind)
    }

    /// Match errors whose chain contains an `E`.
    ///
    /// ```
    /// use assertx_core::errmatch::{match_error, ErrorTarget, MatchOutcome};
    ///
    /// let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    /// let outcome = match_error(&err, &ErrorTarget::of::<std::io::Error>()).unwrap();
    /// assert_eq!(outcome, MatchOutcome::Matched);
    /// ```
    pub fn of<E: Error + 'static>() -> Self {
        ErrorTarget::Type {
            name: std::any::type_name::<E>(),
            probe: probe::<E>,
        }
    }
}

fn probe<E: Error + 'static>(err: &(dyn Error + 'static)) -> bool {
    err.is::<E>()
}

impl fmt::Debug for ErrorTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorTarget::Text(text) => f.debug_tuple("Text").field(text).finish(),
            ErrorTarget::Error(err) => f.debug_tuple("Error").field(&err.to_string()).finish(),
            ErrorTarget::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            ErrorTarget::Type { name, .. } => f.debug_tuple("Type").field(name).finish(),
        }
    }
}

impl<'a> From<&'a str> for ErrorTarget<'a> {
    fn from(text: &'a str) -> Self {
        ErrorTarget::Text(Cow::Borrowed(text))
    }
}

impl From<String> for ErrorTarget<'_> {
    fn from(text: String) -> Self {
        ErrorTarget::Text(Cow::Owned(text))
    }
}

impl From<io::ErrorKind> for ErrorTarget<'_> {
    fn from(kind: io::ErrorKind) -> Self {
        ErrorTarget::Kind(kind)
    }
}

/// Result of matching an error against a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched,
    /// The failure message describing the mismatch
    Mismatch(String),
}

/// Iterate over `err` and its sources, outermost first.
pub fn chain<'e>(
    err: &'e (dyn Error + 'static),
) -> impl Iterator<Item = &'e (dyn Error + 'static)> {
    std::iter::successors(Some(err), |&e| e.source())
}

/// Find the first error of type `E` in the chain.
pub fn find_error<'e, E: Error + 'static>(err: &'e (dyn Error + 'static)) -> Option<&'e E> {
    chain(err).find_map(|e| e.downcast_ref::<E>())
}

/// Render the chain as `outer: inner: ...`.
pub fn render_chain(err: &(dyn Error + 'static)) -> String {
    chain(err)
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

/// Match `err` against `target`.
///
/// # Errors
///
/// Returns `MatchPanicked` if any error in the chain panics while being
/// rendered or unwrapped.
pub fn match_error(err: &(dyn Error + 'static), target: &ErrorTarget<'_>) -> Result<MatchOutcome> {
    let start = Instant::now();
    log_op_start!(OP_MATCH_ERROR);

    let result = panic::catch_unwind(AssertUnwindSafe(|| match_chain(err, target)))
        .map_err(|payload| AssertXError::MatchPanicked {
            payload: panic_message(payload.as_ref()),
        });

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(outcome) => {
            log_op_end!(
                OP_MATCH_ERROR,
                duration_ms = duration_ms,
                matched = (*outcome == MatchOutcome::Matched)
            );
        }
        Err(err) => {
            log_op_error!(OP_MATCH_ERROR, err.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn match_chain(err: &(dyn Error + 'static), target: &ErrorTarget<'_>) -> MatchOutcome {
    let rendered = render_chain(err);
    let mismatch = match target {
        ErrorTarget::Text(text) => {
            if rendered.contains(&**text) {
                return MatchOutcome::Matched;
            }
            match Regex::new(text) {
                Ok(re) if re.is_match(&rendered) => return MatchOutcome::Matched,
                Ok(_) => format!("{rendered:?} does not match {text:?}"),
                Err(_) => format!("{rendered:?} does not contain {text:?}"),
            }
        }
        ErrorTarget::Error(want) => {
            if chain(err).any(|e| errors_equivalent(e, *want)) {
                return MatchOutcome::Matched;
            }
            format!("{rendered:?} is not {:?}", want.to_string())
        }
        ErrorTarget::Kind(kind) => {
            let found = chain(err)
                .filter_map(|e| e.downcast_ref::<io::Error>())
                .any(|e| e.kind() == *kind);
            if found {
                return MatchOutcome::Matched;
            }
            format!("{rendered:?} is not of kind {kind:?}")
        }
        ErrorTarget::Type { name, probe } => {
            if chain(err).any(|e| probe(e)) {
                return MatchOutcome::Matched;
            }
            format!("{rendered:?} is not {name}")
        }
    };
    MatchOutcome::Mismatch(format!("unexpected error: {mismatch}"))
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("config missing")]
    struct ConfigMissing;

    #[derive(Debug, thiserror::Error)]
    #[error("startup failed")]
    struct Startup {
        #[source]
        cause: ConfigMissing,
    }

    #[test]
    fn test_chain_walks_sources() {
        let err = Startup {
            cause: ConfigMissing,
        };
        assert_eq!(chain(&err).count(), 2);
        assert_eq!(render_chain(&err), "startup failed: config missing");
        assert!(find_error::<ConfigMissing>(&err).is_some());
    }

    #[test]
    fn test_text_matching() {
        let err = Startup {
            cause: ConfigMissing,
        };
        let matched = |target: &str| match_error(&err, &target.into()).unwrap();
        assert_eq!(matched("config missing"), MatchOutcome::Matched);
        assert_eq!(matched("start.*miss"), MatchOutcome::Matched);
        assert_eq!(
            matched("nope"),
            MatchOutcome::Mismatch(
                "unexpected error: \"startup failed: config missing\" does not match \"nope\""
                    .to_string()
            )
        );
        // Invalid expression degrades to a literal substring check
        assert_eq!(
            matched("missing ("),
            MatchOutcome::Mismatch(
                "unexpected error: \"startup failed: config missing\" does not contain \"missing (\""
                    .to_string()
            )
        );
    }

    #[test]
    fn test_type_and_kind_matching() {
        let err = Startup {
            cause: ConfigMissing,
        };
        assert_eq!(
            match_error(&err, &ErrorTarget::of::<ConfigMissing>()).unwrap(),
            MatchOutcome::Matched
        );
        assert!(matches!(
            match_error(&err, &ErrorTarget::of::<io::Error>()).unwrap(),
            MatchOutcome::Mismatch(_)
        ));

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            match_error(&io_err, &io::ErrorKind::PermissionDenied.into()).unwrap(),
            MatchOutcome::Matched
        );
    }

    #[derive(Debug)]
    struct Exploding;

    impl fmt::Display for Exploding {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            panic!("display exploded")
        }
    }

    impl Error for Exploding {}

    #[test]
    fn test_panics_become_errors() {
        let err = match_error(&Exploding, &"anything".into()).unwrap_err();
        assert_eq!(
            err,
            AssertXError::MatchPanicked {
                payload: "display exploded".to_string()
            }
        );
    }

    #[test]
    fn test_panic_message_payloads() {
        let text: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(text.as_ref()), "static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let other: Box<dyn Any + Send> = Box::new(5u8);
        assert_eq!(panic_message(other.as_ref()), "<non-string panic payload>");
    }
}
