//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log comparison
//! operations. Start and end events are emitted at debug level so that a
//! passing test suite stays quiet unless asked otherwise.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use assertx_core::log_op_start;
/// log_op_start!("compare");
/// log_op_start!("compare", type_name = "Account");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::__private::tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::__private::tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use assertx_core::log_op_end;
/// log_op_end!("compare", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::__private::tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::__private::tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an assertion failure (values legitimately unequal, error missing, ...)
///
/// # Example
///
/// ```
/// # use assertx_core::log_op_fail;
/// log_op_fail!("compare", duration_ms = 1, message = "expected equal");
/// ```
#[macro_export]
macro_rules! log_op_fail {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_FAIL,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_FAIL,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into the canonical [`AxError`](crate::errors::AxError)
/// to obtain its kind and stable code.
///
/// # Example
///
/// ```
/// # use assertx_core::{log_op_error, errors::AssertXError};
/// let err = AssertXError::ConfigAlreadySet;
/// log_op_error!("init_diff_options", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::AxError;
        let ax_err: AxError = $err.into();
        $crate::__private::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ax_err.kind(),
            err_code = ax_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::AxError;
        let ax_err: AxError = $err.into();
        $crate::__private::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__private::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ax_err.kind(),
            err_code = ax_err.code(),
            $($field)*
        );
    }};
}
