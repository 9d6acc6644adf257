//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Comparison context
pub const FIELD_TYPE_NAME: &str = "type_name";
pub const FIELD_RULE_COUNT: &str = "rule_count";
pub const FIELD_CHANGE_COUNT: &str = "change_count";
pub const FIELD_MESSAGE: &str = "message";
pub const FIELD_CHECK: &str = "check";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_FAIL: &str = "fail";

// Canonical operation names
pub const OP_COMPARE: &str = "compare";
pub const OP_DIFF: &str = "diff";
pub const OP_RESOLVE_POLICY: &str = "resolve_policy";
pub const OP_MATCH_ERROR: &str = "match_error";
pub const OP_ASSERT: &str = "assert";
pub const OP_SUITE: &str = "suite";
