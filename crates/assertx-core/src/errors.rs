use thiserror::Error;

/// Result type alias using AssertXError
pub type Result<T> = std::result::Result<T, AssertXError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error the library raises maps onto one of these kinds, and each kind
/// carries a stable code that log events and tests can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxErrorKind {
    // Policy resolution (usage errors)
    InvalidFieldName,
    UnknownField,
    NotAStruct,
    AmbiguousField,

    // Assertion misuse
    ErrorValueMisuse,
    LenUndefined,

    // Configuration
    ConfigAlreadySet,
    InvalidConfig,

    // Error-chain matching
    MatchPanicked,

    // Internal
    Internal,
}

impl AxErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            AxErrorKind::InvalidFieldName => "ERR_INVALID_FIELD_NAME",
            AxErrorKind::UnknownField => "ERR_UNKNOWN_FIELD",
            AxErrorKind::NotAStruct => "ERR_NOT_A_STRUCT",
            AxErrorKind::AmbiguousField => "ERR_AMBIGUOUS_FIELD",
            AxErrorKind::ErrorValueMisuse => "ERR_ERROR_VALUE_MISUSE",
            AxErrorKind::LenUndefined => "ERR_LEN_UNDEFINED",
            AxErrorKind::ConfigAlreadySet => "ERR_CONFIG_ALREADY_SET",
            AxErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            AxErrorKind::MatchPanicked => "ERR_MATCH_PANICKED",
            AxErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind is a usage error (a mistake in the test code itself)
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            AxErrorKind::InvalidFieldName
                | AxErrorKind::UnknownField
                | AxErrorKind::NotAStruct
                | AxErrorKind::AmbiguousField
                | AxErrorKind::ErrorValueMisuse
                | AxErrorKind::LenUndefined
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification used for logging plus whatever context the
/// raising site knew about.
#[derive(Debug, Clone)]
pub struct AxError {
    kind: AxErrorKind,
    op: Option<String>,
    type_name: Option<String>,
    field_path: Option<String>,
    message: String,
}

impl AxError {
    /// Create a new error with the specified kind
    pub fn new(kind: AxErrorKind) -> Self {
        Self {
            kind,
            op: None,
            type_name: None,
            field_path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the name of the type being compared
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Add the dotted field path involved
    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> AxErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the type name context, if any
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Get the field path context, if any
    pub fn field_path(&self) -> Option<&str> {
        self.field_path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(type_name) = &self.type_name {
            write!(f, " (type: {})", type_name)?;
        }
        if let Some(path) = &self.field_path {
            write!(f, " (field: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for AxError {}

// ========== End Error Facility ==========

/// Error taxonomy for assertx operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssertXError {
    // ===== Policy Resolution =====
    /// A skipped field name is empty or has an empty segment
    #[error("invalid field name {name:?}: path segments must not be empty")]
    InvalidFieldName { name: String },

    /// A skipped field name does not exist on the compared type
    #[error("type {type_name} has no field {segment:?} (while resolving {name:?})")]
    UnknownField {
        type_name: String,
        name: String,
        segment: String,
    },

    /// A skipped field name walks into a type that has no fields
    #[error("cannot resolve {name:?}: {at:?} of {type_name} is not a struct")]
    NotAStruct {
        type_name: String,
        name: String,
        at: String,
    },

    /// A promoted field name is provided by more than one embedded struct
    #[error("field {segment:?} of {type_name} is ambiguous (while resolving {name:?})")]
    AmbiguousField {
        type_name: String,
        name: String,
        segment: String,
    },

    // ===== Assertion Misuse =====
    /// An error value was passed to a check that is not error aware
    #[error("use {hint} for errors")]
    ErrorValueMisuse { hint: &'static str },

    /// `len` was asked of a value that has no length
    #[error("length is not defined for {type_name}")]
    LenUndefined { type_name: String },

    // ===== Configuration =====
    /// The global diff options were already initialized or read
    #[error("diff options are already initialized")]
    ConfigAlreadySet,

    /// The diff options could not be parsed
    #[error("invalid diff options: {reason}")]
    InvalidConfig { reason: String },

    // ===== Error Matching =====
    /// The error-chain matching primitives panicked
    #[error("error chain matching panicked: {payload}")]
    MatchPanicked { payload: String },
}

/// Conversion from AssertXError to AxError
impl From<AssertXError> for AxError {
    fn from(err: AssertXError) -> Self {
        let message = err.to_string();
        match err {
            AssertXError::InvalidFieldName { name } => AxError::new(AxErrorKind::InvalidFieldName)
                .with_op("resolve_policy")
                .with_field_path(name)
                .with_message(message),

            AssertXError::UnknownField {
                type_name, name, ..
            } => AxError::new(AxErrorKind::UnknownField)
                .with_op("resolve_policy")
                .with_type_name(type_name)
                .with_field_path(name)
                .with_message(message),

            AssertXError::NotAStruct {
                type_name, name, ..
            } => AxError::new(AxErrorKind::NotAStruct)
                .with_op("resolve_policy")
                .with_type_name(type_name)
                .with_field_path(name)
                .with_message(message),

            AssertXError::AmbiguousField {
                type_name, name, ..
            } => AxError::new(AxErrorKind::AmbiguousField)
                .with_op("resolve_policy")
                .with_type_name(type_name)
                .with_field_path(name)
                .with_message(message),

            AssertXError::ErrorValueMisuse { .. } => {
                AxError::new(AxErrorKind::ErrorValueMisuse).with_message(message)
            }

            AssertXError::LenUndefined { type_name } => AxError::new(AxErrorKind::LenUndefined)
                .with_type_name(type_name)
                .with_message(message),

            AssertXError::ConfigAlreadySet => AxError::new(AxErrorKind::ConfigAlreadySet)
                .with_op("init_diff_options")
                .with_message(message),

            AssertXError::InvalidConfig { .. } => AxError::new(AxErrorKind::InvalidConfig)
                .with_op("init_diff_options")
                .with_message(message),

            AssertXError::MatchPanicked { .. } => AxError::new(AxErrorKind::MatchPanicked)
                .with_op("match_error")
                .with_message(message),
        }
    }
}

/// Conversion from serde_json::Error to AssertXError
impl From<serde_json::Error> for AssertXError {
    fn from(err: serde_json::Error) -> Self {
        AssertXError::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (AxErrorKind::UnknownField, "ERR_UNKNOWN_FIELD"),
            (AxErrorKind::NotAStruct, "ERR_NOT_A_STRUCT"),
            (AxErrorKind::ErrorValueMisuse, "ERR_ERROR_VALUE_MISUSE"),
            (AxErrorKind::ConfigAlreadySet, "ERR_CONFIG_ALREADY_SET"),
            (AxErrorKind::MatchPanicked, "ERR_MATCH_PANICKED"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_usage_kinds() {
        assert!(AxErrorKind::UnknownField.is_usage());
        assert!(AxErrorKind::ErrorValueMisuse.is_usage());
        assert!(!AxErrorKind::MatchPanicked.is_usage());
        assert!(!AxErrorKind::ConfigAlreadySet.is_usage());
    }

    #[test]
    fn test_unknown_field_converts_with_context() {
        let err = AssertXError::UnknownField {
            type_name: "Account".to_string(),
            name: "owner.nickname".to_string(),
            segment: "nickname".to_string(),
        };
        let ax: AxError = err.into();
        assert_eq!(ax.kind(), AxErrorKind::UnknownField);
        assert_eq!(ax.type_name(), Some("Account"));
        assert_eq!(ax.field_path(), Some("owner.nickname"));
        assert_eq!(ax.op(), Some("resolve_policy"));
        assert!(ax.message().contains("nickname"));
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = AxError::new(AxErrorKind::NotAStruct)
            .with_op("resolve_policy")
            .with_type_name("u32")
            .with_message("not a struct");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_NOT_A_STRUCT]"));
        assert!(rendered.contains("resolve_policy"));
        assert!(rendered.contains("(type: u32)"));
    }
}
