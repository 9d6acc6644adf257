//! Process-wide diff rendering configuration
//!
//! The options are set at most once: explicitly through
//! [`init_diff_options`], or on first read from the `ASSERTX_DIFF_OPTIONS`
//! environment variable (JSON), falling back to the defaults. They are
//! read-only afterwards.

use crate::errors::{AssertXError, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Environment variable holding JSON-encoded [`DiffOptions`].
pub const DIFF_OPTIONS_ENV: &str = "ASSERTX_DIFF_OPTIONS";

/// Knobs for rendering values in failure messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Drop module paths from rendered type names
    pub strip_type_names: bool,
    /// Placed between a field name or map key and its value
    pub separator: String,
    /// Spaces per nesting level in multi-line renderings
    pub indent: usize,
    /// Cap, in bytes, on each side of a fallback rendering
    pub max_fallback_len: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            strip_type_names: false,
            separator: ": ".to_string(),
            indent: 2,
            max_fallback_len: 1024,
        }
    }
}

impl DiffOptions {
    /// Parse options from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the JSON is malformed or a value is out of
    /// range.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: DiffOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Read options from [`DIFF_OPTIONS_ENV`], if set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the variable holds invalid options.
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var(DIFF_OPTIONS_ENV) {
            Ok(json) => Self::from_json(&json).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_fallback_len == 0 {
            return Err(AssertXError::InvalidConfig {
                reason: "max_fallback_len must be positive".to_string(),
            });
        }
        Ok(())
    }
}

static DIFF_OPTIONS: OnceLock<DiffOptions> = OnceLock::new();

/// Install the process-wide diff options.
///
/// # Errors
///
/// Returns `ConfigAlreadySet` if the options were already installed or read.
pub fn init_diff_options(options: DiffOptions) -> Result<()> {
    options.validate()?;
    DIFF_OPTIONS
        .set(options)
        .map_err(|_| AssertXError::ConfigAlreadySet)
}

/// The process-wide diff options.
///
/// The first read freezes the options. An invalid `ASSERTX_DIFF_OPTIONS`
/// value is logged and ignored.
pub fn diff_options() -> &'static DiffOptions {
    DIFF_OPTIONS.get_or_init(|| match DiffOptions::from_env() {
        Ok(Some(options)) => options,
        Ok(None) => DiffOptions::default(),
        Err(err) => {
            tracing::warn!(
                component = module_path!(),
                error = %err,
                "ignoring {}",
                DIFF_OPTIONS_ENV
            );
            DiffOptions::default()
        }
    })
}
