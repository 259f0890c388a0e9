//! Declarative Differ configuration in YAML.
//!
//! ```yaml
//! schema_version: 0
//! max_depth: 12
//! template: "{} | {} | {}"
//! ignore: ['Person\.Loc']
//! include: []
//! trim_space: ['Person\.Name']
//! trim:
//!   - path: 'Person\.Nick'
//!     cutset: " _"
//! ```
//!
//! Every key except `schema_version` is optional. Comparators and sorters
//! carry code and can only be registered through the builder methods.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::diff::Template;
use crate::engine::Differ;
use crate::errors::{DiffError, ExError, ExErrorKind};
use crate::rules::filter::PatternSet;
use crate::{log_op_end, log_op_error, log_op_start};

/// Supported `schema_version`
pub const PROFILE_SCHEMA_VERSION: u32 = 0;

/// Top-level profile structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffProfile {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    /// Recursion ceiling; the engine default applies when absent
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Report template with three `{}` slots
    #[serde(default)]
    pub template: Option<String>,

    /// Exclude patterns
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Include patterns; when non-empty, `ignore` has no effect
    #[serde(default)]
    pub include: Vec<String>,

    /// Paths whose string leaves are compared without surrounding whitespace
    #[serde(default)]
    pub trim_space: Vec<String>,

    /// Cutset trim rules
    #[serde(default)]
    pub trim: Vec<TrimSpec>,
}

/// One cutset trim rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrimSpec {
    /// Path pattern
    pub path: String,

    /// Characters stripped from both ends
    pub cutset: String,
}

fn invalid_profile(op: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidProfile)
        .with_op(op)
        .with_message(message)
}

/// Parse and validate a profile from a file
///
/// # Errors
///
/// `Io` when the file cannot be read, otherwise as [`parse_profile_str`].
pub fn parse_profile_file(path: &Path) -> Result<DiffProfile, ExError> {
    log_op_start!("parse_profile_file", path = %path.display());
    let start = Instant::now();

    let result = fs::read_to_string(path)
        .map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("parse_profile_file")
                .with_path(path.display().to_string())
                .with_message(format!("failed to read profile: {}", e))
        })
        .and_then(|content| parse_profile_str(&content));

    match result {
        Ok(profile) => {
            log_op_end!(
                "parse_profile_file",
                duration_ms = start.elapsed().as_millis() as u64
            );
            Ok(profile)
        }
        Err(e) => {
            log_op_error!(
                "parse_profile_file",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

/// Parse and validate a profile from a YAML string
///
/// # Errors
///
/// `InvalidProfile` for malformed YAML, unknown keys or a profile that fails
/// [`validate_profile`].
pub fn parse_profile_str(content: &str) -> Result<DiffProfile, ExError> {
    let profile: DiffProfile = serde_yaml::from_str(content)
        .map_err(|e| invalid_profile("parse_profile_str", format!("YAML parse error: {}", e)))?;

    validate_profile(&profile)?;

    Ok(profile)
}

/// Validate a profile without applying it
///
/// # Errors
///
/// `InvalidProfile` for an unsupported schema version; the underlying
/// `InvalidPattern`/`InvalidTemplate` error is attached as source. Any
/// `max_depth` is accepted, as with [`Differ::with_max_depth`].
pub fn validate_profile(profile: &DiffProfile) -> Result<(), ExError> {
    const OP: &str = "validate_profile";

    if profile.schema_version != PROFILE_SCHEMA_VERSION {
        return Err(invalid_profile(
            OP,
            format!(
                "Unsupported schema_version: {}. Expected {}",
                profile.schema_version, PROFILE_SCHEMA_VERSION
            ),
        ));
    }

    let nested = |field: &str, err: DiffError| {
        invalid_profile(OP, format!("invalid `{}`: {}", field, err)).with_source(err.into())
    };

    if let Some(template) = &profile.template {
        Template::parse(template).map_err(|e| nested("template", e))?;
    }
    PatternSet::compile(&profile.ignore).map_err(|e| nested("ignore", e))?;
    PatternSet::compile(&profile.include).map_err(|e| nested("include", e))?;
    PatternSet::compile(&profile.trim_space).map_err(|e| nested("trim_space", e))?;
    PatternSet::compile(profile.trim.iter().map(|t| &t.path)).map_err(|e| nested("trim", e))?;

    Ok(())
}

impl Differ {
    /// Install every setting of a profile on top of the current configuration
    ///
    /// Lists replace (`ignore`, `include`) or extend (`trim_space`, `trim`)
    /// the existing rules exactly as the matching builder methods do.
    ///
    /// # Errors
    ///
    /// As [`validate_profile`]; nothing is applied when validation fails.
    pub fn apply_profile(&mut self, profile: &DiffProfile) -> Result<&mut Self, ExError> {
        validate_profile(profile)?;

        let install = |differ: &mut Differ| -> crate::errors::Result<()> {
            if let Some(depth) = profile.max_depth {
                differ.with_max_depth(depth);
            }
            if let Some(template) = &profile.template {
                differ.with_template(template)?;
            }
            if !profile.ignore.is_empty() {
                differ.ignore(&profile.ignore)?;
            }
            if !profile.include.is_empty() {
                differ.includes(&profile.include)?;
            }
            if !profile.trim_space.is_empty() {
                differ.with_trim_space(&profile.trim_space)?;
            }
            for spec in &profile.trim {
                differ.with_trim(&spec.path, &spec.cutset)?;
            }
            Ok(())
        };
        install(self).map_err(|e| ExError::from(e).with_op("apply_profile"))?;

        tracing::debug!(
            session_id = %self.session_id(),
            max_depth = self.max_depth(),
            "profile applied"
        );
        Ok(self)
    }
}
