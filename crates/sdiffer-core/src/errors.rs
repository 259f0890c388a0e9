use thiserror::Error;

/// Result type alias using DiffError
pub type Result<T> = std::result::Result<T, DiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Traversal
    ShapeMismatch,
    InvalidValue,
    DepthExceeded,
    FaultyComparator,

    // Configuration
    InvalidPattern,
    InvalidTemplate,
    InvalidProfile,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ShapeMismatch => "ERR_SHAPE_MISMATCH",
            ExErrorKind::InvalidValue => "ERR_INVALID_VALUE",
            ExErrorKind::DepthExceeded => "ERR_DEPTH_EXCEEDED",
            ExErrorKind::FaultyComparator => "ERR_FAULTY_COMPARATOR",
            ExErrorKind::InvalidPattern => "ERR_INVALID_PATTERN",
            ExErrorKind::InvalidTemplate => "ERR_INVALID_TEMPLATE",
            ExErrorKind::InvalidProfile => "ERR_INVALID_PROFILE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus optional operation and path context.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add field-path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
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

    /// Get the field-path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Failure classes of a comparison or of Differ configuration
///
/// Every variant aborts the current comparison; no partial diff list is kept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    // ===== Traversal Errors =====
    /// Operand shapes differ, at the root or at a nested path
    #[error("type mismatch at {path}: A is {a}, B is {b}")]
    ShapeMismatch { path: String, a: String, b: String },

    /// An operand is absent where traversal expects a value
    #[error("value invalid at {path}: {reason}")]
    InvalidValue { path: String, reason: String },

    /// Recursion passed the configured ceiling
    #[error("depth over limit at {path}: depth {depth} exceeds max {max_depth}")]
    DepthExceeded {
        path: String,
        depth: usize,
        max_depth: usize,
    },

    /// A custom comparator broke its contract
    #[error("customized comparator at {path} is faulty: {reason}")]
    FaultyComparator { path: String, reason: String },

    // ===== Configuration Errors =====
    /// A caller-supplied path pattern failed to compile
    #[error("invalid path pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// An output template does not have exactly three placeholders
    #[error("invalid template `{template}`: {reason}")]
    InvalidTemplate { template: String, reason: String },
}

impl DiffError {
    /// Build an InvalidPattern error from a regex compile failure
    pub fn invalid_pattern(pattern: &str, err: &regex::Error) -> Self {
        DiffError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        }
    }

    /// Canonical kind for this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            DiffError::ShapeMismatch { .. } => ExErrorKind::ShapeMismatch,
            DiffError::InvalidValue { .. } => ExErrorKind::InvalidValue,
            DiffError::DepthExceeded { .. } => ExErrorKind::DepthExceeded,
            DiffError::FaultyComparator { .. } => ExErrorKind::FaultyComparator,
            DiffError::InvalidPattern { .. } => ExErrorKind::InvalidPattern,
            DiffError::InvalidTemplate { .. } => ExErrorKind::InvalidTemplate,
        }
    }

    /// Stable error code for this error
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Field path the failure occurred at, for traversal errors
    pub fn path(&self) -> Option<&str> {
        match self {
            DiffError::ShapeMismatch { path, .. }
            | DiffError::InvalidValue { path, .. }
            | DiffError::DepthExceeded { path, .. }
            | DiffError::FaultyComparator { path, .. } => Some(path),
            DiffError::InvalidPattern { .. } | DiffError::InvalidTemplate { .. } => None,
        }
    }
}

/// Conversion from DiffError to ExError
impl From<DiffError> for ExError {
    fn from(err: DiffError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let ex = match &err {
            DiffError::ShapeMismatch { path, .. }
            | DiffError::InvalidValue { path, .. }
            | DiffError::DepthExceeded { path, .. }
            | DiffError::FaultyComparator { path, .. } => {
                ExError::new(kind).with_op("compare").with_path(path.clone())
            }
            DiffError::InvalidPattern { .. } | DiffError::InvalidTemplate { .. } => {
                ExError::new(kind).with_op("configure")
            }
        };
        ex.with_message(message)
    }
}
