use std::sync::Arc;

/// Result type alias using MgError
pub type Result<T> = std::result::Result<T, MgError>;

/// Underlying driver or IO failure carried by an `MgError`
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// without parsing messages. The first group mirrors the phases of a
/// migration run; a failure in any of them after the run transaction has
/// begun means the transaction was rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MgErrorKind {
    // Run phases
    Bootstrap,
    VersionRead,
    Transaction,
    MigrationFailed,
    VersionUpdate,
    Commit,

    // Input
    InvalidInput,

    // Integration/IO
    Io,
    Persistence,
}

impl MgErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            MgErrorKind::Bootstrap => "ERR_BOOTSTRAP",
            MgErrorKind::VersionRead => "ERR_VERSION_READ",
            MgErrorKind::Transaction => "ERR_TRANSACTION",
            MgErrorKind::MigrationFailed => "ERR_MIGRATION_FAILED",
            MgErrorKind::VersionUpdate => "ERR_VERSION_UPDATE",
            MgErrorKind::Commit => "ERR_COMMIT",
            MgErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            MgErrorKind::Io => "ERR_IO",
            MgErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }

    /// Whether errors of this kind are raised after the run transaction
    /// was opened, i.e. the failure rolled the transaction back.
    pub fn rolled_back(&self) -> bool {
        matches!(
            self,
            MgErrorKind::VersionRead
                | MgErrorKind::MigrationFailed
                | MgErrorKind::VersionUpdate
                | MgErrorKind::Commit
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification fields for programmatic handling plus the
/// driver error that caused it, reachable through
/// [`std::error::Error::source`].
#[derive(Debug, Clone)]
pub struct MgError {
    kind: MgErrorKind,
    op: Option<String>,
    key: Option<i64>,
    message: String,
    cause: Option<Cause>,
}

impl MgError {
    /// Create a new error with the specified kind
    pub fn new(kind: MgErrorKind) -> Self {
        Self {
            kind,
            op: None,
            key: None,
            message: String::new(),
            cause: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add migration key context
    pub fn with_key(mut self, key: i64) -> Self {
        self.key = Some(key);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the underlying error
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> MgErrorKind {
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

    /// Get the migration key, if any
    pub fn key(&self) -> Option<i64> {
        self.key
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the underlying error, if any
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }
}

impl std::fmt::Display for MgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key) = self.key {
            write!(f, " (key: {})", key)?;
        }
        Ok(())
    }
}

impl std::error::Error for MgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for MgError {
    fn from(err: std::io::Error) -> Self {
        MgError::new(MgErrorKind::Io)
            .with_message(err.to_string())
            .with_cause(err)
    }
}

// ========== End Error Facility ==========
