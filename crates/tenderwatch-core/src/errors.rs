use tenderwatch_core_types::{RequestId, TraceId};

/// Result type alias using IngestError
pub type Result<T> = std::result::Result<T, IngestError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in the ingestion pipeline. Each kind maps to a stable error code that can
/// be used for programmatic error handling, testing, and operator tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    AlreadyExists,

    // Fingerprint gate
    /// Document structure differs from the active baseline (hard stop)
    TemplateMismatch,
    /// No active baseline and the deployment requires one before ingesting
    BaselineRequired,
    /// Document could not be walked as a markup tree at all
    InvalidDocument,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    /// Concurrent snapshot creation lost a race it could not recover from
    Concurrency,
    /// Follow-up work triggered by a change event failed to dispatch
    DispatchFailed,

    // Internal
    Internal,
}

impl IngestErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            IngestErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            IngestErrorKind::NotFound => "ERR_NOT_FOUND",
            IngestErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            IngestErrorKind::TemplateMismatch => "ERR_TEMPLATE_MISMATCH",
            IngestErrorKind::BaselineRequired => "ERR_BASELINE_REQUIRED",
            IngestErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            IngestErrorKind::Io => "ERR_IO",
            IngestErrorKind::Serialization => "ERR_SERIALIZATION",
            IngestErrorKind::Persistence => "ERR_PERSISTENCE",
            IngestErrorKind::Concurrency => "ERR_CONCURRENCY",
            IngestErrorKind::DispatchFailed => "ERR_DISPATCH_FAILED",
            IngestErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Provides a structured representation of errors with classification fields
/// for programmatic handling and rich context for diagnosis. Rejections and
/// warnings must always carry the source identity and a diagnosable reason
/// string (silent data loss is disallowed), so the builder keeps those
/// fields first-class rather than burying them in the message.
#[derive(Debug, Clone)]
pub struct IngestError {
    kind: IngestErrorKind,
    op: Option<String>,
    source_identity: Option<String>,
    tender_ref: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<IngestError>>,
}

impl IngestError {
    /// Create a new error with the specified kind
    pub fn new(kind: IngestErrorKind) -> Self {
        Self {
            kind,
            op: None,
            source_identity: None,
            tender_ref: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add source identity context (e.g. sender address)
    pub fn with_source_identity(mut self, id: impl Into<String>) -> Self {
        self.source_identity = Some(id.into());
        self
    }

    /// Add tender business key context
    pub fn with_tender_ref(mut self, id: impl Into<String>) -> Self {
        self.tender_ref = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: IngestError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> IngestErrorKind {
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

    /// Get the source identity context, if any
    pub fn source_identity(&self) -> Option<&str> {
        self.source_identity.as_deref()
    }

    /// Get the tender business key context, if any
    pub fn tender_ref(&self) -> Option<&str> {
        self.tender_ref.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the trace ID context, if any
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&IngestError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(source_identity) = &self.source_identity {
            write!(f, " (source: {})", source_identity)?;
        }
        if let Some(tender_ref) = &self.tender_ref {
            write!(f, " (tender_ref: {})", tender_ref)?;
        }
        Ok(())
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::new(IngestErrorKind::Serialization).with_message(err.to_string())
    }
}

// ========== End Error Facility ==========
