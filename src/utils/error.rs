use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Remote command produced no output")]
    EmptyResponse,

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Invoice record does not match schema: {message}")]
    SchemaError { message: String },

    #[error("Remote command `{command}` failed with status {status}: {stderr}")]
    RemoteCommandError {
        command: String,
        status: i32,
        stderr: String,
    },

    #[error("Remote session error: {message}")]
    SessionError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Remote,
    Response,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InvoiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            InvoiceError::ConfigError { .. }
            | InvoiceError::ConfigValidationError { .. }
            | InvoiceError::InvalidConfigValueError { .. }
            | InvoiceError::MissingConfigError { .. } => ErrorCategory::Configuration,
            InvoiceError::ValidationError { .. } => ErrorCategory::Input,
            InvoiceError::RemoteCommandError { .. } | InvoiceError::SessionError { .. } => {
                ErrorCategory::Remote
            }
            InvoiceError::EmptyResponse
            | InvoiceError::MalformedResponse { .. }
            | InvoiceError::SchemaError { .. }
            | InvoiceError::SerializationError(_) => ErrorCategory::Response,
            InvoiceError::IoError(_) | InvoiceError::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            // 遠端節點可能暫時不可用，由呼叫端決定是否重試
            ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Response => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            InvoiceError::EmptyResponse => {
                "Check that lncli is installed on the node and the configured lncli command is correct"
            }
            InvoiceError::MalformedResponse { .. } => {
                "Run the command manually on the node and inspect its output"
            }
            InvoiceError::SchemaError { .. } => {
                "The node returned an invoice format this client does not know; check the lnd version"
            }
            InvoiceError::RemoteCommandError { .. } => {
                "Inspect the stderr output above; the node may be locked or not synced"
            }
            InvoiceError::SessionError { .. } => {
                "Verify host, user and SSH key access (try `ssh user@host` manually)"
            }
            InvoiceError::IoError(_) => "Check file permissions and that required binaries are on PATH",
            InvoiceError::SerializationError(_) | InvoiceError::CsvError(_) => {
                "Try a different --format"
            }
            InvoiceError::ConfigError { .. }
            | InvoiceError::ConfigValidationError { .. }
            | InvoiceError::InvalidConfigValueError { .. }
            | InvoiceError::MissingConfigError { .. } => {
                "Review the configuration file and command-line flags"
            }
            InvoiceError::ValidationError { .. } => "Review the command arguments",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            InvoiceError::EmptyResponse => "The Lightning node returned nothing".to_string(),
            InvoiceError::MalformedResponse { .. } => {
                "The Lightning node returned output that could not be understood".to_string()
            }
            InvoiceError::RemoteCommandError { stderr, .. } => {
                format!("The Lightning node rejected the command: {}", stderr.trim())
            }
            InvoiceError::SessionError { message } => {
                format!("Could not reach the Lightning node: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
