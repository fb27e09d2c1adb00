use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid or unreadable image file uploaded: {message}")]
    ImageDecode { message: String },

    #[error("Unsupported image layout: {channels} channel(s), expected 1, 3 or 4")]
    ImageShape { channels: u8 },

    #[error("Model not loaded. Check server startup logs for model loading errors. ({reason})")]
    ModelUnavailable { reason: String },

    #[error("Model prediction failed due to an internal error: {message}")]
    InferenceFailure { message: String },

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} responded with status {status}: {message}")]
    Upstream {
        service: String,
        status: u16,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("Upload exceeds the {limit_bytes} byte limit")]
    PayloadTooLarge { limit_bytes: usize },

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required configuration field: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidation { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Model,
    Upstream,
    Storage,
    Auth,
    Configuration,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::ImageDecode { .. }
            | AppError::ImageShape { .. }
            | AppError::BadRequest { .. }
            | AppError::PayloadTooLarge { .. } => ErrorCategory::Input,
            AppError::ModelUnavailable { .. } | AppError::InferenceFailure { .. } => ErrorCategory::Model,
            AppError::Http(_) | AppError::Upstream { .. } => ErrorCategory::Upstream,
            AppError::Io(_) | AppError::Serialization(_) | AppError::Storage { .. } => ErrorCategory::Storage,
            AppError::Unauthorized => ErrorCategory::Auth,
            AppError::Config { .. }
            | AppError::MissingConfig { .. }
            | AppError::InvalidConfigValue { .. }
            | AppError::ConfigValidation { .. } => ErrorCategory::Configuration,
        }
    }

    /// HTTP status the error maps to when it reaches a caller.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::ImageDecode { .. } | AppError::ImageShape { .. } | AppError::BadRequest { .. } => 400,
            AppError::Unauthorized => 401,
            AppError::PayloadTooLarge { .. } => 413,
            AppError::ModelUnavailable { .. } => 503,
            AppError::Http(_) | AppError::Upstream { .. } => 502,
            _ => 500,
        }
    }

    /// Transport-level failure talking to an external service (connect, DNS, timeout).
    pub fn is_transport(&self) -> bool {
        match self {
            AppError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Upload a valid PNG, JPEG, BMP, GIF or WebP image and check the request fields",
            ErrorCategory::Model => "Check the model and class-name artifact paths in [model] and restart the service",
            ErrorCategory::Upstream => "Check network access and the API key of the external service",
            ErrorCategory::Storage => "Check that [storage].data_dir exists and is writable",
            ErrorCategory::Auth => "Send a valid 'Authorization: Bearer <token>' header",
            ErrorCategory::Configuration => "Fix the configuration file and restart the service",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
