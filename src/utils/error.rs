use thiserror::Error;

/// Failures talking to the generative model service.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model call failed after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Model returned empty content")]
    EmptyContent,

    #[error("No API key configured")]
    MissingApiKey,
}

/// Ways a model response can violate the assessment schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("response is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("missing field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' has wrong type, expected {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("match_score {value} is outside 0..=100")]
    ScoreOutOfRange { value: String },
}

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("File '{path}' is not valid UTF-8")]
    EncodingError { path: String },

    #[error("Prompt template error: {reason}")]
    TemplateError { reason: String },

    #[error("Model error: {0}")]
    ModelError(#[from] ModelError),

    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaError),

    #[error("Serialization error: {0}")]
    SerializationError(#[source] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Model,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScreenError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScreenError::InputNotFound { .. } | ScreenError::EncodingError { .. } => {
                ErrorCategory::Input
            }
            ScreenError::TemplateError { .. }
            | ScreenError::ConfigError { .. }
            | ScreenError::MissingConfigError { .. }
            | ScreenError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ScreenError::ModelError(_) | ScreenError::SchemaError(_) => ErrorCategory::Model,
            ScreenError::IoError(_) | ScreenError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ScreenError::SchemaError(_) => ErrorSeverity::Low,
            ScreenError::ModelError(ModelError::MissingApiKey) => ErrorSeverity::High,
            ScreenError::ModelError(_) => ErrorSeverity::Medium,
            ScreenError::InputNotFound { .. } | ScreenError::EncodingError { .. } => {
                ErrorSeverity::High
            }
            ScreenError::TemplateError { .. }
            | ScreenError::ConfigError { .. }
            | ScreenError::MissingConfigError { .. }
            | ScreenError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            ScreenError::IoError(_) | ScreenError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ScreenError::InputNotFound { path } => {
                format!("Create '{}' or point the configuration at the right file", path)
            }
            ScreenError::EncodingError { path } => {
                format!("Re-save '{}' as UTF-8 text", path)
            }
            ScreenError::TemplateError { .. } => {
                "Check the prompt template: only {jd_text} and {cv_text} are allowed, literal braces must be doubled".to_string()
            }
            ScreenError::ModelError(ModelError::MissingApiKey) => {
                "Set the GEMINI_API_KEY environment variable".to_string()
            }
            ScreenError::ModelError(ModelError::Api { status, .. }) if *status == 401 || *status == 403 => {
                "Verify that the API key is valid".to_string()
            }
            ScreenError::ModelError(_) => {
                "Check network connectivity or raise retry.max_attempts".to_string()
            }
            ScreenError::SchemaError(_) => {
                "Re-run the candidate; the model returned an unexpected structure".to_string()
            }
            ScreenError::ConfigError { .. }
            | ScreenError::MissingConfigError { .. }
            | ScreenError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments".to_string()
            }
            ScreenError::IoError(_) | ScreenError::SerializationError(_) => {
                "Check that the output directory is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read input: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Model => format!("Assessment failed: {}", self),
            ErrorCategory::Output => format!("Could not write output: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScreenError>;
