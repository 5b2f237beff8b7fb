use thiserror::Error;

/// Error codes the service uses for throttling and transient faults.
const RETRYABLE_CODES: &[&str] = &[
    "ThrottlingException",
    "TooManyRequestsException",
    "InternalServerException",
    "ServiceUnavailableException",
    "RequestTimeout",
    "RequestTimeoutException",
    "PriorRequestNotComplete",
];

pub const INVALID_ENDPOINT_CODE: &str = "InvalidEndpointException";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timed out: {message}")]
    TimeoutError { message: String },

    #[error("Validation error on `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    #[error("Service error {code} (HTTP {status}): {message}")]
    ServiceError {
        code: String,
        message: String,
        status: u16,
        request_id: Option<String>,
    },

    #[error("Endpoint discovery failed: {message}")]
    EndpointDiscoveryError {
        message: String,
        #[source]
        source: Option<Box<ClientError>>,
    },

    #[error("Credentials error: {message}")]
    CredentialsError { message: String },

    #[error("Signing error: {message}")]
    SigningError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Runtime error: {message}")]
    RuntimeError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Validation,
    Service,
    Client,
}

impl ClientError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn serialization(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }

    pub fn discovery(source: ClientError) -> Self {
        Self::EndpointDiscoveryError {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NetworkError { .. } | Self::TimeoutError { .. } => ErrorCategory::Transport,
            Self::ValidationError { .. } | Self::SerializationError { .. } => {
                ErrorCategory::Validation
            }
            Self::ServiceError { .. } | Self::EndpointDiscoveryError { .. } => {
                ErrorCategory::Service
            }
            Self::CredentialsError { .. }
            | Self::SigningError { .. }
            | Self::ConfigError { .. }
            | Self::RuntimeError { .. } => ErrorCategory::Client,
        }
    }

    /// The service error code, if this error came back from the service.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::ServiceError { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkError { .. } | Self::TimeoutError { .. } => true,
            Self::ServiceError { code, status, .. } => {
                *status >= 500 || *status == 429 || RETRYABLE_CODES.contains(&code.as_str())
            }
            _ => false,
        }
    }

    pub fn is_invalid_endpoint(&self) -> bool {
        self.code() == Some(INVALID_ENDPOINT_CODE)
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NetworkError { .. } => "Check network connectivity and the configured endpoint",
            Self::TimeoutError { .. } => "Increase request_timeout_ms or retry later",
            Self::ValidationError { .. } | Self::SerializationError { .. } => {
                "Fix the request parameters and try again"
            }
            Self::ServiceError { status, .. } if *status == 429 => {
                "Reduce the request rate or raise max_attempts"
            }
            Self::ServiceError { status, .. } if *status >= 500 => {
                "The service is having trouble; retry later"
            }
            Self::ServiceError { .. } => "Inspect the service error code and message",
            Self::EndpointDiscoveryError { .. } => {
                "Disable endpoint discovery or set an endpoint override"
            }
            Self::CredentialsError { .. } | Self::SigningError { .. } => {
                "Check AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY and the configured region"
            }
            Self::ConfigError { .. } => "Check the configuration file and environment variables",
            Self::RuntimeError { .. } => {
                "Use call_async from async code; call is for synchronous callers only"
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            Self::TimeoutError { message }
        } else if err.is_builder() {
            Self::ConfigError { message }
        } else {
            Self::NetworkError { message }
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
