use crate::api::ApiError;
use crate::config::ConfigError;
use crate::intake::{FlowError, SubmitError};
use crate::session::{AccessDenied, AuthError, SessionError, StorageError};
use crate::telemetry::TelemetryError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Api(ApiError),
    Auth(AuthError),
    Session(SessionError),
    Storage(StorageError),
    Access(AccessDenied),
    Flow(FlowError),
    Submit(SubmitError),
    Answers {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Api(err) => write!(f, "api error: {}", err),
            AppError::Auth(err) => write!(f, "authentication error: {}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
            AppError::Storage(err) => write!(f, "storage error: {}", err),
            AppError::Access(err) => write!(f, "access denied: {}", err),
            AppError::Flow(err) => write!(f, "intake error: {}", err),
            AppError::Submit(err) => write!(f, "submission error: {}", err),
            AppError::Answers { path, source } => {
                write!(f, "could not read answers from {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Api(err) => Some(err),
            AppError::Auth(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Storage(err) => Some(err),
            AppError::Access(err) => Some(err),
            AppError::Flow(err) => Some(err),
            AppError::Submit(err) => Some(err),
            AppError::Answers { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ApiError> for AppError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<StorageError> for AppError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<AccessDenied> for AppError {
    fn from(value: AccessDenied) -> Self {
        Self::Access(value)
    }
}

impl From<FlowError> for AppError {
    fn from(value: FlowError) -> Self {
        Self::Flow(value)
    }
}

impl From<SubmitError> for AppError {
    fn from(value: SubmitError) -> Self {
        Self::Submit(value)
    }
}
