use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GoupError>;

#[derive(Error, Debug)]
pub enum GoupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("Install step '{step}' failed ({status}): {stderr}")]
    Install {
        step: String,
        status: String,
        stderr: String,
    },

    #[error("Version check failed: {message}")]
    Version { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid config file {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },
}

impl GoupError {
    pub fn network<U: Into<String>, S: ToString>(url: U, message: S) -> Self {
        GoupError::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn parse_error<S: Into<String>>(message: S) -> Self {
        GoupError::Parse {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        GoupError::NotFound {
            message: message.into(),
        }
    }

    pub fn version_error<S: Into<String>>(message: S) -> Self {
        GoupError::Version {
            message: message.into(),
        }
    }

    pub fn config_error<S: Into<String>>(message: S) -> Self {
        GoupError::ConfigError {
            message: message.into(),
        }
    }
}
