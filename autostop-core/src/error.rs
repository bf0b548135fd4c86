use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutostopError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Sessions request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sessions API returned {status}: {body}")]
    SessionsApi { status: u16, body: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid metadata in {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    #[error("No DEV_ENDPOINT_NAME assignment found in {path}")]
    EndpointNameNotFound { path: PathBuf },

    #[error("Unparseable activity timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("{operation} failed: {message}")]
    Platform {
        operation: &'static str,
        message: String,
    },

    #[error("Notebook instance {instance} reported no last modified time")]
    MissingLastModified { instance: String },
}

pub type Result<T, E = AutostopError> = std::result::Result<T, E>;
