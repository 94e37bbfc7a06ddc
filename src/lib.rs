pub mod bus;
pub mod config;
pub mod translator;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParleyError {
    #[error("Type mismatch on '{channel}': {detail}")]
    TypeMismatch { channel: String, detail: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Bus error: {0}")]
    BusError(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for ParleyError {
    fn from(e: std::io::Error) -> Self {
        ParleyError::IOError(e.to_string())
    }
}

impl ParleyError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // A resolved type fed a value of the wrong shape is a genuine
            // misconfiguration; the node must not start on it.
            ParleyError::TypeMismatch { .. } => false,
            ParleyError::ConfigError(_) => false,
            // Bus send failures are transient once the node is serving.
            ParleyError::BusError(_) => true,
            ParleyError::IOError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParleyError>;
