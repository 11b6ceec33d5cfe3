pub mod classify;
pub mod config;
pub mod lister;
pub mod llm;
pub mod normalize;
pub mod prompt;
pub mod service;
pub mod session;
pub mod upload;
pub mod utils;

pub use classify::{Alert, FailureClass, Feature, classify};
pub use service::{ConvertOutput, convert_code, debug_screenshot};
pub use session::{ConvertInput, DebugInput, Model, SessionState, SourceLanguage, TargetLanguage};
pub use upload::{UploadError, UploadedImage};

use std::fmt::Display;

#[derive(Debug)]
pub enum LLMError {
    /// No API key was provided, nothing was sent.
    MissingCredential,
    /// The service answered with a non-success status.
    ApiError {
        code: u16,
        status: String,
        message: String,
    },
    /// The service answered successfully but the payload carried no usable text.
    InvalidResponse(String),
    ConnectionError(anyhow::Error),
    OtherError(anyhow::Error),
}

impl Display for LLMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMError::MissingCredential => {
                write!(f, "API key is missing")
            }
            LLMError::ApiError {
                code,
                status,
                message,
            } => {
                write!(f, "{} {}: {}", code, status, message)
            }
            LLMError::InvalidResponse(msg) => {
                write!(f, "Invalid response: {}", msg)
            }
            LLMError::ConnectionError(e) => {
                write!(f, "Connection error: {}", e)
            }
            LLMError::OtherError(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

impl std::error::Error for LLMError {}
