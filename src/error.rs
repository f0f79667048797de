//! Closed error hierarchy for the signer, executor and multipart coordinator.

use thiserror::Error;

/// Top-level error type surfaced to callers of this crate.
///
/// Signing errors are synchronous and map to the closed code set from the
/// wire-compatibility section of the design; transport/protocol/semantic
/// errors are asynchronous and carry whatever the HTTP transport or the S3
/// endpoint reported.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum S3Error {
    #[error("missing access key id or secret access key")]
    MissingCredentials,

    #[error("invalid HTTP method for S3 request: {0}")]
    InvalidMethod(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid session token")]
    InvalidSessionToken,

    #[error("failed to generate signature")]
    InvalidSignature,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{code}: {message}")]
    Protocol { code: String, message: String },

    #[error("{code}: {message}")]
    Semantic { code: String, message: String },

    #[error("failed to initiate multipart upload")]
    MissingUploadId,

    #[error("multipart upload already finished")]
    AlreadyFinished,

    #[error("invalid multipart upload options: {0}")]
    InvalidOptions(String),
}

impl S3Error {
    /// The closed code identifiers named in the error-classifier design.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "ERR_S3_MISSING_CREDENTIALS",
            Self::InvalidMethod(_) => "ERR_S3_INVALID_METHOD",
            Self::InvalidPath(_) => "ERR_S3_INVALID_PATH",
            Self::InvalidEndpoint(_) => "ERR_S3_INVALID_ENDPOINT",
            Self::InvalidSessionToken => "ERR_S3_INVALID_SESSION_TOKEN",
            Self::InvalidSignature => "ERR_S3_INVALID_SIGNATURE",
            Self::Transport(_) => "ERR_S3_TRANSPORT",
            Self::Protocol { .. } => "ERR_S3_PROTOCOL",
            Self::Semantic { .. } => "ERR_S3_SEMANTIC",
            Self::MissingUploadId => "ERR_S3_MISSING_UPLOAD_ID",
            Self::AlreadyFinished => "ERR_S3_ALREADY_FINISHED",
            Self::InvalidOptions(_) => "ERR_S3_INVALID_OPTIONS",
        }
    }
}

pub type Result<T> = std::result::Result<T, S3Error>;
