//! Shared request/result types for the signer and executor.

use crate::credentials::Acl;

/// HTTP methods the signer knows how to canonicalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

/// Default presigned-URL expiry: 24 hours.
pub const DEFAULT_EXPIRES_SECS: u64 = 86_400;

/// Inputs to header-based signing.
#[derive(Debug, Clone)]
pub struct SignOptions {
    pub path: String,
    pub method: Method,
    /// Defaults to `"UNSIGNED-PAYLOAD"` when absent.
    pub content_hash: Option<String>,
    /// Raw `name=value&...` query string, without a leading `?`.
    pub search_params: Option<String>,
    pub content_disposition: Option<String>,
    pub acl: Option<Acl>,
}

impl SignOptions {
    pub fn new(path: impl Into<String>, method: Method) -> Self {
        Self {
            path: path.into(),
            method,
            content_hash: None,
            search_params: None,
            content_disposition: None,
            acl: None,
        }
    }

    pub fn content_hash(mut self, value: impl Into<String>) -> Self {
        self.content_hash = Some(value.into());
        self
    }

    pub fn search_params(mut self, value: impl Into<String>) -> Self {
        self.search_params = Some(value.into());
        self
    }

    pub fn content_disposition(mut self, value: impl Into<String>) -> Self {
        self.content_disposition = Some(value.into());
        self
    }

    pub fn acl(mut self, value: Acl) -> Self {
        self.acl = Some(value);
        self
    }
}

/// Inputs to presigned-URL (query-string) signing.
#[derive(Debug, Clone, Copy)]
pub struct SignQueryOptions {
    pub expires: u64,
}

impl Default for SignQueryOptions {
    fn default() -> Self {
        Self { expires: DEFAULT_EXPIRES_SECS }
    }
}

/// The product of signing: headers to send verbatim (header mode) or a
/// fully-qualified URL (query mode).
#[derive(Debug, Clone)]
pub struct SignResult {
    pub amz_date: String,
    pub host: String,
    pub authorization: String,
    pub url: String,
    pub content_disposition: Option<String>,
    pub session_token: Option<String>,
    pub acl: Option<Acl>,
    pub headers: Vec<(String, String)>,
}
