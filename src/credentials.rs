//! Credentials bundle and canned ACLs.

use std::sync::Arc;

use crate::region::guess_region;

/// Canned ACL, fixed wire strings only; no policy evaluation lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Acl {
    Private,
    PublicRead,
    PublicReadWrite,
    AwsExecRead,
    AuthenticatedRead,
    BucketOwnerRead,
    BucketOwnerFullControl,
    LogDeliveryWrite,
}

impl Acl {
    pub const fn as_wire_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
            Self::PublicReadWrite => "public-read-write",
            Self::AwsExecRead => "aws-exec-read",
            Self::AuthenticatedRead => "authenticated-read",
            Self::BucketOwnerRead => "bucket-owner-read",
            Self::BucketOwnerFullControl => "bucket-owner-full-control",
            Self::LogDeliveryWrite => "log-delivery-write",
        }
    }
}

/// Immutable credential bundle, shared by reference across concurrent
/// operations. Any field may be empty except where noted; `region`
/// defaults via [`guess_region`] when not supplied.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub endpoint: String,
    pub bucket: String,
    pub session_token: String,
    pub insecure_http: bool,
}

impl Credentials {
    pub fn builder() -> CredentialsBuilder {
        CredentialsBuilder::default()
    }

    pub fn scheme(&self) -> &'static str {
        if self.insecure_http {
            "http"
        } else {
            "https"
        }
    }

    /// Host header value: the endpoint verbatim if supplied, otherwise the
    /// regional AWS S3 endpoint for `self.region`.
    pub fn host(&self) -> String {
        if !self.endpoint.is_empty() {
            strip_scheme(&self.endpoint).to_owned()
        } else {
            format!("s3.{}.amazonaws.com", self.region)
        }
    }

    pub fn has_session_token(&self) -> bool {
        !self.session_token.is_empty()
    }
}

fn strip_scheme(endpoint: &str) -> &str {
    endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint)
}

#[derive(Debug, Default)]
pub struct CredentialsBuilder {
    access_key_id: String,
    secret_access_key: String,
    region: Option<String>,
    endpoint: String,
    bucket: String,
    session_token: String,
}

impl CredentialsBuilder {
    pub fn access_key_id(mut self, value: impl Into<String>) -> Self {
        self.access_key_id = value.into();
        self
    }

    pub fn secret_access_key(mut self, value: impl Into<String>) -> Self {
        self.secret_access_key = value.into();
        self
    }

    pub fn region(mut self, value: impl Into<String>) -> Self {
        self.region = Some(value.into());
        self
    }

    pub fn endpoint(mut self, value: impl Into<String>) -> Self {
        self.endpoint = value.into();
        self
    }

    pub fn bucket(mut self, value: impl Into<String>) -> Self {
        self.bucket = value.into();
        self
    }

    pub fn session_token(mut self, value: impl Into<String>) -> Self {
        self.session_token = value.into();
        self
    }

    pub fn build(self) -> Arc<Credentials> {
        let insecure_http = self.endpoint.starts_with("http://");
        let region = self
            .region
            .unwrap_or_else(|| guess_region(&self.endpoint));
        Arc::new(Credentials {
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            region,
            endpoint: self.endpoint,
            bucket: self.bucket,
            session_token: self.session_token,
            insecure_http,
        })
    }
}
