//! Core of an S3-compatible object storage client: an AWS SigV4 request
//! signer and a multipart upload coordinator, meant to be embedded in a
//! host runtime that supplies the HTTP transport and stream plumbing.
//!
//! The crate itself never opens a socket. Callers wire a [`transport::HttpTransport`]
//! implementation and a ready-to-use [`credentials::Credentials`] bundle;
//! everything else (canonicalization, signing-key caching, part slicing,
//! retry/rollback) lives here.

pub mod canonical;
pub mod credentials;
pub mod crypto;
pub mod date;
pub mod download;
pub mod error;
pub mod executor;
pub mod multipart;
pub mod path;
pub mod region;
pub mod sigkey_cache;
pub mod signer;
pub mod transport;
pub mod types;
pub mod xml;

pub use credentials::{Acl, Credentials, CredentialsBuilder};
pub use error::{Result, S3Error};
pub use executor::Executor;
pub use multipart::{MultiPartUploadOptions, MultipartResult, MultipartUpload};
pub use signer::RequestSigner;
pub use types::{Method, SignOptions, SignQueryOptions, SignResult};
