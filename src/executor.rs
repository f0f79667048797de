//! The simple request executor: signs one request, dispatches it through
//! the HTTP transport, and routes the outcome into one of the typed S3
//! result variants.

use std::sync::Arc;

use crate::credentials::{Acl, Credentials};
use crate::error::S3Error;
use crate::signer::RequestSigner;
use crate::transport::{HttpRequest, HttpTransport, RequestOptions};
use crate::types::{Method, SignOptions};
use crate::xml::{extract_etag, fail_if_contains_error, is_http_not_found, parse_error_body};

/// Outcome of a `HEAD`-style stat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatOutcome {
    Success { etag: Option<String>, content_length: Option<u64> },
    NotFound,
    Failure(S3Error),
}

/// Outcome of a `GET` download request (non-streaming; see
/// [`crate::download`] for the partial-delivery variant).
#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    Success { body: bytes::Bytes },
    NotFound,
    Failure(S3Error),
}

/// Outcome of a `PUT` single-file upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success,
    Failure(S3Error),
}

/// Outcome of a `DELETE` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Success,
    NotFound,
    Failure(S3Error),
}

/// Outcome of a multipart `CompleteMultipartUpload` POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Success,
    Failure(S3Error),
}

/// Outcome of a multipart `UploadPart` PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartOutcome {
    Success { etag: String },
    Failure(S3Error),
}

/// Executor parameters shared by every simple (non-multipart) request.
pub struct SimpleRequest<'a> {
    pub path: &'a str,
    pub method: Method,
    pub search_params: Option<String>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: bytes::Bytes,
    pub proxy_url: Option<String>,
    pub range: Option<(u64, Option<u64>)>,
    pub acl: Option<Acl>,
}

impl<'a> SimpleRequest<'a> {
    pub fn new(path: &'a str, method: Method) -> Self {
        Self {
            path,
            method,
            search_params: None,
            content_type: None,
            content_disposition: None,
            body: bytes::Bytes::new(),
            proxy_url: None,
            range: None,
            acl: None,
        }
    }
}

fn range_header(offset: u64, size: Option<u64>) -> String {
    match size {
        Some(size) => format!("bytes={offset}-{}", offset + size - 1),
        None => format!("bytes={offset}-"),
    }
}

/// Signs and dispatches `request`, returning the raw transport response for
/// the caller to classify.
async fn dispatch(
    signer: &RequestSigner,
    transport: &dyn HttpTransport,
    credentials: &Credentials,
    request: &SimpleRequest<'_>,
) -> Result<crate::transport::HttpResponse, S3Error> {
    let mut sign_options = SignOptions::new(request.path, request.method);
    if let Some(ref sp) = request.search_params {
        sign_options = sign_options.search_params(sp.clone());
    }
    if let Some(ref cd) = request.content_disposition {
        sign_options = sign_options.content_disposition(cd.clone());
    }
    if let Some(acl) = request.acl {
        sign_options = sign_options.acl(acl);
    }

    let signed = signer.sign(credentials, &sign_options)?;

    let mut headers = signed.headers.clone();
    if let Some((offset, size)) = request.range {
        headers.push(("Range".to_owned(), range_header(offset, size)));
    }
    if let Some(ref content_type) = request.content_type {
        headers.push(("Content-Type".to_owned(), content_type.clone()));
    }

    let http_request = HttpRequest {
        method: request.method,
        url: signed.url,
        headers,
        body: request.body.clone(),
        options: RequestOptions {
            proxy_url: request.proxy_url.clone(),
            ..Default::default()
        },
    };

    transport
        .execute(http_request)
        .await
        .map_err(S3Error::Transport)
}

pub async fn stat(
    signer: &RequestSigner,
    transport: &dyn HttpTransport,
    credentials: &Credentials,
    request: &SimpleRequest<'_>,
) -> StatOutcome {
    let response = match dispatch(signer, transport, credentials, request).await {
        Ok(response) => response,
        Err(err) => return StatOutcome::Failure(err),
    };

    match response.status {
        200 => {
            let etag = header_value(&response.headers, "etag").map(|v| v.trim_matches('"').to_owned());
            let content_length = header_value(&response.headers, "content-length")
                .and_then(|v| v.parse::<u64>().ok());
            StatOutcome::Success { etag, content_length }
        }
        status if is_http_not_found(status) => StatOutcome::NotFound,
        _ => StatOutcome::Failure(classify_failure(response)),
    }
}

pub async fn download(
    signer: &RequestSigner,
    transport: &dyn HttpTransport,
    credentials: &Credentials,
    request: &SimpleRequest<'_>,
) -> DownloadOutcome {
    let response = match dispatch(signer, transport, credentials, request).await {
        Ok(response) => response,
        Err(err) => return DownloadOutcome::Failure(err),
    };

    match response.status {
        200 | 204 | 206 => DownloadOutcome::Success { body: response.body },
        404 => DownloadOutcome::NotFound,
        _ => DownloadOutcome::Failure(classify_failure(response)),
    }
}

pub async fn upload(
    signer: &RequestSigner,
    transport: &dyn HttpTransport,
    credentials: &Credentials,
    request: &SimpleRequest<'_>,
) -> UploadOutcome {
    let response = match dispatch(signer, transport, credentials, request).await {
        Ok(response) => response,
        Err(err) => return UploadOutcome::Failure(err),
    };

    match response.status {
        200 => UploadOutcome::Success,
        _ => UploadOutcome::Failure(classify_failure(response)),
    }
}

pub async fn delete(
    signer: &RequestSigner,
    transport: &dyn HttpTransport,
    credentials: &Credentials,
    request: &SimpleRequest<'_>,
) -> DeleteOutcome {
    let response = match dispatch(signer, transport, credentials, request).await {
        Ok(response) => response,
        Err(err) => return DeleteOutcome::Failure(err),
    };

    match response.status {
        200 | 204 => DeleteOutcome::Success,
        404 => DeleteOutcome::NotFound,
        _ => DeleteOutcome::Failure(classify_failure(response)),
    }
}

pub async fn commit(
    signer: &RequestSigner,
    transport: &dyn HttpTransport,
    credentials: &Credentials,
    request: &SimpleRequest<'_>,
) -> CommitOutcome {
    let response = match dispatch(signer, transport, credentials, request).await {
        Ok(response) => response,
        Err(err) => return CommitOutcome::Failure(err),
    };

    let body = String::from_utf8_lossy(&response.body);
    match fail_if_contains_error(response.status, &body) {
        Ok(()) => CommitOutcome::Success,
        Err(err) => CommitOutcome::Failure(err),
    }
}

pub async fn part(
    signer: &RequestSigner,
    transport: &dyn HttpTransport,
    credentials: &Credentials,
    request: &SimpleRequest<'_>,
) -> PartOutcome {
    let response = match dispatch(signer, transport, credentials, request).await {
        Ok(response) => response,
        Err(err) => return PartOutcome::Failure(err),
    };

    let body = String::from_utf8_lossy(&response.body);
    if let Err(err) = fail_if_contains_error(response.status, &body) {
        return PartOutcome::Failure(err);
    }

    match header_value(&response.headers, "etag") {
        Some(etag) => PartOutcome::Success { etag: etag.trim_matches('"').to_owned() },
        None => match extract_etag(&body) {
            Some(etag) => PartOutcome::Success { etag },
            None => PartOutcome::Failure(S3Error::Protocol {
                code: "UnknownError".to_owned(),
                message: "part response carried no ETag".to_owned(),
            }),
        },
    }
}

/// Dispatch an `InitiateMultipartUpload` POST and extract the returned
/// `UploadId`. A 200 response with no `<UploadId>` element fails the whole
/// upload per the coordinator's design.
pub async fn initiate_multipart(
    signer: &RequestSigner,
    transport: &dyn HttpTransport,
    credentials: &Credentials,
    request: &SimpleRequest<'_>,
) -> Result<String, S3Error> {
    let response = dispatch(signer, transport, credentials, request).await?;
    if response.status != 200 {
        return Err(classify_failure(response));
    }
    let body = String::from_utf8_lossy(&response.body);
    crate::xml::extract_upload_id(&body).ok_or(S3Error::MissingUploadId)
}

fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn classify_failure(response: crate::transport::HttpResponse) -> S3Error {
    let body = String::from_utf8_lossy(&response.body);
    let is_not_found_class = response.status == 404;
    parse_error_body(&body, is_not_found_class)
}

pub struct Executor {
    pub signer: Arc<RequestSigner>,
    pub transport: Arc<dyn HttpTransport>,
}

impl Executor {
    pub fn new(signer: Arc<RequestSigner>, transport: Arc<dyn HttpTransport>) -> Self {
        Self { signer, transport }
    }

    pub async fn stat(&self, credentials: &Credentials, request: &SimpleRequest<'_>) -> StatOutcome {
        stat(&self.signer, self.transport.as_ref(), credentials, request).await
    }

    pub async fn download(&self, credentials: &Credentials, request: &SimpleRequest<'_>) -> DownloadOutcome {
        download(&self.signer, self.transport.as_ref(), credentials, request).await
    }

    pub async fn upload(&self, credentials: &Credentials, request: &SimpleRequest<'_>) -> UploadOutcome {
        upload(&self.signer, self.transport.as_ref(), credentials, request).await
    }

    pub async fn delete(&self, credentials: &Credentials, request: &SimpleRequest<'_>) -> DeleteOutcome {
        delete(&self.signer, self.transport.as_ref(), credentials, request).await
    }

    pub async fn commit(&self, credentials: &Credentials, request: &SimpleRequest<'_>) -> CommitOutcome {
        commit(&self.signer, self.transport.as_ref(), credentials, request).await
    }

    pub async fn part(&self, credentials: &Credentials, request: &SimpleRequest<'_>) -> PartOutcome {
        part(&self.signer, self.transport.as_ref(), credentials, request).await
    }
}
