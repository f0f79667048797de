//! The HTTP transport contract: an async request executor with streaming
//! body delivery. The transport itself (connection pooling, TLS, proxying,
//! retries at the socket level) is a host collaborator; this crate only
//! depends on the trait below.

use async_trait::async_trait;
use bytes::Bytes;

use crate::types::Method;

/// A fully-formed outbound HTTP request, produced by the signer/executor.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub options: RequestOptions,
}

/// Per-request transport options. `streaming` requests the transport
/// deliver the response body in bounded chunks via [`HttpTransport::execute_streaming`]
/// rather than buffering the whole thing.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub proxy_url: Option<String>,
    pub verbose: bool,
    pub reject_unauthorized: bool,
}

/// A single, fully-buffered response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// One chunk of a streaming response delivery.
#[derive(Debug, Clone)]
pub struct StreamChunk {
    pub status: Option<u16>,
    pub headers: Option<Vec<(String, String)>>,
    pub data: Bytes,
    pub has_more: bool,
}

/// The async request executor the core depends on. An embedding host wires
/// this to its actual socket/TLS stack; this crate never opens a connection
/// itself.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a request to completion and return the fully-buffered
    /// response, or a transport-level failure (connection refused, TLS
    /// failure, transport shutdown, ...).
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String>;

    /// Execute a request, invoking `on_chunk` once per arriving chunk. The
    /// default implementation degrades to a single chunk via [`Self::execute`];
    /// transports with real streaming support should override it.
    async fn execute_streaming(
        &self,
        request: HttpRequest,
        on_chunk: &mut (dyn FnMut(StreamChunk) + Send),
    ) -> Result<(), String> {
        let response = self.execute(request).await?;
        on_chunk(StreamChunk {
            status: Some(response.status),
            headers: Some(response.headers),
            data: response.body,
            has_more: false,
        });
        Ok(())
    }
}
