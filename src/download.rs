//! Streaming download task: partial-delivery reads for range-oriented GETs.
//!
//! Holds an HTTP-owned receive path and a reporter-owned buffer guarded by
//! a lock, coalescing multiple chunk arrivals into one consumer wakeup via
//! a single-bit flag. For errors, delivery waits for the final chunk so the
//! XML error body can be parsed before the caller is told anything failed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;

use crate::credentials::Credentials;
use crate::error::S3Error;
use crate::signer::RequestSigner;
use crate::transport::{HttpRequest, HttpTransport, RequestOptions, StreamChunk};
use crate::types::SignOptions;
use crate::xml::parse_error_body;

/// One report delivered to the consumer.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub data: Bytes,
    pub has_more: bool,
    pub error: Option<S3Error>,
}

/// Pushed to as chunks arrive. Implementations should be cheap, since
/// reporting happens on whatever task drains the coalesced buffer.
pub trait DownloadReporter: Send + Sync {
    fn on_report(&self, report: DownloadReport);
}

struct Inner {
    buffer: Mutex<BytesMut>,
    has_schedule_callback: AtomicBool,
    last_status: Mutex<Option<u16>>,
}

/// Drives one streaming GET to completion, coalescing chunk delivery.
pub struct StreamingDownloadTask {
    inner: Arc<Inner>,
    reporter: Arc<dyn DownloadReporter>,
}

impl StreamingDownloadTask {
    pub fn new(reporter: Arc<dyn DownloadReporter>) -> Self {
        Self {
            inner: Arc::new(Inner {
                buffer: Mutex::new(BytesMut::new()),
                has_schedule_callback: AtomicBool::new(false),
                last_status: Mutex::new(None),
            }),
            reporter,
        }
    }

    /// Run the streaming download; resolves once the final report (success
    /// or failure) has been delivered to the reporter.
    pub async fn run(
        self,
        signer: &RequestSigner,
        transport: &dyn HttpTransport,
        credentials: &Credentials,
        path: &str,
        range: Option<(u64, Option<u64>)>,
        proxy_url: Option<String>,
    ) -> Result<(), S3Error> {
        let sign_options = SignOptions::new(path, crate::types::Method::Get);
        let signed = signer.sign(credentials, &sign_options)?;
        let mut headers = signed.headers;
        if let Some((offset, size)) = range {
            headers.push(("Range".to_owned(), range_header(offset, size)));
        }

        let request = HttpRequest {
            method: crate::types::Method::Get,
            url: signed.url,
            headers,
            body: Bytes::new(),
            options: RequestOptions { proxy_url, ..Default::default() },
        };

        let inner = self.inner.clone();
        let reporter = self.reporter.clone();
        let mut on_chunk = move |chunk: StreamChunk| {
            if let Some(status) = chunk.status {
                *inner.last_status.lock() = Some(status);
            }
            inner.buffer.lock().extend_from_slice(&chunk.data);

            if !chunk.has_more {
                Self::flush_final(&inner, &reporter);
                return;
            }

            if inner
                .has_schedule_callback
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                let inner = inner.clone();
                let reporter = reporter.clone();
                tokio::spawn(async move {
                    Self::flush_partial(&inner, &reporter);
                });
            }
        };

        transport
            .execute_streaming(request, &mut on_chunk)
            .await
            .map_err(S3Error::Transport)?;

        Ok(())
    }

    fn flush_partial(inner: &Arc<Inner>, reporter: &Arc<dyn DownloadReporter>) {
        let data = {
            let mut buffer = inner.buffer.lock();
            buffer.split().freeze()
        };
        inner.has_schedule_callback.store(false, Ordering::Release);
        if !data.is_empty() {
            reporter.on_report(DownloadReport { data, has_more: true, error: None });
        }
    }

    fn flush_final(inner: &Arc<Inner>, reporter: &Arc<dyn DownloadReporter>) {
        let data = {
            let mut buffer = inner.buffer.lock();
            buffer.split().freeze()
        };
        let status = (*inner.last_status.lock()).unwrap_or(0);
        let success = matches!(status, 200 | 204 | 206);

        if success {
            reporter.on_report(DownloadReport { data, has_more: false, error: None });
        } else {
            let body = String::from_utf8_lossy(&data);
            let error = parse_error_body(&body, status == 404);
            reporter.on_report(DownloadReport { data: Bytes::new(), has_more: false, error: Some(error) });
        }
    }
}

fn range_header(offset: u64, size: Option<u64>) -> String {
    match size {
        Some(size) => format!("bytes={offset}-{}", offset + size - 1),
        None => format!("bytes={offset}-"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credentials;
    use crate::crypto::DefaultSigner;
    use crate::sigkey_cache::SigningKeyCache;
    use crate::transport::HttpResponse;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    struct ChunkedTransport {
        chunks: Vec<StreamChunk>,
    }

    #[async_trait]
    impl HttpTransport for ChunkedTransport {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, String> {
            unreachable!("streaming test uses execute_streaming")
        }

        async fn execute_streaming(
            &self,
            _request: HttpRequest,
            on_chunk: &mut (dyn FnMut(StreamChunk) + Send),
        ) -> Result<(), String> {
            for chunk in self.chunks.clone() {
                on_chunk(chunk);
            }
            Ok(())
        }
    }

    struct CollectingReporter {
        reports: StdMutex<Vec<DownloadReport>>,
    }

    impl DownloadReporter for CollectingReporter {
        fn on_report(&self, report: DownloadReport) {
            self.reports.lock().unwrap().push(report);
        }
    }

    fn test_credentials() -> Credentials {
        Credentials {
            access_key_id: "AKID".to_owned(),
            secret_access_key: "SECRET".to_owned(),
            region: "us-east-1".to_owned(),
            endpoint: String::new(),
            bucket: "bucket".to_owned(),
            session_token: String::new(),
            insecure_http: false,
        }
    }

    #[tokio::test]
    async fn delivers_final_success_report() {
        let transport = ChunkedTransport {
            chunks: vec![
                StreamChunk { status: Some(206), headers: None, data: Bytes::from_static(b"hello "), has_more: true },
                StreamChunk { status: Some(206), headers: None, data: Bytes::from_static(b"world"), has_more: false },
            ],
        };
        let reporter = Arc::new(CollectingReporter { reports: StdMutex::new(Vec::new()) });
        let signer = RequestSigner::new(Arc::new(SigningKeyCache::new()), Arc::new(DefaultSigner));
        let task = StreamingDownloadTask::new(reporter.clone());

        task.run(&signer, &transport, &test_credentials(), "/key.bin", None, None)
            .await
            .unwrap();

        let reports = reporter.reports.lock().unwrap();
        let last = reports.last().unwrap();
        assert!(!last.has_more);
        assert!(last.error.is_none());
        assert_eq!(&last.data[..], b"world");
    }

    #[tokio::test]
    async fn delivers_parsed_error_on_terminal_failure() {
        let transport = ChunkedTransport {
            chunks: vec![StreamChunk {
                status: Some(404),
                headers: None,
                data: Bytes::from_static(b"<Error><Code>NoSuchKey</Code><Message>nope</Message></Error>"),
                has_more: false,
            }],
        };
        let reporter = Arc::new(CollectingReporter { reports: StdMutex::new(Vec::new()) });
        let signer = RequestSigner::new(Arc::new(SigningKeyCache::new()), Arc::new(DefaultSigner));
        let task = StreamingDownloadTask::new(reporter.clone());

        task.run(&signer, &transport, &test_credentials(), "/key.bin", None, None)
            .await
            .unwrap();

        let reports = reporter.reports.lock().unwrap();
        let last = reports.last().unwrap();
        assert!(!last.has_more);
        assert_eq!(
            last.error,
            Some(S3Error::Protocol { code: "NoSuchKey".to_owned(), message: "nope".to_owned() })
        );
    }
}
