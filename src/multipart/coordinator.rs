//! The multipart upload coordinator: a state machine driving
//! initiate/part/commit/abort over a bounded pipeline of concurrent part
//! uploads, with backpressure and retry.
//!
//! Completions are routed back from spawned per-request tasks through an
//! unbounded mpsc channel rather than being awaited inline. This is what
//! lets many parts be in flight at once while `send_request_data` itself
//! never blocks on the network.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::credentials::{Acl, Credentials};
use crate::error::S3Error;
use crate::executor::{self, CommitOutcome, DeleteOutcome, PartOutcome, SimpleRequest, UploadOutcome};
use crate::signer::RequestSigner;
use crate::transport::HttpTransport;
use crate::types::Method;

use super::options::MultiPartUploadOptions;
use super::part::{PartState, UploadPart};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoordinatorState {
    WaitStreamCheck,
    NotStarted,
    SinglefileStarted,
    MultipartStarted,
    MultipartCompleted,
    Finished,
}

/// Terminal result delivered exactly once per upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartResult {
    Success,
    Failure { code: String, message: String },
}

/// Context-erased progress callback. Implementations should be cheap, since
/// they run inline on whichever task drains the completion channel.
pub trait UploadObserver: Send + Sync {
    fn on_part_completed(&self, _part_number: u32, _etag: &str) {}
    fn on_result(&self, _result: &MultipartResult) {}
}

/// An observer that does nothing; the default when the caller doesn't need
/// progress notifications.
pub struct NoopObserver;
impl UploadObserver for NoopObserver {}

enum PartEvent {
    PartDone { slot_index: u8, part_number: u32, outcome: PartOutcome },
    CommitDone(CommitOutcome),
    AbortDone(DeleteOutcome),
    SingleFileDone(UploadOutcome),
}

fn full_mask_for(queue_size: u8) -> u64 {
    if queue_size >= 64 {
        u64::MAX
    } else {
        (1u64 << queue_size) - 1
    }
}

/// Surface the `{code, message}` an S3 endpoint actually reported, for the
/// variants that carry one. The `ERR_S3_*` taxonomy identifier from
/// [`S3Error::code`] is reserved for transport/signing failures, which have
/// no parsed S3 error body to report instead.
fn failure_code_and_message(err: S3Error) -> (String, String) {
    match err {
        S3Error::Protocol { code, message } | S3Error::Semantic { code, message } => (code, message),
        other => (other.code().to_owned(), other.to_string()),
    }
}

/// Drives one logical object upload through either the single-file path or
/// the full multipart lifecycle, depending on how much data arrives before
/// end-of-stream.
///
/// `send_request_data` is the producer-facing entry point; it never blocks
/// on network I/O and returns `true` when the caller should pause (all
/// part slots are occupied) until [`Self::await_capacity`] resolves. Call
/// [`Self::finish`] after the final `send_request_data(_, true)` to drive
/// the upload to a terminal [`MultipartResult`].
pub struct MultipartUpload {
    credentials: Arc<Credentials>,
    signer: Arc<RequestSigner>,
    transport: Arc<dyn HttpTransport>,
    path: String,
    proxy_url: Option<String>,
    content_type: Option<String>,
    acl: Option<Acl>,
    options: MultiPartUploadOptions,
    observer: Arc<dyn UploadObserver>,

    state: CoordinatorState,
    upload_id: Option<String>,
    current_part_number: u32,
    buffered: BytesMut,
    ended: bool,
    available_mask: u64,
    slots: Vec<Option<UploadPart>>,
    multipart_etags: BTreeMap<u32, String>,

    commit_dispatched: bool,
    commit_retry_used: u8,
    singlefile_retry_used: u8,
    singlefile_body: Option<Bytes>,
    rollback_retry_remaining: u8,
    final_result: Option<MultipartResult>,

    events_tx: mpsc::UnboundedSender<PartEvent>,
    events_rx: mpsc::UnboundedReceiver<PartEvent>,
}

impl MultipartUpload {
    pub fn new(
        credentials: Arc<Credentials>,
        signer: Arc<RequestSigner>,
        transport: Arc<dyn HttpTransport>,
        path: impl Into<String>,
        options: MultiPartUploadOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let queue_size = options.queue_size() as usize;
        Self {
            credentials,
            signer,
            transport,
            path: path.into(),
            proxy_url: None,
            content_type: None,
            acl: None,
            available_mask: full_mask_for(options.queue_size()),
            options,
            observer: Arc::new(NoopObserver),
            state: CoordinatorState::WaitStreamCheck,
            upload_id: None,
            current_part_number: 1,
            buffered: BytesMut::new(),
            ended: false,
            slots: vec![None; queue_size],
            multipart_etags: BTreeMap::new(),
            commit_dispatched: false,
            commit_retry_used: 0,
            singlefile_retry_used: 0,
            singlefile_body: None,
            rollback_retry_remaining: 0,
            final_result: None,
            events_tx,
            events_rx,
        }
    }

    pub fn with_proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_acl(mut self, acl: Acl) -> Self {
        self.acl = Some(acl);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn UploadObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Release the `wait_stream_check` latch. Harmless (a no-op) once data
    /// has already started flowing.
    pub fn continue_stream(&mut self) {
        if self.state == CoordinatorState::WaitStreamCheck {
            self.state = CoordinatorState::NotStarted;
        }
    }

    /// Push one chunk of producer data; `is_last` marks end-of-stream
    /// (possibly with an empty `chunk`). Returns `true` if every part slot
    /// is occupied and the producer should pause.
    pub async fn send_request_data(&mut self, chunk: Bytes, is_last: bool) -> Result<bool, S3Error> {
        if self.state == CoordinatorState::Finished {
            return Ok(false);
        }
        if self.state == CoordinatorState::WaitStreamCheck {
            self.state = CoordinatorState::NotStarted;
        }

        self.drain_events_nonblocking().await?;

        if !chunk.is_empty() {
            self.buffered.extend_from_slice(&chunk);
        }
        if is_last {
            self.ended = true;
        }

        if self.state == CoordinatorState::NotStarted
            && self.ended
            && (self.buffered.len() as u64) < self.options.part_size_bytes()
        {
            self.run_singlefile().await;
            return Ok(false);
        }

        self.pump().await
    }

    /// Wait for either a free slot or the upload to reach a terminal state.
    /// Call after `send_request_data` returns `true`.
    pub async fn await_capacity(&mut self) -> Result<(), S3Error> {
        if self.final_result.is_some() || self.available_mask != 0 {
            return Ok(());
        }
        match self.events_rx.recv().await {
            Some(event) => self.handle_event(event).await,
            None => Ok(()),
        }
    }

    /// Drain remaining completions until the upload reaches a terminal
    /// state. Call after the final `send_request_data(_, true)`.
    pub async fn finish(&mut self) -> Result<MultipartResult, S3Error> {
        self.drain_events_nonblocking().await?;
        loop {
            if let Some(result) = self.final_result.clone() {
                return Ok(result);
            }
            match self.events_rx.recv().await {
                Some(event) => self.handle_event(event).await?,
                None => return Err(S3Error::AlreadyFinished),
            }
        }
    }

    fn acquire_slot(&mut self) -> Option<u8> {
        if self.available_mask == 0 {
            return None;
        }
        let idx = self.available_mask.trailing_zeros() as u8;
        self.available_mask &= !(1u64 << idx);
        Some(idx)
    }

    fn release_slot(&mut self, idx: u8) {
        self.available_mask |= 1u64 << idx;
    }

    fn full_mask(&self) -> u64 {
        full_mask_for(self.options.queue_size())
    }

    async fn drain_events_nonblocking(&mut self) -> Result<(), S3Error> {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event).await?;
        }
        Ok(())
    }

    /// Advance the state machine: initiate the multipart upload if enough
    /// data has accumulated, slice and dispatch as many parts as there are
    /// free slots, and attempt commit once every part has landed. Returns
    /// `true` if dispatch stalled on backpressure.
    async fn pump(&mut self) -> Result<bool, S3Error> {
        if self.state == CoordinatorState::Finished {
            return Ok(false);
        }

        let part_size = self.options.part_size_bytes() as usize;
        let have_enough = self.buffered.len() >= part_size || (self.ended && !self.buffered.is_empty());

        if self.state == CoordinatorState::NotStarted && have_enough {
            self.initiate_multipart().await?;
        }

        let mut backpressure = false;
        if matches!(self.state, CoordinatorState::MultipartStarted | CoordinatorState::MultipartCompleted) {
            loop {
                let available = self.buffered.len();
                let take_full = available >= part_size;
                let take_tail = self.ended && available > 0 && !take_full;
                if !take_full && !take_tail {
                    break;
                }
                let len = if take_full { part_size } else { available };
                let slot_index = match self.acquire_slot() {
                    Some(idx) => idx,
                    None => {
                        backpressure = true;
                        break;
                    }
                };
                let data = self.buffered.split_to(len).freeze();
                self.dispatch_part(slot_index, data);
            }
        }

        self.try_commit();
        Ok(backpressure)
    }

    async fn initiate_multipart(&mut self) -> Result<(), S3Error> {
        self.state = CoordinatorState::MultipartStarted;
        debug!(path = %self.path, "not_started -> multipart_started");

        let mut request = SimpleRequest::new(&self.path, Method::Post);
        request.search_params = Some("uploads=".to_owned());
        request.content_type = self.content_type.clone();
        request.acl = self.acl;
        request.proxy_url = self.proxy_url.clone();

        match executor::initiate_multipart(
            self.signer.as_ref(),
            self.transport.as_ref(),
            self.credentials.as_ref(),
            &request,
        )
        .await
        {
            Ok(upload_id) => {
                debug!(upload_id = %upload_id, "multipart_started -> multipart_completed");
                self.upload_id = Some(upload_id);
                self.state = CoordinatorState::MultipartCompleted;
                Ok(())
            }
            Err(err) => {
                error!(path = %self.path, error = %err, "failed to initiate multipart upload");
                self.fail_upload(err);
                Ok(())
            }
        }
    }

    fn dispatch_part(&mut self, slot_index: u8, data: Bytes) {
        let part_number = self.current_part_number;
        self.current_part_number += 1;

        let mut part = UploadPart::new(data.clone(), true, part_number, self.options.retry(), slot_index);
        part.state = PartState::Started;
        self.slots[slot_index as usize] = Some(part);

        self.spawn_part_attempt(slot_index, part_number, data);
    }

    fn spawn_part_attempt(&self, slot_index: u8, part_number: u32, data: Bytes) {
        let signer = self.signer.clone();
        let transport = self.transport.clone();
        let credentials = self.credentials.clone();
        let path = self.path.clone();
        let proxy_url = self.proxy_url.clone();
        let upload_id = self.upload_id.clone().expect("upload id is set before any part is dispatched");
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let mut request = SimpleRequest::new(&path, Method::Put);
            request.search_params = Some(format!("partNumber={part_number}&uploadId={upload_id}&x-id=UploadPart"));
            request.body = data;
            request.proxy_url = proxy_url;

            let outcome =
                executor::part(signer.as_ref(), transport.as_ref(), credentials.as_ref(), &request).await;
            let _ = tx.send(PartEvent::PartDone { slot_index, part_number, outcome });
        });
    }

    fn spawn_commit(&mut self) {
        self.commit_dispatched = true;
        let body = self.build_commit_body();

        let signer = self.signer.clone();
        let transport = self.transport.clone();
        let credentials = self.credentials.clone();
        let path = self.path.clone();
        let proxy_url = self.proxy_url.clone();
        let upload_id = self.upload_id.clone().expect("upload id is set before commit");
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let mut request = SimpleRequest::new(&path, Method::Post);
            request.search_params = Some(format!("uploadId={upload_id}"));
            request.body = Bytes::from(body);
            request.proxy_url = proxy_url;

            let outcome = executor::commit(signer.as_ref(), transport.as_ref(), credentials.as_ref(), &request).await;
            let _ = tx.send(PartEvent::CommitDone(outcome));
        });
    }

    fn spawn_abort(&mut self) {
        let Some(upload_id) = self.upload_id.clone() else { return };
        warn!(upload_id = %upload_id, retries_left = self.rollback_retry_remaining, "aborting multipart upload");
        let signer = self.signer.clone();
        let transport = self.transport.clone();
        let credentials = self.credentials.clone();
        let path = self.path.clone();
        let proxy_url = self.proxy_url.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let mut request = SimpleRequest::new(&path, Method::Delete);
            request.search_params = Some(format!("uploadId={upload_id}"));
            request.proxy_url = proxy_url;

            let outcome = executor::delete(signer.as_ref(), transport.as_ref(), credentials.as_ref(), &request).await;
            let _ = tx.send(PartEvent::AbortDone(outcome));
        });
    }

    async fn run_singlefile(&mut self) {
        self.state = CoordinatorState::SinglefileStarted;
        let data = self.buffered.split().freeze();
        self.singlefile_body = Some(data.clone());
        self.spawn_singlefile(data);
    }

    fn spawn_singlefile(&self, data: Bytes) {
        let signer = self.signer.clone();
        let transport = self.transport.clone();
        let credentials = self.credentials.clone();
        let path = self.path.clone();
        let proxy_url = self.proxy_url.clone();
        let content_type = self.content_type.clone();
        let acl = self.acl;
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let mut request = SimpleRequest::new(&path, Method::Put);
            request.content_type = content_type;
            request.acl = acl;
            request.body = data;
            request.proxy_url = proxy_url;

            let outcome = executor::upload(signer.as_ref(), transport.as_ref(), credentials.as_ref(), &request).await;
            let _ = tx.send(PartEvent::SingleFileDone(outcome));
        });
    }

    fn try_commit(&mut self) {
        if self.state != CoordinatorState::MultipartCompleted {
            return;
        }
        if self.commit_dispatched || !self.ended || self.available_mask != self.full_mask() {
            return;
        }
        self.spawn_commit();
    }

    fn build_commit_body(&self) -> String {
        let mut body = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><CompleteMultipartUpload xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">",
        );
        for (part_number, etag) in &self.multipart_etags {
            body.push_str(&format!("<Part><PartNumber>{part_number}</PartNumber><ETag>{etag}</ETag></Part>"));
        }
        body.push_str("</CompleteMultipartUpload>");
        body
    }

    fn cancel_pending_parts(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.cancel();
        }
        self.buffered.clear();
    }

    fn fail_upload(&mut self, err: S3Error) {
        if self.state == CoordinatorState::Finished {
            return;
        }
        self.ended = true;
        let had_upload_id = self.upload_id.is_some();
        self.cancel_pending_parts();
        let (code, message) = failure_code_and_message(err);
        self.finish_with(MultipartResult::Failure { code, message });

        if had_upload_id {
            self.rollback_retry_remaining = self.options.retry();
            self.spawn_abort();
        }
    }

    fn finish_with(&mut self, result: MultipartResult) {
        if self.state == CoordinatorState::Finished {
            return;
        }
        match &result {
            MultipartResult::Success => debug!(path = %self.path, "upload finished"),
            MultipartResult::Failure { code, message } => {
                error!(path = %self.path, code = %code, message = %message, "upload finished with failure")
            }
        }
        self.state = CoordinatorState::Finished;
        self.observer.on_result(&result);
        self.final_result = Some(result);
    }

    async fn handle_event(&mut self, event: PartEvent) -> Result<(), S3Error> {
        match event {
            PartEvent::PartDone { slot_index, part_number, outcome } => {
                if self.state == CoordinatorState::Finished {
                    self.slots[slot_index as usize] = None;
                    return Ok(());
                }
                match outcome {
                    PartOutcome::Success { etag } => {
                        self.multipart_etags.insert(part_number, etag.clone());
                        self.observer.on_part_completed(part_number, &etag);
                        self.slots[slot_index as usize] = None;
                        self.release_slot(slot_index);
                        self.pump().await?;
                    }
                    PartOutcome::Failure(err) => {
                        let retry_ok = self.slots[slot_index as usize]
                            .as_mut()
                            .map(|slot| {
                                if slot.retry_remaining > 0 {
                                    slot.retry_remaining -= 1;
                                    true
                                } else {
                                    false
                                }
                            })
                            .unwrap_or(false);

                        if retry_ok {
                            warn!(part_number, error = %err, "part upload failed, retrying");
                            let data = self.slots[slot_index as usize].as_ref().unwrap().data.clone();
                            self.spawn_part_attempt(slot_index, part_number, data);
                        } else {
                            error!(part_number, error = %err, "part upload exhausted retries");
                            self.fail_upload(err);
                        }
                    }
                }
                Ok(())
            }
            PartEvent::CommitDone(outcome) => {
                if self.state == CoordinatorState::Finished {
                    return Ok(());
                }
                match outcome {
                    CommitOutcome::Success => self.finish_with(MultipartResult::Success),
                    CommitOutcome::Failure(err) => {
                        if self.commit_retry_used < self.options.retry() {
                            warn!(error = %err, "commit failed, retrying");
                            self.commit_retry_used += 1;
                            self.commit_dispatched = false;
                            self.spawn_commit();
                        } else {
                            error!(error = %err, "commit exhausted retries");
                            self.fail_upload(err);
                        }
                    }
                }
                Ok(())
            }
            PartEvent::AbortDone(outcome) => {
                if matches!(outcome, DeleteOutcome::Failure(_)) && self.rollback_retry_remaining > 0 {
                    self.rollback_retry_remaining -= 1;
                    self.spawn_abort();
                }
                Ok(())
            }
            PartEvent::SingleFileDone(outcome) => {
                if self.state == CoordinatorState::Finished {
                    return Ok(());
                }
                match outcome {
                    UploadOutcome::Success => self.finish_with(MultipartResult::Success),
                    UploadOutcome::Failure(err) => {
                        let body = self.singlefile_body.clone();
                        if self.singlefile_retry_used < self.options.retry() {
                            if let Some(data) = body {
                                self.singlefile_retry_used += 1;
                                self.spawn_singlefile(data);
                            } else {
                                self.fail_upload(err);
                            }
                        } else {
                            self.fail_upload(err);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DefaultSigner;
    use crate::sigkey_cache::SigningKeyCache;
    use crate::transport::{HttpRequest, HttpResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn test_credentials() -> Arc<Credentials> {
        Arc::new(Credentials {
            access_key_id: "AKID".to_owned(),
            secret_access_key: "SECRET".to_owned(),
            region: "us-east-1".to_owned(),
            endpoint: String::new(),
            bucket: "bucket".to_owned(),
            session_token: String::new(),
            insecure_http: false,
        })
    }

    fn test_signer() -> Arc<RequestSigner> {
        Arc::new(RequestSigner::new(Arc::new(SigningKeyCache::new()), Arc::new(DefaultSigner)))
    }

    struct HappyTransport {
        part_counter: AtomicU32,
    }

    #[async_trait]
    impl HttpTransport for HappyTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
            if request.method == Method::Post && request.url.contains("uploads=") {
                return Ok(HttpResponse {
                    status: 200,
                    headers: vec![],
                    body: Bytes::from_static(
                        b"<InitiateMultipartUploadResult><UploadId>test-upload</UploadId></InitiateMultipartUploadResult>",
                    ),
                });
            }
            if request.method == Method::Put && request.url.contains("partNumber=") {
                let n = self.part_counter.fetch_add(1, Ordering::SeqCst) + 1;
                return Ok(HttpResponse {
                    status: 200,
                    headers: vec![("ETag".to_owned(), format!("\"etag-{n}\""))],
                    body: Bytes::new(),
                });
            }
            if request.method == Method::Post && request.url.contains("uploadId=") {
                return Ok(HttpResponse {
                    status: 200,
                    headers: vec![],
                    body: Bytes::from_static(b"<CompleteMultipartUploadResult></CompleteMultipartUploadResult>"),
                });
            }
            // plain single-file PUT
            Ok(HttpResponse { status: 200, headers: vec![], body: Bytes::new() })
        }
    }

    #[tokio::test]
    async fn multipart_happy_path_assembles_sorted_commit() {
        let options = MultiPartUploadOptions::new(2, 5, 2).unwrap();
        let part_size = options.part_size_bytes() as usize;
        let transport: Arc<dyn HttpTransport> = Arc::new(HappyTransport { part_counter: AtomicU32::new(0) });
        let mut upload = MultipartUpload::new(test_credentials(), test_signer(), transport, "/big.bin", options);

        let total = part_size * 2 + 1024;
        let mut sent = 0usize;
        while sent < total {
            let remaining = total - sent;
            let chunk_len = remaining.min(part_size);
            let chunk = Bytes::from(vec![0xABu8; chunk_len]);
            sent += chunk_len;
            let is_last = sent >= total;
            let backpressure = upload.send_request_data(chunk, is_last).await.unwrap();
            if backpressure {
                upload.await_capacity().await.unwrap();
            }
        }

        let result = upload.finish().await.unwrap();
        assert_eq!(result, MultipartResult::Success);
        assert_eq!(upload.multipart_etags.len(), 3);
        let numbers: Vec<_> = upload.multipart_etags.keys().copied().collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    struct FailingPartTransport;

    #[async_trait]
    impl HttpTransport for FailingPartTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
            if request.method == Method::Post && request.url.contains("uploads=") {
                return Ok(HttpResponse {
                    status: 200,
                    headers: vec![],
                    body: Bytes::from_static(
                        b"<InitiateMultipartUploadResult><UploadId>test-upload</UploadId></InitiateMultipartUploadResult>",
                    ),
                });
            }
            if request.method == Method::Put && request.url.contains("partNumber=") {
                return Ok(HttpResponse {
                    status: 500,
                    headers: vec![],
                    body: Bytes::from_static(b"<Error><Code>InternalError</Code><Message>boom</Message></Error>"),
                });
            }
            if request.method == Method::Delete {
                return Ok(HttpResponse { status: 204, headers: vec![], body: Bytes::new() });
            }
            Ok(HttpResponse { status: 200, headers: vec![], body: Bytes::new() })
        }
    }

    #[tokio::test]
    async fn part_failure_with_no_retry_budget_fails_and_rolls_back() {
        let options = MultiPartUploadOptions::new(2, 5, 0).unwrap();
        let part_size = options.part_size_bytes() as usize;
        let transport: Arc<dyn HttpTransport> = Arc::new(FailingPartTransport);
        let mut upload = MultipartUpload::new(test_credentials(), test_signer(), transport, "/big.bin", options);

        upload.send_request_data(Bytes::from(vec![0xCDu8; part_size]), false).await.unwrap();
        upload.send_request_data(Bytes::new(), true).await.unwrap();

        let result = upload.finish().await.unwrap();
        match result {
            MultipartResult::Failure { code, message } => {
                assert_eq!(code, "InternalError");
                assert_eq!(message, "boom");
            }
            MultipartResult::Success => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn tiny_buffer_at_eof_takes_singlefile_path() {
        let options = MultiPartUploadOptions::new(2, 5, 2).unwrap();
        let transport: Arc<dyn HttpTransport> = Arc::new(HappyTransport { part_counter: AtomicU32::new(0) });
        let mut upload = MultipartUpload::new(test_credentials(), test_signer(), transport, "/small.bin", options);

        upload.send_request_data(Bytes::from_static(b"hello world"), true).await.unwrap();
        let result = upload.finish().await.unwrap();
        assert_eq!(result, MultipartResult::Success);
        assert!(upload.multipart_etags.is_empty());
    }
}
