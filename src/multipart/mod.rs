//! Multipart upload coordinator: initiate/part/commit/abort lifecycle over
//! a bounded, backpressured pipeline of concurrent part uploads.

mod coordinator;
mod options;
mod part;

pub use coordinator::{MultipartResult, MultipartUpload, NoopObserver, UploadObserver};
pub use options::{MultiPartUploadOptions, MAX_QUEUE_SIZE};
pub use part::{PartState, UploadPart};
