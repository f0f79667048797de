//! A single in-flight or pending multipart part.

use bytes::Bytes;

/// Lifecycle of one part slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartState {
    Pending,
    Started,
    Completed,
    Canceled,
}

/// One part of the overall object. `owns_data` mirrors the source's
/// discriminator for whether a part holds a private copy (tail slice taken
/// when the coordinator's buffer was about to be recycled) or borrows from
/// the coordinator's retained buffer via a cheap `Bytes` slice.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub data: Bytes,
    pub owns_data: bool,
    pub part_number: u32,
    pub retry_remaining: u8,
    pub slot_index: u8,
    pub state: PartState,
}

impl UploadPart {
    pub fn new(data: Bytes, owns_data: bool, part_number: u32, retry_remaining: u8, slot_index: u8) -> Self {
        Self { data, owns_data, part_number, retry_remaining, slot_index, state: PartState::Pending }
    }

    /// Mark canceled and drop the owned copy, if any, freeing it eagerly
    /// rather than waiting on the slot's next reuse.
    pub fn cancel(&mut self) {
        self.state = PartState::Canceled;
        if self.owns_data {
            self.data = Bytes::new();
        }
    }
}
