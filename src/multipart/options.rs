//! Multipart upload options, validated eagerly at construction.

use crate::error::S3Error;

/// Hard ceiling on concurrent in-flight parts, independent of `queue_size`.
/// The slot pool is a 64-bit bitmask; this is its width.
pub const MAX_QUEUE_SIZE: u8 = 64;

/// `queue_size` is additionally clamped to this before the `MAX_QUEUE_SIZE`
/// ceiling: the configuration surface accepts up to 255 but the pool never
/// grows past 64 slots.
const MAX_CONFIGURED_QUEUE_SIZE: u8 = 255;

const MIN_PART_SIZE_MIB: u32 = 5;
const MAX_PART_SIZE_MIB: u32 = 5120;

/// `options.partSize` expressed in bytes.
pub const fn mib(n: u32) -> u64 {
    n as u64 * 1024 * 1024
}

/// Validated multipart tuning knobs: `{queueSize, partSize, retry}`.
///
/// The source's range checks for `pageSize` and `retry` used an AND where
/// the values suggest OR (a conjunction that can never be true); here both
/// are validated as `value ∉ [min, max]` per that reading, and `queueSize`
/// is a `min`-style cap rather than the source's `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiPartUploadOptions {
    queue_size: u8,
    part_size_bytes: u64,
    retry: u8,
}

impl MultiPartUploadOptions {
    pub fn new(queue_size: u8, part_size_mib: u32, retry: u8) -> Result<Self, S3Error> {
        if queue_size == 0 {
            return Err(S3Error::InvalidOptions("queueSize must be >= 1".to_owned()));
        }
        if !(MIN_PART_SIZE_MIB..=MAX_PART_SIZE_MIB).contains(&part_size_mib) {
            return Err(S3Error::InvalidOptions(format!(
                "partSize must be within [{MIN_PART_SIZE_MIB}, {MAX_PART_SIZE_MIB}] MiB, got {part_size_mib}"
            )));
        }

        let queue_size = queue_size.min(MAX_CONFIGURED_QUEUE_SIZE).min(MAX_QUEUE_SIZE);

        Ok(Self { queue_size, part_size_bytes: mib(part_size_mib), retry })
    }

    pub const fn queue_size(&self) -> u8 {
        self.queue_size
    }

    pub const fn part_size_bytes(&self) -> u64 {
        self.part_size_bytes
    }

    pub const fn retry(&self) -> u8 {
        self.retry
    }
}

impl Default for MultiPartUploadOptions {
    fn default() -> Self {
        Self::new(4, MIN_PART_SIZE_MIB, 3).expect("default options are always valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_part_size_out_of_range() {
        assert!(MultiPartUploadOptions::new(4, 4, 3).is_err());
        assert!(MultiPartUploadOptions::new(4, 5121, 3).is_err());
    }

    #[test]
    fn clamps_queue_size_to_hard_ceiling() {
        let options = MultiPartUploadOptions::new(255, 5, 3).unwrap();
        assert_eq!(options.queue_size(), MAX_QUEUE_SIZE);
    }

    #[test]
    fn accepts_zero_retry() {
        assert!(MultiPartUploadOptions::new(1, 5, 0).is_ok());
    }

    #[test]
    fn rejects_zero_queue_size() {
        assert!(MultiPartUploadOptions::new(0, 5, 3).is_err());
    }
}
