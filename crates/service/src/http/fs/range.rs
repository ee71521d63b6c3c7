//! `Range` header parsing for the streaming endpoints.
//!
//! Single inclusive byte range only. Anything else, and anything that
//! does not overlap the file, is reported as unsatisfiable so the client
//! sees a 416 with the real total.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("malformed range header")]
    Malformed,
    #[error("range does not overlap the resource")]
    Unsatisfiable,
}

/// Parse a `Range` header value against a resource of `size` bytes.
///
/// Accepts `bytes=start-end` and `bytes=start-` (suffix-less open end).
/// The end is clamped to the last byte; a start at or past the end of
/// the file is unsatisfiable rather than malformed.
pub fn parse(value: &str, size: u64) -> Result<ByteRange, RangeError> {
    let spec = value.strip_prefix("bytes=").ok_or(RangeError::Malformed)?;
    if spec.contains(',') {
        // multi-range requests are not served
        return Err(RangeError::Malformed);
    }
    let (start, end) = spec.split_once('-').ok_or(RangeError::Malformed)?;

    let start: u64 = start.trim().parse().map_err(|_| RangeError::Malformed)?;
    let end = match end.trim() {
        "" => size.saturating_sub(1),
        explicit => explicit.parse().map_err(|_| RangeError::Malformed)?,
    };
    let end = end.min(size.saturating_sub(1));

    if size == 0 || start >= size || start > end {
        return Err(RangeError::Unsatisfiable);
    }
    Ok(ByteRange { start, end })
}
