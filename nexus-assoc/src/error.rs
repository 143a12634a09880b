//! Errors reported by container operations.
//!
//! Every variant is a programming error on the caller's side: a cursor used
//! with the wrong container, a cursor walked past the end, or a bad tuning
//! parameter or size request. Operations validate their inputs before touching storage, so
//! an `Err` always leaves the container exactly as it was.

use thiserror::Error;

/// Error returned by fallible container operations.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// Dereferenced or advanced past the end position, or retreated before
    /// the first element.
    #[error("cursor is out of range")]
    OutOfRange,

    /// The cursor was produced by a different container.
    #[error("cursor belongs to a different container")]
    ForeignCursor,

    /// The cursor addresses an element that has since been erased.
    #[error("cursor refers to an erased element")]
    StaleCursor,

    /// `last` cannot be reached by advancing from `first`.
    #[error("end of range is not reachable from its start")]
    UnreachableRange,

    /// Max load factor must be finite and strictly positive.
    #[error("invalid max load factor: {0}")]
    InvalidLoadFactor(f32),

    /// Splice destination lies inside the range being moved.
    #[error("splice position lies inside the moved range")]
    PositionInRange,

    /// Requested bucket count past the addressable maximum.
    #[error("bucket count {0} exceeds the addressable maximum")]
    CapacityOverflow(usize),

    /// Bucket index past `bucket_count()`.
    #[error("bucket {bucket} out of range (bucket count {count})")]
    BucketOutOfRange {
        /// The requested bucket.
        bucket: usize,
        /// The current bucket count.
        count: usize,
    },
}

impl Error {
    /// Returns `true` for the out-of-range class of errors.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Error::OutOfRange | Error::BucketOutOfRange { .. } | Error::CapacityOverflow(_)
        )
    }

    /// Returns `true` for the invalid-argument class of errors.
    pub fn is_invalid_argument(&self) -> bool {
        !self.is_out_of_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(Error::OutOfRange.is_out_of_range());
        assert!(Error::BucketOutOfRange { bucket: 4, count: 2 }.is_out_of_range());
        assert!(Error::ForeignCursor.is_invalid_argument());
        assert!(Error::StaleCursor.is_invalid_argument());
        assert!(Error::UnreachableRange.is_invalid_argument());
        assert!(Error::InvalidLoadFactor(0.0).is_invalid_argument());
        assert!(Error::PositionInRange.is_invalid_argument());
        assert!(Error::CapacityOverflow(usize::MAX).is_out_of_range());
    }

    #[test]
    fn display() {
        assert_eq!(
            Error::BucketOutOfRange { bucket: 4, count: 2 }.to_string(),
            "bucket 4 out of range (bucket count 2)"
        );
        assert_eq!(Error::InvalidLoadFactor(-1.0).to_string(), "invalid max load factor: -1");
    }
}
