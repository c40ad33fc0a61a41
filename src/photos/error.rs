use thiserror::Error;

/// Precondition violations in the photo records handed to the normalizer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Photo record #{index} has no size variants")]
    NoVariants { index: usize },

    #[error("Photo record #{index} has an out-of-range capture date: {date}")]
    InvalidDate { index: usize, date: i64 },
}
