//! Error types
//!
//! Diffing itself never fails: malformed text is handled by the tokenizer's
//! fallback rules. Errors only arise when configuration is loaded from data.

use thiserror::Error;

/// Errors raised while building a diff configuration
#[derive(Debug, Error)]
pub enum Error {
    /// The options document could not be parsed
    #[error("invalid diff options: {0}")]
    Options(#[from] serde_json::Error),

    /// A tag name is not usable as an HTML element name
    #[error("invalid tag name {0:?}: expected an HTML element name such as \"del\" or \"<span>\"")]
    InvalidTagName(String),

    /// A merge threshold value has the wrong shape
    #[error("invalid merge threshold {0:?}: expected an integer, false, or \"disabled\"")]
    InvalidMergeThreshold(String),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
