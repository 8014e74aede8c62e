//! # htmldiff
//!
//! Token-level diffing of text and HTML fragments, rendered as markup with
//! `<del>`/`<ins>` (or any other) markers around the changes.
//!
//! ## Core Concepts
//!
//! - **Tokenizers**: Split text into words, whitespace runs, tags, entities,
//!   URLs and single characters, losslessly
//! - **Alignment**: Find the longest common token runs and classify the gaps
//!   as insertions, deletions and replacements
//! - **Merge pass**: Fold short unchanged runs into neighbouring edits
//! - **Rendering**: Wrap changed runs in markers without ever splitting a tag
//!
//! ## Example
//!
//! ```rust
//! use htmldiff_core::{diff, diff_with, DiffConfig, RenderStyle};
//!
//! assert_eq!(diff("a b c", "a c"), r#"a <del class="diffdel">b </del>c"#);
//!
//! let config = DiffConfig::new().with_style(RenderStyle::new());
//! assert_eq!(diff_with("a b c", "a d c", &config), "a <del>b</del><ins>d</ins> c");
//! ```

pub mod algorithm;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod normalizers;
pub mod render;
pub mod style;
pub mod tokenizers;

// Re-export main types
pub use algorithm::align;
pub use config::{DiffConfig, DiffOptions, MergeThreshold};
pub use diff::{DiffResult, DiffStatistics, Match, OpKind, Operation};
pub use engine::DiffEngine;
pub use error::{Error, Result};
pub use render::{render, Formatter, HtmlFormatter};
pub use style::{ClassList, RenderStyle};
pub use tokenizers::{HtmlTokenizer, Token, TokenKind, Tokenizer};

/// Diff two strings with the default configuration and render the result
pub fn diff(old: &str, new: &str) -> String {
    DiffEngine::default().diff(old, new)
}

/// Diff two strings with the given configuration and render the result
pub fn diff_with(old: &str, new: &str, config: &DiffConfig) -> String {
    DiffEngine::new(config.clone()).diff(old, new)
}

/// Compute the diff between two strings without rendering it
///
/// # Example
///
/// ```rust
/// use htmldiff_core::compute_diff;
///
/// let result = compute_diff("Hello World", "Hello Rust", None);
/// assert_eq!(result.statistics.replacements, 1);
/// println!("{}", result.summary());
/// ```
pub fn compute_diff(old: &str, new: &str, config: Option<DiffConfig>) -> DiffResult {
    let config = config.unwrap_or_default();
    DiffEngine::new(config).compute(old, new)
}
