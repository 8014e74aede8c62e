//! Main diff engine that orchestrates the entire diff process

use tracing::debug;

use crate::algorithm::{merge_operations, raw_operations};
use crate::config::DiffConfig;
use crate::diff::DiffResult;
use crate::render::HtmlFormatter;
use crate::tokenizers::{HtmlTokenizer, Token, Tokenizer};

/// The main diff engine
///
/// An engine holds no per-call state, so one instance can be shared between
/// threads and reused for any number of diffs.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    config: DiffConfig,
}

impl DiffEngine {
    /// Create a new diff engine with the given configuration
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compute the operations between two strings
    ///
    /// 1. Tokenize both texts with the same tokenizer
    /// 2. Find matching runs and classify the gaps
    /// 3. Merge short unchanged runs into neighbouring edits
    pub fn compute(&self, old: &str, new: &str) -> DiffResult {
        let (old_tokens, new_tokens) = self.tokenize(old, new);
        self.compute_tokens(old_tokens, new_tokens)
    }

    /// Compute the diff and render it
    pub fn diff(&self, old: &str, new: &str) -> String {
        let result = self.compute(old, new);
        self.format(&result)
    }

    /// Diff raw bytes, replacing invalid UTF-8 with U+FFFD
    pub fn diff_bytes(&self, old: &[u8], new: &[u8]) -> String {
        self.diff(&String::from_utf8_lossy(old), &String::from_utf8_lossy(new))
    }

    /// Render a result with the configured formatter
    pub fn format(&self, result: &DiffResult) -> String {
        let formatter = self
            .config
            .formatter
            .clone()
            .unwrap_or_else(|| Box::new(HtmlFormatter::new(self.config.style.clone())));
        debug!(formatter = formatter.name(), "rendering diff");

        formatter.format(&result.operations, &result.old_tokens, &result.new_tokens)
    }

    fn tokenize(&self, old: &str, new: &str) -> (Vec<Token>, Vec<Token>) {
        let default_tokenizer;
        let tokenizer: &dyn Tokenizer = match &self.config.tokenizer {
            Some(tokenizer) => tokenizer.as_ref(),
            None => {
                default_tokenizer = HtmlTokenizer::new();
                &default_tokenizer
            }
        };

        let old_tokens = tokenizer.tokenize(old);
        let new_tokens = tokenizer.tokenize(new);
        debug!(
            tokenizer = tokenizer.name(),
            old = old_tokens.len(),
            new = new_tokens.len(),
            "tokenized inputs"
        );

        (old_tokens, new_tokens)
    }

    fn compute_tokens(&self, old_tokens: Vec<Token>, new_tokens: Vec<Token>) -> DiffResult {
        let raw = raw_operations(&old_tokens, &new_tokens);
        let operations = merge_operations(&raw, &old_tokens, self.config.merge_threshold);
        debug!(
            raw = raw.len(),
            merged = operations.len(),
            threshold = ?self.config.merge_threshold,
            "aligned tokens"
        );

        DiffResult::new(old_tokens, new_tokens, operations)
    }
}
