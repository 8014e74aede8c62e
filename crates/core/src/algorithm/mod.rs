//! Alignment of two token sequences
//!
//! Alignment runs in two passes: `matching` finds the longest common runs and
//! classifies the gaps between them, then `merge` folds small unchanged runs
//! into the surrounding edits.

pub mod matching;
pub mod merge;

pub use matching::{find_longest_match, find_matching_blocks, operations_from_matches, TokenIndex};
pub use merge::merge_operations;

use crate::config::MergeThreshold;
use crate::diff::Operation;
use crate::tokenizers::Token;

/// Operations tiling both sequences, before merging
pub fn raw_operations(old: &[Token], new: &[Token]) -> Vec<Operation> {
    let index = TokenIndex::new(new);
    let matches = find_matching_blocks(old, new, &index);
    operations_from_matches(&matches, old.len(), new.len())
}

/// Align two token sequences into merged operations
///
/// The returned operations are ordered and tile `0..old.len()` and
/// `0..new.len()` without gaps or overlaps.
pub fn align(old: &[Token], new: &[Token], threshold: MergeThreshold) -> Vec<Operation> {
    let raw = raw_operations(old, new);
    merge_operations(&raw, old, threshold)
}
