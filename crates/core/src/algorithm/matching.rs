//! Longest-common-run matching between two token sequences
//!
//! The old sequence is scanned once per sub-range while a multimap of token
//! positions in the new sequence supplies the candidates, so the cost grows
//! with `old.len() × token multiplicity` rather than `old.len() × new.len()`.

use std::collections::HashMap;
use std::ops::Range;

use tracing::trace;

use crate::diff::{Match, OpKind, Operation};
use crate::tokenizers::Token;

/// Positions of every token text in a sequence, ascending per text
#[derive(Debug, Default)]
pub struct TokenIndex<'a> {
    positions: HashMap<&'a str, Vec<usize>>,
}

impl<'a> TokenIndex<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let mut positions: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (i, token) in tokens.iter().enumerate() {
            positions.entry(token.as_str()).or_default().push(i);
        }
        Self { positions }
    }

    /// All positions of `text`, in ascending order
    pub fn positions(&self, text: &str) -> &[usize] {
        self.positions.get(text).map_or(&[], Vec::as_slice)
    }
}

/// Find the longest run of equal tokens within the given sub-ranges
///
/// On ties the run ending at the lowest old index wins, then the lowest new
/// index, which keeps results deterministic for repeated tokens.
pub fn find_longest_match(
    old: &[Token],
    index: &TokenIndex<'_>,
    old_range: Range<usize>,
    new_range: Range<usize>,
) -> Option<Match> {
    let mut best = Match::new(old_range.start, new_range.start, 0);
    // run_length_ending_at[j]: length of the match ending at (previous old index, j)
    let mut run_length_ending_at: HashMap<usize, usize> = HashMap::new();

    for i in old_range {
        let mut next_lengths = HashMap::new();
        let positions = index.positions(old[i].as_str());
        let first = positions.partition_point(|&j| j < new_range.start);

        for &j in &positions[first..] {
            if j >= new_range.end {
                break;
            }
            let length = j
                .checked_sub(1)
                .and_then(|prev| run_length_ending_at.get(&prev))
                .map_or(1, |len| len + 1);
            next_lengths.insert(j, length);

            if length > best.size {
                best = Match::new(i + 1 - length, j + 1 - length, length);
            }
        }

        run_length_ending_at = next_lengths;
    }

    (best.size > 0).then_some(best)
}

/// Collect all matching blocks, left to right
///
/// Splits the ranges before and after each longest match until no common
/// token remains. Pending sub-ranges live on a work stack, so the depth of
/// the split does not grow the call stack.
pub fn find_matching_blocks(old: &[Token], new: &[Token], index: &TokenIndex<'_>) -> Vec<Match> {
    let mut matches = Vec::new();
    let mut pending = vec![(0..old.len(), 0..new.len())];

    while let Some((old_range, new_range)) = pending.pop() {
        if old_range.is_empty() || new_range.is_empty() {
            continue;
        }
        let Some(found) = find_longest_match(old, index, old_range.clone(), new_range.clone())
        else {
            continue;
        };
        trace!(
            old = found.start_in_old,
            new = found.start_in_new,
            size = found.size,
            "longest match"
        );

        pending.push((old_range.start..found.start_in_old, new_range.start..found.start_in_new));
        pending.push((found.end_in_old()..old_range.end, found.end_in_new()..new_range.end));
        matches.push(found);
    }

    // Matches never cross, so ordering by one side orders both
    matches.sort_unstable_by_key(|m| m.start_in_old);
    matches
}

/// Turn matching blocks into a tiling list of operations
///
/// The gap before each match becomes a `Replace`, `Delete` or `Insert`
/// depending on which sides are non-empty; each match becomes an `Equal`.
pub fn operations_from_matches(
    matches: &[Match],
    old_len: usize,
    new_len: usize,
) -> Vec<Operation> {
    let sentinel = Match::new(old_len, new_len, 0);
    let mut operations = Vec::with_capacity(matches.len() * 2 + 1);
    let mut position_in_old = 0;
    let mut position_in_new = 0;

    for m in matches.iter().chain(std::iter::once(&sentinel)) {
        let deleted = position_in_old < m.start_in_old;
        let inserted = position_in_new < m.start_in_new;
        let gap_kind = match (deleted, inserted) {
            (true, true) => Some(OpKind::Replace),
            (true, false) => Some(OpKind::Delete),
            (false, true) => Some(OpKind::Insert),
            (false, false) => None,
        };
        if let Some(kind) = gap_kind {
            operations.push(Operation::new(
                kind,
                position_in_old,
                m.start_in_old,
                position_in_new,
                m.start_in_new,
            ));
        }

        if m.size > 0 {
            operations.push(Operation::equal(m));
        }

        position_in_old = m.end_in_old();
        position_in_new = m.end_in_new();
    }

    operations
}
