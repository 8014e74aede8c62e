//! Merge pass over raw operations
//!
//! Raw alignment output tends to alternate between tiny unchanged runs and
//! edits ("quick" → "slow", " fox ", "jumped" → "hopped"). Reading that is
//! harder than reading one replacement, so short or whitespace-only unchanged
//! runs sitting between related edits are folded into them.

use tracing::trace;

use crate::config::MergeThreshold;
use crate::diff::{OpKind, Operation};
use crate::tokenizers::{join_tokens, Token};

/// Coalesce operations left to right
///
/// A group keeps growing while either
/// - the next operation has the same kind as the group, or
/// - the group is an edit, the next operation is a mergeable `Equal`, and
///   the operation after it is an edit that is a `Replace`, has the group's
///   kind, or follows a `Replace` group.
///
/// An `Insert` and a `Delete` separated by a mergeable run are left apart.
pub fn merge_operations(
    operations: &[Operation],
    old: &[Token],
    threshold: MergeThreshold,
) -> Vec<Operation> {
    let mergeable: Vec<bool> = operations
        .iter()
        .map(|op| op.kind == OpKind::Equal && threshold.allows(&join_tokens(&old[op.old_range()])))
        .collect();

    let mut merged = Vec::with_capacity(operations.len());
    let mut i = 0;

    while i < operations.len() {
        let mut group = operations[i];
        let mut j = i + 1;

        while let Some(next) = operations.get(j) {
            if next.kind == group.kind {
                group = absorb(group, next);
                j += 1;
            } else if group.kind != OpKind::Equal
                && mergeable[j]
                && operations
                    .get(j + 1)
                    .is_some_and(|after| bridges(group.kind, after.kind))
            {
                trace!(
                    old = ?next.old_range(),
                    new = ?next.new_range(),
                    "absorbing unchanged run"
                );
                group = absorb(absorb(group, next), &operations[j + 1]);
                j += 2;
            } else {
                break;
            }
        }

        merged.push(group);
        i = j;
    }

    merged
}

/// Whether an unchanged run between `left` and `right` may be folded away
fn bridges(left: OpKind, right: OpKind) -> bool {
    right != OpKind::Equal && (left == OpKind::Replace || right == OpKind::Replace || left == right)
}

/// Extend `group` through the end of `next`, re-deriving its kind
fn absorb(group: Operation, next: &Operation) -> Operation {
    let start_in_old = group.start_in_old;
    let end_in_old = next.end_in_old;
    let start_in_new = group.start_in_new;
    let end_in_new = next.end_in_new;

    let kind = if start_in_old == end_in_old {
        OpKind::Insert
    } else if start_in_new == end_in_new {
        OpKind::Delete
    } else if group.kind == OpKind::Equal && next.kind == OpKind::Equal {
        OpKind::Equal
    } else {
        OpKind::Replace
    };

    Operation::new(kind, start_in_old, end_in_old, start_in_new, end_in_new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::raw_operations;
    use crate::tokenizers::{HtmlTokenizer, Tokenizer};

    fn merged(old: &str, new: &str, threshold: MergeThreshold) -> Vec<(OpKind, String, String)> {
        let tokenizer = HtmlTokenizer::new();
        let old = tokenizer.tokenize(old);
        let new = tokenizer.tokenize(new);
        let raw = raw_operations(&old, &new);

        merge_operations(&raw, &old, threshold)
            .iter()
            .map(|op| {
                (
                    op.kind,
                    join_tokens(&old[op.old_range()]),
                    join_tokens(&new[op.new_range()]),
                )
            })
            .collect()
    }

    fn op(kind: OpKind, old: &str, new: &str) -> (OpKind, String, String) {
        (kind, old.to_string(), new.to_string())
    }

    #[test]
    fn test_short_run_between_replacements_is_merged() {
        let ops = merged(
            "The quick fox jumped",
            "The slow fox hopped",
            MergeThreshold::default(),
        );
        assert_eq!(
            ops,
            [
                op(OpKind::Equal, "The ", "The "),
                op(OpKind::Replace, "quick fox jumped", "slow fox hopped"),
            ]
        );
    }

    #[test]
    fn test_zero_threshold_merges_only_whitespace() {
        let ops = merged(
            "The quick fox jumped",
            "The slow fox hopped",
            MergeThreshold::Chars(0),
        );
        assert_eq!(
            ops,
            [
                op(OpKind::Equal, "The ", "The "),
                op(OpKind::Replace, "quick", "slow"),
                op(OpKind::Equal, " fox ", " fox "),
                op(OpKind::Replace, "jumped", "hopped"),
            ]
        );

        let ops = merged("a b", "c d", MergeThreshold::Chars(0));
        assert_eq!(ops, [op(OpKind::Replace, "a b", "c d")]);
    }

    #[test]
    fn test_disabled_keeps_raw_operations() {
        let ops = merged("a b", "c d", MergeThreshold::Disabled);
        assert_eq!(
            ops,
            [
                op(OpKind::Replace, "a", "c"),
                op(OpKind::Equal, " ", " "),
                op(OpKind::Replace, "b", "d"),
            ]
        );
    }

    #[test]
    fn test_long_run_is_kept() {
        let ops = merged(
            "one unchanged-segment two",
            "uno unchanged-segment dos",
            MergeThreshold::default(),
        );
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[1], op(OpKind::Equal, " unchanged-segment ", " unchanged-segment "));
    }

    #[test]
    fn test_insert_and_delete_are_not_fused() {
        // Insert " x", Equal " b ", Delete "c "
        let ops = merged("a b c d", "a x b d", MergeThreshold::Chars(5));
        assert_eq!(
            ops,
            [
                op(OpKind::Equal, "a", "a"),
                op(OpKind::Insert, "", " x"),
                op(OpKind::Equal, " b ", " b "),
                op(OpKind::Delete, "c ", ""),
                op(OpKind::Equal, "d", "d"),
            ]
        );
    }

    #[test]
    fn test_same_kind_edits_join_across_small_gap() {
        // Insert " x", Equal " b ", Insert "y "
        let ops = merged("a b c", "a x b y c", MergeThreshold::Chars(5));
        assert_eq!(
            ops,
            [
                op(OpKind::Equal, "a", "a"),
                op(OpKind::Replace, " b ", " x b y "),
                op(OpKind::Equal, "c", "c"),
            ]
        );
    }

    #[test]
    fn test_adjacent_same_kind_operations_concatenate() {
        let raw = [
            Operation::new(OpKind::Insert, 0, 0, 0, 1),
            Operation::new(OpKind::Insert, 0, 0, 1, 3),
            Operation::new(OpKind::Delete, 0, 2, 3, 3),
        ];
        let old = HtmlTokenizer::new().tokenize("a b");

        let ops = merge_operations(&raw, &old, MergeThreshold::Disabled);
        assert_eq!(
            ops,
            [
                Operation::new(OpKind::Insert, 0, 0, 0, 3),
                Operation::new(OpKind::Delete, 0, 2, 3, 3),
            ]
        );
    }

    #[test]
    fn test_chained_merges_extend_replacement() {
        // Replace, " ", Insert, "b", Delete all fold into one replacement
        let raw = [
            Operation::new(OpKind::Replace, 0, 1, 0, 1),
            Operation::new(OpKind::Equal, 1, 2, 1, 2),
            Operation::new(OpKind::Insert, 2, 2, 2, 3),
            Operation::new(OpKind::Equal, 2, 3, 3, 4),
            Operation::new(OpKind::Delete, 3, 4, 4, 4),
        ];
        let old = HtmlTokenizer::new().tokenize("a b c");

        let ops = merge_operations(&raw, &old, MergeThreshold::default());
        assert_eq!(ops, [Operation::new(OpKind::Replace, 0, 4, 0, 4)]);
    }

    #[test]
    fn test_leading_and_trailing_runs_stay_equal() {
        let ops = merged("a b c", "a d c", MergeThreshold::default());
        assert_eq!(
            ops,
            [
                op(OpKind::Equal, "a ", "a "),
                op(OpKind::Replace, "b", "d"),
                op(OpKind::Equal, " c", " c"),
            ]
        );
    }
}
