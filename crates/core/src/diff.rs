//! Diff result types and structures

use std::fmt;
use std::ops::Range;

use crate::render::render;
use crate::style::RenderStyle;
use crate::tokenizers::{join_tokens, Token};

/// A contiguous run of tokens present in both sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start_in_old: usize,
    pub start_in_new: usize,
    pub size: usize,
}

impl Match {
    pub fn new(start_in_old: usize, start_in_new: usize, size: usize) -> Self {
        Self {
            start_in_old,
            start_in_new,
            size,
        }
    }

    pub fn end_in_old(&self) -> usize {
        self.start_in_old + self.size
    }

    pub fn end_in_new(&self) -> usize {
        self.start_in_new + self.size
    }
}

/// Kind of edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Content remained unchanged
    Equal,
    /// Content was inserted
    Insert,
    /// Content was deleted
    Delete,
    /// Content was replaced (delete + insert)
    Replace,
}

impl OpKind {
    /// The kind seen from the other side of the diff
    pub fn mirrored(self) -> Self {
        match self {
            OpKind::Insert => OpKind::Delete,
            OpKind::Delete => OpKind::Insert,
            other => other,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpKind::Equal => "equal",
            OpKind::Insert => "insert",
            OpKind::Delete => "delete",
            OpKind::Replace => "replace",
        };
        f.write_str(name)
    }
}

/// A classified edit over token ranges of the old and new sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub kind: OpKind,
    pub start_in_old: usize,
    pub end_in_old: usize,
    pub start_in_new: usize,
    pub end_in_new: usize,
}

impl Operation {
    pub fn new(
        kind: OpKind,
        start_in_old: usize,
        end_in_old: usize,
        start_in_new: usize,
        end_in_new: usize,
    ) -> Self {
        debug_assert!(start_in_old <= end_in_old && start_in_new <= end_in_new);
        debug_assert!(kind != OpKind::Insert || start_in_old == end_in_old);
        debug_assert!(kind != OpKind::Delete || start_in_new == end_in_new);
        Self {
            kind,
            start_in_old,
            end_in_old,
            start_in_new,
            end_in_new,
        }
    }

    /// An `Equal` operation covering a match
    pub fn equal(m: &Match) -> Self {
        Self::new(
            OpKind::Equal,
            m.start_in_old,
            m.end_in_old(),
            m.start_in_new,
            m.end_in_new(),
        )
    }

    pub fn old_range(&self) -> Range<usize> {
        self.start_in_old..self.end_in_old
    }

    pub fn new_range(&self) -> Range<usize> {
        self.start_in_new..self.end_in_new
    }

    /// The same edit seen with old and new swapped
    pub fn mirrored(&self) -> Self {
        Self {
            kind: self.kind.mirrored(),
            start_in_old: self.start_in_new,
            end_in_old: self.end_in_new,
            start_in_new: self.start_in_old,
            end_in_new: self.end_in_old,
        }
    }
}

/// Statistics about the diff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffStatistics {
    /// Number of insert operations
    pub insertions: usize,

    /// Number of delete operations
    pub deletions: usize,

    /// Number of replace operations
    pub replacements: usize,

    /// Number of unchanged runs
    pub unchanged: usize,

    /// Tokens of the old text that were removed or replaced
    pub old_tokens_changed: usize,

    /// Tokens of the new text that were added or replaced
    pub new_tokens_changed: usize,
}

impl DiffStatistics {
    pub fn from_operations(operations: &[Operation]) -> Self {
        let mut stats = Self::default();
        for op in operations {
            match op.kind {
                OpKind::Equal => stats.unchanged += 1,
                OpKind::Insert => stats.insertions += 1,
                OpKind::Delete => stats.deletions += 1,
                OpKind::Replace => stats.replacements += 1,
            }
            if op.kind != OpKind::Equal {
                stats.old_tokens_changed += op.old_range().len();
                stats.new_tokens_changed += op.new_range().len();
            }
        }
        stats
    }

    /// Total number of edits (everything except unchanged runs)
    pub fn edits(&self) -> usize {
        self.insertions + self.deletions + self.replacements
    }
}

/// Complete diff result: both token sequences and the final operations
#[derive(Debug, Clone)]
pub struct DiffResult {
    /// Tokens of the old text
    pub old_tokens: Vec<Token>,

    /// Tokens of the new text
    pub new_tokens: Vec<Token>,

    /// Ordered operations tiling both token sequences
    pub operations: Vec<Operation>,

    /// Statistics about the diff
    pub statistics: DiffStatistics,
}

impl DiffResult {
    pub fn new(old_tokens: Vec<Token>, new_tokens: Vec<Token>, operations: Vec<Operation>) -> Self {
        let statistics = DiffStatistics::from_operations(&operations);
        Self {
            old_tokens,
            new_tokens,
            operations,
            statistics,
        }
    }

    /// Old-side text covered by an operation
    pub fn old_text(&self, op: &Operation) -> String {
        join_tokens(&self.old_tokens[op.old_range()])
    }

    /// New-side text covered by an operation
    pub fn new_text(&self, op: &Operation) -> String {
        join_tokens(&self.new_tokens[op.new_range()])
    }

    /// Render the operations as markup with the given style
    pub fn render(&self, style: &RenderStyle) -> String {
        render(&self.operations, &self.old_tokens, &self.new_tokens, style)
    }

    /// Check if there are no changes
    pub fn is_unchanged(&self) -> bool {
        self.operations.iter().all(|op| op.kind == OpKind::Equal)
    }

    /// Get only the changed operations (exclude Equal)
    pub fn changed_operations(&self) -> Vec<&Operation> {
        self.operations
            .iter()
            .filter(|op| op.kind != OpKind::Equal)
            .collect()
    }

    /// Get a human-readable description of one operation
    pub fn describe(&self, op: &Operation) -> String {
        match op.kind {
            OpKind::Equal => format!("Equal: \"{}\"", self.new_text(op)),
            OpKind::Insert => format!("Insert: \"{}\"", self.new_text(op)),
            OpKind::Delete => format!("Delete: \"{}\"", self.old_text(op)),
            OpKind::Replace => format!(
                "Replace: \"{}\" → \"{}\"",
                self.old_text(op),
                self.new_text(op)
            ),
        }
    }

    /// Get a summary of the diff
    pub fn summary(&self) -> String {
        format!(
            "Diff Summary: {} insertions, {} deletions, {} replacements, {} unchanged runs",
            self.statistics.insertions,
            self.statistics.deletions,
            self.statistics.replacements,
            self.statistics.unchanged,
        )
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Diff Result ===")?;
        writeln!(f, "{}", self.summary())?;
        writeln!(f, "\nOperations:")?;

        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, self.describe(op))?;
        }

        Ok(())
    }
}
