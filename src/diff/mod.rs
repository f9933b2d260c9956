//! Line-level diff of two compared versions, shaped for a side-by-side view.

mod stats;
mod types;

use crate::document::ComparisonResult;
use similar::{ChangeTag, TextDiff};

pub use stats::calculate_stats;
pub use types::{DiffLine, DiffRow, DiffStats, LineKind};

/// Everything the compare screen renders for one [`ComparisonResult`]
#[derive(Debug, Clone)]
pub struct DiffView {
    pub left_title: String,
    pub right_title: String,
    pub rows: Vec<DiffRow>,
    pub stats: DiffStats,
}

impl DiffView {
    pub fn from_result(result: &ComparisonResult) -> Self {
        let lines = compute_diff(&result.left_file.text, &result.right_file.text);
        let rows = group_into_rows(&lines);
        let stats = calculate_stats(&rows);
        Self {
            left_title: format!("{} (Left Version)", result.left_file.name),
            right_title: format!("{} (Right Version)", result.right_file.name),
            rows,
            stats,
        }
    }

    pub fn is_identical(&self) -> bool {
        self.rows.iter().all(|row| matches!(row, DiffRow::Unchanged(_)))
    }
}

/// Compute line-based diff between old and new text
pub fn compute_diff(old: &str, new: &str) -> Vec<DiffLine> {
    let diff = TextDiff::from_lines(old, new);
    let mut lines = Vec::new();
    let (mut left_number, mut right_number) = (0usize, 0usize);

    for change in diff.iter_all_changes() {
        let content = change.to_string().trim_end_matches(['\n', '\r']).to_string();
        let line = match change.tag() {
            ChangeTag::Delete => {
                left_number += 1;
                DiffLine {
                    kind: LineKind::Removed,
                    content,
                    left_number: Some(left_number),
                    right_number: None,
                }
            }
            ChangeTag::Insert => {
                right_number += 1;
                DiffLine {
                    kind: LineKind::Added,
                    content,
                    left_number: None,
                    right_number: Some(right_number),
                }
            }
            ChangeTag::Equal => {
                left_number += 1;
                right_number += 1;
                DiffLine {
                    kind: LineKind::Unchanged,
                    content,
                    left_number: Some(left_number),
                    right_number: Some(right_number),
                }
            }
        };
        lines.push(line);
    }

    lines
}

/// Group diff lines into rows: unchanged lines stand alone, a removed block is
/// paired with the added block that directly follows it.
pub fn group_into_rows(lines: &[DiffLine]) -> Vec<DiffRow> {
    let mut rows = Vec::new();
    let mut i = 0usize;

    while i < lines.len() {
        match lines[i].kind {
            LineKind::Unchanged => {
                rows.push(DiffRow::Unchanged(lines[i].clone()));
                i += 1;
            }
            LineKind::Removed | LineKind::Added => {
                let mut removed = Vec::new();
                while i < lines.len() && lines[i].kind == LineKind::Removed {
                    removed.push(lines[i].clone());
                    i += 1;
                }
                let mut added = Vec::new();
                while i < lines.len() && lines[i].kind == LineKind::Added {
                    added.push(lines[i].clone());
                    i += 1;
                }
                rows.push(DiffRow::Changed(removed, added));
            }
        }
    }

    rows
}
