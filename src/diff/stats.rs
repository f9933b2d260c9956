use super::types::{DiffRow, DiffStats};
use similar::{ChangeTag, TextDiff};

/// Line and character counts over the changed rows
pub fn calculate_stats(rows: &[DiffRow]) -> DiffStats {
    let mut stats = DiffStats::default();

    for row in rows {
        if let DiffRow::Changed(left, right) = row {
            stats.removed_lines += left.len();
            stats.added_lines += right.len();

            let left_str: String = left.iter().map(|l| l.content.as_str()).collect();
            let right_str: String = right.iter().map(|r| r.content.as_str()).collect();

            let diff = TextDiff::from_chars(&left_str, &right_str);
            for change in diff.iter_all_changes() {
                match change.tag() {
                    ChangeTag::Insert => stats.added_chars += change.value().chars().count(),
                    ChangeTag::Delete => stats.removed_chars += change.value().chars().count(),
                    ChangeTag::Equal => {}
                }
            }
        }
    }

    stats
}
