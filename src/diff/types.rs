#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Added,
    Removed,
    Unchanged,
}

/// One line of a line-level diff, with its 1-based position on each side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    pub content: String,
    pub left_number: Option<usize>,
    pub right_number: Option<usize>,
}

/// Rows of the side-by-side view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffRow {
    Unchanged(DiffLine),
    /// A removed block on the left facing the added block that replaced it
    Changed(Vec<DiffLine>, Vec<DiffLine>),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub added_lines: usize,
    pub removed_lines: usize,
    pub added_chars: usize,
    pub removed_chars: usize,
}
