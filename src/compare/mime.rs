/// Media types the server can extract comparable text from
pub const COMPARABLE_MIME_TYPES: [&str; 12] = [
    "text/plain",
    "text/markdown",
    "text/html",
    "application/xml",
    "text/xml",
    "application/json",
    "text/csv",
    "application/javascript",
    "text/javascript",
    "text/x-python",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/pdf",
];

/// Exact, case-sensitive membership in [`COMPARABLE_MIME_TYPES`].
pub fn is_comparable(mime_type: Option<&str>) -> bool {
    mime_type.is_some_and(|mime| COMPARABLE_MIME_TYPES.contains(&mime))
}
