//! Helpers for the file listing screens.

use crate::document::{Document, Version, sort_newest_first};

/// Highest version number of a listed document. Uses `versions` when the server
/// sent them, otherwise the document's own `version_number`, otherwise 1.
pub fn latest_version_number(doc: &Document) -> u32 {
    doc.versions
        .as_deref()
        .and_then(|versions| versions.iter().map(|v| v.version_number).max())
        .or(doc.version_number)
        .unwrap_or(1)
}

/// Versions offered in a listing row, newest first.
///
/// Without a `versions` array the list is synthesized from `version_number`,
/// and every synthesized entry carries the document's own id. Those ids only
/// identify the latest file; downloads go by revision number so the listing
/// still works, but they must not be used to compare versions.
pub fn versions_for_listing(doc: &Document) -> Vec<Version> {
    match doc.versions.as_deref() {
        Some(versions) if !versions.is_empty() => {
            let mut versions = versions.to_vec();
            sort_newest_first(&mut versions);
            versions
        }
        _ => (1..=doc.version_number.unwrap_or(1))
            .rev()
            .map(|n| Version {
                id: doc.id,
                version_number: n,
                virtual_path: doc.virtual_path.clone(),
            })
            .collect(),
    }
}

/// Revision query value for a download: only set when an older version is picked.
pub fn download_revision(selected: u32, latest: u32) -> Option<u32> {
    (selected != latest).then_some(selected)
}

/// Download link for a virtual path. The server authenticates this route by the
/// `token` query parameter rather than a header.
pub fn download_url(base_url: &str, virtual_path: &str, token: &str, revision: Option<u32>) -> String {
    let mut url = format!(
        "{}/download/{}/?token={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(virtual_path),
        urlencoding::encode(token)
    );
    if let Some(revision) = revision {
        url.push_str(&format!("&revision={revision}"));
    }
    url
}

/// "0 Bytes", "1 KB", "1.5 KB"... with at most two decimals.
pub fn format_file_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes < 0 {
        return "Unknown size".to_string();
    }
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Coarse file category used for list icons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image,
    Word,
    Spreadsheet,
    Archive,
    Text,
}

impl FileKind {
    pub fn from_mime(mime_type: Option<&str>) -> Self {
        let mime = mime_type.unwrap_or_default();
        if mime.contains("pdf") {
            Self::Pdf
        } else if mime.contains("image") {
            Self::Image
        } else if mime.contains("word") {
            Self::Word
        } else if mime.contains("excel") || mime.contains("spreadsheet") {
            Self::Spreadsheet
        } else if mime.contains("zip") || mime.contains("compressed") {
            Self::Archive
        } else {
            Self::Text
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pdf => "📕",
            Self::Image => "🖼",
            Self::Word => "📝",
            Self::Spreadsheet => "📊",
            Self::Archive => "📦",
            Self::Text => "📄",
        }
    }
}
