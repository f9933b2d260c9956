use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::path::PathBuf;

pub type FileId = u64;
pub type VersionId = u64;

/// A logical file as returned by the `file_versions` endpoints.
///
/// Most fields are optional on the wire: list endpoints and the detail endpoint
/// do not always agree on what they include.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: FileId,
    pub file_name: String,
    pub virtual_path: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Latest version number as reported by the server
    #[serde(default)]
    pub version_number: Option<u32>,
    #[serde(default = "unknown_size")]
    pub file_size: i64,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub versions: Option<Vec<Version>>,
    /// Only present on documents shared with the current user
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

fn unknown_size() -> i64 {
    -1
}

impl Document {
    pub fn can_edit(&self) -> bool {
        self.owner_email.is_none() || self.permissions.iter().any(|p| p == "edit")
    }

    pub fn is_shared(&self) -> bool {
        self.owner_email.is_some()
    }
}

/// One immutable revision of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,
    pub version_number: u32,
    pub virtual_path: String,
}

/// Sort newest first: version number descending, then id descending so equal
/// numbers still have a deterministic order.
pub fn sort_newest_first(versions: &mut [Version]) {
    versions.sort_by_key(|v| (Reverse(v.version_number), Reverse(v.id)));
}

/// The pair of versions currently being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonSelection {
    pub left: VersionId,
    pub right: VersionId,
}

/// One side of a comparison, with the text extracted by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedFile {
    pub id: VersionId,
    pub name: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub left_file: ComparedFile,
    pub right_file: ComparedFile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub token: String,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub name: String,
    pub virtual_path: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: String,
    pub version: u32,
    #[serde(default)]
    pub checksum: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareRequest {
    pub file_id: FileId,
    pub user_email: String,
    pub can_edit: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareReceipt {
    pub message: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}
