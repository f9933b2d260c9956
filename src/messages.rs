use crate::backend::api_client::ApiError;
use crate::compare::Ticket;
use crate::document::{
    AuthToken, ComparisonResult, Document, FileId, ShareReceipt, UploadReceipt,
};
use std::path::PathBuf;

/// Which listing a `FilesLoaded` response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Owned,
    Shared,
}

/// Response messages from background operations
#[derive(Debug)]
pub enum ResponseMessage {
    LoggedIn {
        email: String,
        result: Result<AuthToken, ApiError>,
    },
    FilesLoaded {
        listing: Listing,
        result: Result<Vec<Document>, ApiError>,
    },
    DocumentLoaded {
        ticket: Ticket,
        file_id: FileId,
        result: Result<Document, ApiError>,
    },
    DiffLoaded {
        ticket: Ticket,
        result: Result<ComparisonResult, ApiError>,
    },
    Uploaded(Result<UploadReceipt, ApiError>),
    Shared(Result<ShareReceipt, ApiError>),
    /// `listing` is the screen the download was started from. `Ok(None)` when
    /// the user dismissed the save dialog.
    Downloaded {
        listing: Listing,
        result: Result<Option<PathBuf>, ApiError>,
    },
    UploadFilePicked(Option<PathBuf>),
}
