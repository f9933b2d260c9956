//! Version comparison view state.
//!
//! [`VersionComparator`] owns everything the compare screen shows and decides
//! which requests to issue. It performs no I/O: callers execute the returned
//! [`CompareRequest`]s and feed the outcomes back with the same ticket. Only the
//! most recently issued ticket is accepted, so a slow response for an old
//! selection can never overwrite a newer one.

pub mod mime;
pub mod selection;

use crate::document::{
    ComparisonResult, ComparisonSelection, Document, FileId, Version, VersionId,
    sort_newest_first,
};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use mime::{COMPARABLE_MIME_TYPES, is_comparable};
pub use selection::{default_selection, latest_version_number, version_label};

pub type Ticket = u64;

/// Tickets are unique across every comparator in the process, so a response
/// issued by one view can never match a ticket awaited by a later one.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

pub const NO_VERSIONS_MESSAGE: &str = "No versions available for comparison.";

/// Work the owner of a comparator must carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareRequest {
    LoadDocument { ticket: Ticket, file_id: FileId },
    FetchDiff { ticket: Ticket, selection: ComparisonSelection },
}

impl CompareRequest {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::LoadDocument { ticket, .. } | Self::FetchDiff { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareState {
    Idle,
    LoadingDocument,
    DocumentError,
    NoVersions,
    VersionsLoaded,
    Unsupported,
    ComparingVersions,
    CompareError,
    CompareReady,
}

/// User-facing failures of the compare view
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparatorError {
    #[error("Could not load file details.")]
    Load,

    #[error("Could not compare the selected versions. The files may not support text comparison.")]
    Compare,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No versions are loaded")]
    NotLoaded,

    #[error("Version {0} does not belong to this document")]
    UnknownVersion(VersionId),

    #[error("Version {0} is already selected on the other side")]
    SameVersion(VersionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug)]
pub struct VersionComparator {
    state: CompareState,
    file_id: Option<FileId>,
    document: Option<Document>,
    /// Newest first
    versions: Vec<Version>,
    selection: Option<ComparisonSelection>,
    result: Option<ComparisonResult>,
    error: Option<ComparatorError>,
    /// Ticket of the only request whose response may still be applied
    awaiting: Option<Ticket>,
}

impl Default for VersionComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionComparator {
    pub fn new() -> Self {
        Self {
            state: CompareState::Idle,
            file_id: None,
            document: None,
            versions: Vec::new(),
            selection: None,
            result: None,
            error: None,
            awaiting: None,
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);
        self.awaiting = Some(ticket);
        ticket
    }

    fn clear_view(&mut self) {
        self.document = None;
        self.versions.clear();
        self.selection = None;
        self.result = None;
        self.error = None;
    }

    /// Start loading `file_id`, discarding whatever was shown before.
    pub fn load_document(&mut self, file_id: FileId) -> CompareRequest {
        self.clear_view();
        self.file_id = Some(file_id);
        self.state = CompareState::LoadingDocument;
        let ticket = self.issue_ticket();
        debug!(file_id, ticket, "Requesting document versions");
        CompareRequest::LoadDocument { ticket, file_id }
    }

    /// Apply the outcome of a [`CompareRequest::LoadDocument`]. Returns the diff
    /// request to issue when the default selection can be compared.
    pub fn document_loaded<E: fmt::Display>(
        &mut self,
        ticket: Ticket,
        outcome: Result<Document, E>,
    ) -> Option<CompareRequest> {
        if self.awaiting != Some(ticket) || self.state != CompareState::LoadingDocument {
            debug!(ticket, "Discarding stale document response");
            return None;
        }
        self.awaiting = None;

        let document = match outcome {
            Ok(document) => document,
            Err(e) => {
                warn!("Failed to fetch file details: {}", e);
                self.state = CompareState::DocumentError;
                self.error = Some(ComparatorError::Load);
                return None;
            }
        };

        let mut versions = document.versions.clone().unwrap_or_default();
        sort_newest_first(&mut versions);
        info!(
            file_id = document.id,
            versions = versions.len(),
            "Loaded document for comparison"
        );

        self.selection = default_selection(&versions);
        self.versions = versions;
        self.document = Some(document);

        if self.selection.is_none() {
            self.state = CompareState::NoVersions;
            return None;
        }

        self.state = CompareState::VersionsLoaded;
        self.request_diff()
    }

    /// Move from a settled selection to either the unsupported gate or a new
    /// diff request. Any earlier request is superseded.
    fn request_diff(&mut self) -> Option<CompareRequest> {
        self.result = None;
        self.error = None;

        if !self.is_comparable() {
            self.awaiting = None;
            self.state = CompareState::Unsupported;
            return None;
        }

        let selection = self.selection?;
        let ticket = self.issue_ticket();
        self.state = CompareState::ComparingVersions;
        debug!(
            ticket,
            left = selection.left,
            right = selection.right,
            "Requesting comparison"
        );
        Some(CompareRequest::FetchDiff { ticket, selection })
    }

    pub fn select_left(
        &mut self,
        version_id: VersionId,
    ) -> Result<Option<CompareRequest>, SelectionError> {
        self.select(Side::Left, version_id)
    }

    pub fn select_right(
        &mut self,
        version_id: VersionId,
    ) -> Result<Option<CompareRequest>, SelectionError> {
        self.select(Side::Right, version_id)
    }

    /// Change one side of the selection. Returns the request that replaces any
    /// in-flight comparison, or `None` when nothing changed or the type is not
    /// comparable.
    pub fn select(
        &mut self,
        side: Side,
        version_id: VersionId,
    ) -> Result<Option<CompareRequest>, SelectionError> {
        let current = self.selection.ok_or(SelectionError::NotLoaded)?;
        if !self.versions.iter().any(|v| v.id == version_id) {
            return Err(SelectionError::UnknownVersion(version_id));
        }

        let (next, other) = match side {
            Side::Left => (
                ComparisonSelection {
                    left: version_id,
                    ..current
                },
                current.right,
            ),
            Side::Right => (
                ComparisonSelection {
                    right: version_id,
                    ..current
                },
                current.left,
            ),
        };

        if next == current {
            return Ok(None);
        }
        if other == version_id && self.versions.len() > 1 {
            return Err(SelectionError::SameVersion(version_id));
        }

        self.selection = Some(next);
        self.state = CompareState::VersionsLoaded;
        Ok(self.request_diff())
    }

    /// Apply the outcome of a [`CompareRequest::FetchDiff`]. Returns whether it
    /// was applied; responses for superseded tickets are dropped.
    pub fn diff_loaded<E: fmt::Display>(
        &mut self,
        ticket: Ticket,
        outcome: Result<ComparisonResult, E>,
    ) -> bool {
        if self.awaiting != Some(ticket) || self.state != CompareState::ComparingVersions {
            debug!(ticket, "Discarding stale comparison response");
            return false;
        }
        self.awaiting = None;

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
                self.state = CompareState::CompareReady;
            }
            Err(e) => {
                warn!("Failed to fetch comparison: {}", e);
                self.result = None;
                self.error = Some(ComparatorError::Compare);
                self.state = CompareState::CompareError;
            }
        }
        true
    }

    /// Tear the view down. Responses still in flight are ignored afterwards.
    pub fn close(&mut self) {
        self.clear_view();
        self.file_id = None;
        self.awaiting = None;
        self.state = CompareState::Idle;
    }

    pub fn state(&self) -> CompareState {
        self.state
    }

    pub fn file_id(&self) -> Option<FileId> {
        self.file_id
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn selection(&self) -> Option<ComparisonSelection> {
        self.selection
    }

    pub fn result(&self) -> Option<&ComparisonResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<ComparatorError> {
        self.error
    }

    pub fn is_busy(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn is_comparable(&self) -> bool {
        self.document
            .as_ref()
            .is_some_and(|doc| is_comparable(doc.mime_type.as_deref()))
    }

    pub fn version(&self, id: VersionId) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }

    pub fn label(&self, version: &Version) -> String {
        version_label(version, &self.versions)
    }

    /// Message for the current state, if the state has one
    pub fn message(&self) -> Option<String> {
        match self.state {
            CompareState::DocumentError | CompareState::CompareError => {
                self.error.map(|e| e.to_string())
            }
            CompareState::NoVersions => Some(NO_VERSIONS_MESSAGE.to_string()),
            CompareState::Unsupported => {
                let mime = self
                    .document
                    .as_ref()
                    .and_then(|d| d.mime_type.as_deref())
                    .unwrap_or("unknown");
                Some(format!(
                    "File type \"{mime}\" does not support text comparison. \
                     Only text-based files (documents, code, PDFs, etc.) can be compared."
                ))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ComparedFile;

    const PATH: &str = "/documents/document.txt";

    fn document(mime: Option<&str>, numbers: &[u32]) -> Document {
        Document {
            id: 1,
            file_name: "document.txt".to_string(),
            virtual_path: PATH.to_string(),
            mime_type: mime.map(str::to_string),
            version_number: numbers.iter().copied().max(),
            file_size: 64,
            checksum: None,
            created_at: None,
            versions: Some(
                numbers
                    .iter()
                    .map(|&n| Version {
                        id: u64::from(n),
                        version_number: n,
                        virtual_path: PATH.to_string(),
                    })
                    .collect(),
            ),
            owner_email: None,
            permissions: Vec::new(),
        }
    }

    fn result_for(selection: ComparisonSelection) -> ComparisonResult {
        ComparisonResult {
            left_file: ComparedFile {
                id: selection.left,
                name: "document.txt".to_string(),
                text: format!("text of {}", selection.left),
            },
            right_file: ComparedFile {
                id: selection.right,
                name: "document.txt".to_string(),
                text: format!("text of {}", selection.right),
            },
        }
    }

    fn loaded(doc: Document) -> (VersionComparator, Option<CompareRequest>) {
        let mut comparator = VersionComparator::new();
        let request = comparator.load_document(doc.id);
        let next = comparator.document_loaded::<String>(request.ticket(), Ok(doc));
        (comparator, next)
    }

    fn expect_diff(request: Option<CompareRequest>) -> (Ticket, ComparisonSelection) {
        match request {
            Some(CompareRequest::FetchDiff { ticket, selection }) => (ticket, selection),
            other => panic!("expected a diff request, got {other:?}"),
        }
    }

    #[test]
    fn starts_idle() {
        let comparator = VersionComparator::new();
        assert_eq!(comparator.state(), CompareState::Idle);
        assert!(comparator.selection().is_none());
        assert!(!comparator.is_comparable());
    }

    #[test]
    fn load_issues_one_document_request() {
        let mut comparator = VersionComparator::new();
        let request = comparator.load_document(42);
        assert!(matches!(
            request,
            CompareRequest::LoadDocument { file_id: 42, .. }
        ));
        assert_eq!(comparator.state(), CompareState::LoadingDocument);
        assert!(comparator.is_busy());
    }

    #[test]
    fn three_versions_default_to_previous_and_latest() {
        let (comparator, request) = loaded(document(Some("text/plain"), &[1, 2, 3]));
        let (_, selection) = expect_diff(request);
        assert_eq!(selection, ComparisonSelection { left: 2, right: 3 });
        assert_eq!(comparator.selection(), Some(selection));
        assert_eq!(comparator.state(), CompareState::ComparingVersions);
        let numbers: Vec<u32> = comparator.versions().iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![3, 2, 1]);
    }

    #[test]
    fn single_version_compares_with_itself() {
        let (_, request) = loaded(document(Some("text/markdown"), &[1]));
        let (_, selection) = expect_diff(request);
        assert_eq!(selection, ComparisonSelection { left: 1, right: 1 });
    }

    #[test]
    fn no_versions_issues_no_diff() {
        let (comparator, request) = loaded(document(Some("text/plain"), &[]));
        assert!(request.is_none());
        assert_eq!(comparator.state(), CompareState::NoVersions);
        assert_eq!(comparator.message().as_deref(), Some(NO_VERSIONS_MESSAGE));
        assert!(!comparator.is_busy());
    }

    #[test]
    fn missing_versions_field_counts_as_none() {
        let mut doc = document(Some("text/plain"), &[1, 2]);
        doc.versions = None;
        let (comparator, request) = loaded(doc);
        assert!(request.is_none());
        assert_eq!(comparator.state(), CompareState::NoVersions);
    }

    #[test]
    fn load_failure_reports_message() {
        let mut comparator = VersionComparator::new();
        let request = comparator.load_document(1);
        let next = comparator
            .document_loaded::<String>(request.ticket(), Err("500 Internal Server Error".into()));
        assert!(next.is_none());
        assert_eq!(comparator.state(), CompareState::DocumentError);
        assert_eq!(comparator.error(), Some(ComparatorError::Load));
        assert_eq!(
            comparator.message().as_deref(),
            Some("Could not load file details.")
        );
    }

    #[test]
    fn unsupported_type_never_requests_diff() {
        let (comparator, request) = loaded(document(Some("image/png"), &[1, 2]));
        assert!(request.is_none());
        assert_eq!(comparator.state(), CompareState::Unsupported);
        assert!(comparator.selection().is_some());
        assert!(comparator.message().unwrap().contains("image/png"));

        let (comparator, request) = loaded(document(None, &[1, 2]));
        assert!(request.is_none());
        assert_eq!(comparator.state(), CompareState::Unsupported);
    }

    #[test]
    fn unsupported_selection_change_stays_gated() {
        let (mut comparator, _) = loaded(document(Some("application/zip"), &[1, 2, 3]));
        let request = comparator.select_left(1).unwrap();
        assert!(request.is_none());
        assert_eq!(comparator.state(), CompareState::Unsupported);
        assert_eq!(comparator.selection(), Some(ComparisonSelection { left: 1, right: 3 }));
    }

    #[test]
    fn diff_success_is_ready() {
        let (mut comparator, request) = loaded(document(Some("text/plain"), &[1, 2]));
        let (ticket, selection) = expect_diff(request);
        assert!(comparator.diff_loaded::<String>(ticket, Ok(result_for(selection))));
        assert_eq!(comparator.state(), CompareState::CompareReady);
        assert_eq!(comparator.result().unwrap().left_file.id, 1);
        assert!(!comparator.is_busy());
    }

    #[test]
    fn selection_change_issues_exactly_one_request() {
        let (mut comparator, request) = loaded(document(Some("text/plain"), &[1, 2, 3]));
        let (first, selection) = expect_diff(request);
        comparator.diff_loaded::<String>(first, Ok(result_for(selection)));

        let (second, selection) = expect_diff(comparator.select_left(1).unwrap());
        assert_ne!(first, second);
        assert_eq!(selection, ComparisonSelection { left: 1, right: 3 });
        assert_eq!(comparator.state(), CompareState::ComparingVersions);
        assert!(comparator.result().is_none(), "old result must be cleared");

        // choosing the same version again is not a change
        assert_eq!(comparator.select_left(1).unwrap(), None);
    }

    #[test]
    fn late_response_for_old_pair_is_discarded() {
        let (mut comparator, request) = loaded(document(Some("text/plain"), &[1, 2, 3]));
        let (old_ticket, old_selection) = expect_diff(request);
        let (new_ticket, new_selection) = expect_diff(comparator.select_left(1).unwrap());

        assert!(comparator.diff_loaded::<String>(new_ticket, Ok(result_for(new_selection))));
        assert!(!comparator.diff_loaded::<String>(old_ticket, Ok(result_for(old_selection))));

        let shown = comparator.result().unwrap();
        assert_eq!(shown.left_file.id, 1);
        assert_eq!(shown.right_file.id, 3);
        assert_eq!(comparator.state(), CompareState::CompareReady);
    }

    #[test]
    fn late_failure_for_old_pair_is_discarded() {
        let (mut comparator, request) = loaded(document(Some("text/plain"), &[1, 2, 3]));
        let (old_ticket, _) = expect_diff(request);
        let (new_ticket, new_selection) = expect_diff(comparator.select_right(1).unwrap());
        assert_eq!(new_selection, ComparisonSelection { left: 2, right: 1 });

        assert!(!comparator.diff_loaded::<String>(old_ticket, Err("timeout".into())));
        assert_eq!(comparator.state(), CompareState::ComparingVersions);
        assert!(comparator.diff_loaded::<String>(new_ticket, Ok(result_for(new_selection))));
        assert_eq!(comparator.state(), CompareState::CompareReady);
    }

    #[test]
    fn compare_failure_clears_result() {
        let (mut comparator, request) = loaded(document(Some("application/json"), &[1, 2, 3]));
        let (ticket, selection) = expect_diff(request);
        comparator.diff_loaded::<String>(ticket, Ok(result_for(selection)));

        let (ticket, _) = expect_diff(comparator.select_left(1).unwrap());
        assert!(comparator.diff_loaded::<String>(ticket, Err("HTTP 500".into())));
        assert_eq!(comparator.state(), CompareState::CompareError);
        assert!(comparator.result().is_none());
        assert!(
            comparator
                .message()
                .unwrap()
                .starts_with("Could not compare the selected versions")
        );

        // recoverable: another pair can still be compared
        let (ticket, selection) = expect_diff(comparator.select_left(2).unwrap());
        assert!(comparator.diff_loaded::<String>(ticket, Ok(result_for(selection))));
        assert_eq!(comparator.state(), CompareState::CompareReady);
    }

    #[test]
    fn rejects_versions_outside_the_document() {
        let (mut comparator, _) = loaded(document(Some("text/plain"), &[1, 2]));
        assert_eq!(
            comparator.select_left(99),
            Err(SelectionError::UnknownVersion(99))
        );
        assert_eq!(comparator.selection(), Some(ComparisonSelection { left: 1, right: 2 }));
    }

    #[test]
    fn rejects_same_version_on_both_sides() {
        let (mut comparator, _) = loaded(document(Some("text/plain"), &[1, 2]));
        assert_eq!(comparator.select_left(2), Err(SelectionError::SameVersion(2)));
        assert_eq!(comparator.select_right(1), Err(SelectionError::SameVersion(1)));
        assert_eq!(comparator.state(), CompareState::ComparingVersions);
    }

    #[test]
    fn selecting_before_load_is_rejected() {
        let mut comparator = VersionComparator::new();
        assert_eq!(comparator.select_left(1), Err(SelectionError::NotLoaded));
        comparator.load_document(1);
        assert_eq!(comparator.select_right(1), Err(SelectionError::NotLoaded));
    }

    #[test]
    fn close_discards_late_responses() {
        let mut comparator = VersionComparator::new();
        let load = comparator.load_document(1);
        comparator.close();
        assert!(
            comparator
                .document_loaded::<String>(load.ticket(), Ok(document(Some("text/plain"), &[1, 2])))
                .is_none()
        );
        assert_eq!(comparator.state(), CompareState::Idle);
        assert!(comparator.document().is_none());

        let (mut comparator, request) = loaded(document(Some("text/plain"), &[1, 2]));
        let (ticket, selection) = expect_diff(request);
        comparator.close();
        assert!(!comparator.diff_loaded::<String>(ticket, Ok(result_for(selection))));
        assert!(comparator.result().is_none());
    }

    #[test]
    fn fresh_comparator_rejects_responses_for_an_earlier_one() {
        let (mut first, request) = loaded(document(Some("text/plain"), &[1, 2]));
        let (first_ticket, first_selection) = expect_diff(request);
        first.close();

        let mut doc = document(Some("text/plain"), &[3, 4]);
        doc.id = 2;
        let (mut second, request) = loaded(doc);
        let (second_ticket, second_selection) = expect_diff(request);
        assert_ne!(first_ticket, second_ticket);

        assert!(!second.diff_loaded::<String>(first_ticket, Ok(result_for(first_selection))));
        assert!(second.result().is_none());
        assert_eq!(second.state(), CompareState::ComparingVersions);

        assert!(second.diff_loaded::<String>(second_ticket, Ok(result_for(second_selection))));
        assert_eq!(second.result().map(|r| r.left_file.id), Some(second_selection.left));
    }

    #[test]
    fn reopening_the_same_file_ignores_the_old_document_response() {
        let mut first = VersionComparator::new();
        let stale = first.load_document(1);
        first.close();

        let mut second = VersionComparator::new();
        let fresh = second.load_document(1);
        assert!(
            second
                .document_loaded::<String>(stale.ticket(), Ok(document(Some("text/plain"), &[1, 2])))
                .is_none()
        );
        assert_eq!(second.state(), CompareState::LoadingDocument);
        assert!(
            second
                .document_loaded::<String>(fresh.ticket(), Ok(document(Some("text/plain"), &[1, 2])))
                .is_some()
        );
    }

    #[test]
    fn reload_ignores_the_previous_document_response() {
        let mut comparator = VersionComparator::new();
        let first = comparator.load_document(1);
        let second = comparator.load_document(2);
        assert!(
            comparator
                .document_loaded::<String>(first.ticket(), Ok(document(Some("text/plain"), &[1])))
                .is_none()
        );
        assert_eq!(comparator.state(), CompareState::LoadingDocument);

        let mut doc = document(Some("text/plain"), &[4, 5]);
        doc.id = 2;
        assert!(comparator.document_loaded::<String>(second.ticket(), Ok(doc)).is_some());
        assert_eq!(comparator.file_id(), Some(2));
    }

    #[test]
    fn labels_use_loaded_versions() {
        let (comparator, _) = loaded(document(Some("text/plain"), &[1, 2, 3]));
        let labels: Vec<String> = comparator
            .versions()
            .iter()
            .map(|v| comparator.label(v))
            .collect();
        assert_eq!(labels, vec!["Version 3 (Latest)", "Version 2", "Version 1"]);
    }
}
