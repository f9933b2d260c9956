use crate::backend::api_client::ApiError;
use crate::compare::{CompareRequest, CompareState, Side, Ticket, VersionComparator};
use crate::diff::DiffView;
use crate::document::{ComparisonResult, Document, FileId, VersionId};
use crate::ui::diff_view::render_diff_view;
use egui::{Color32, RichText, Ui};
use tracing::{debug, warn};

pub enum CompareAction {
    Request(CompareRequest),
    Back,
}

/// Compare screen: a [`VersionComparator`] plus the rendered diff of its result
#[derive(Default)]
pub struct CompareView {
    comparator: VersionComparator,
    diff: Option<DiffView>,
}

impl CompareView {
    pub fn open(&mut self, file_id: FileId) -> CompareRequest {
        self.diff = None;
        self.comparator.load_document(file_id)
    }

    pub fn comparator(&self) -> &VersionComparator {
        &self.comparator
    }

    pub fn document_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<Document, ApiError>,
    ) -> Option<CompareRequest> {
        let request = self.comparator.document_loaded(ticket, result);
        self.sync_diff();
        request
    }

    /// Returns whether the response belonged to this view's latest request
    pub fn diff_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<ComparisonResult, ApiError>,
    ) -> bool {
        let applied = self.comparator.diff_loaded(ticket, result);
        if applied {
            self.sync_diff();
        }
        applied
    }

    pub fn select(&mut self, side: Side, version_id: VersionId) -> Option<CompareRequest> {
        match self.comparator.select(side, version_id) {
            Ok(request) => {
                self.sync_diff();
                request
            }
            Err(e) => {
                warn!("Ignoring version selection: {}", e);
                None
            }
        }
    }

    pub fn close(&mut self) {
        self.comparator.close();
        self.diff = None;
    }

    fn sync_diff(&mut self) {
        self.diff = self.comparator.result().map(DiffView::from_result);
    }

    pub fn show(&mut self, ui: &mut Ui) -> Option<CompareAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            if ui.button("⬅ Back").clicked() {
                action = Some(CompareAction::Back);
            }
            let title = self
                .comparator
                .document()
                .map(|doc| format!("Compare versions of {}", doc.file_name))
                .unwrap_or_else(|| "Compare versions".to_string());
            ui.heading(title);
        });
        if let Some(doc) = self.comparator.document() {
            ui.label(RichText::new(&doc.virtual_path).monospace().weak());
        }
        ui.separator();

        let state = self.comparator.state();
        if state == CompareState::LoadingDocument {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading file details...");
            });
            return action;
        }

        let has_selection = matches!(
            state,
            CompareState::VersionsLoaded
                | CompareState::Unsupported
                | CompareState::ComparingVersions
                | CompareState::CompareError
                | CompareState::CompareReady
        );
        if has_selection {
            if let Some(request) = self.show_pickers(ui) {
                action = Some(CompareAction::Request(request));
            }
        }

        if let Some(message) = self.comparator.message() {
            let color = match state {
                CompareState::DocumentError | CompareState::CompareError => {
                    Color32::from_rgb(150, 0, 0)
                }
                _ => ui.visuals().weak_text_color(),
            };
            ui.add_space(8.0);
            ui.label(RichText::new(message).color(color));
        }

        if state == CompareState::ComparingVersions {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Comparing versions...");
            });
        }

        if let Some(diff) = &self.diff {
            ui.add_space(8.0);
            render_diff_view(ui, diff);
        }

        action
    }

    /// Left and right version pickers. A version chosen on one side is disabled
    /// on the other.
    fn show_pickers(&mut self, ui: &mut Ui) -> Option<CompareRequest> {
        let selection = self.comparator.selection()?;
        let mut picked = None;

        ui.horizontal(|ui| {
            for (side, current, other, label) in [
                (Side::Left, selection.left, selection.right, "Left version"),
                (Side::Right, selection.right, selection.left, "Right version"),
            ] {
                ui.label(label);
                let selected_text = self
                    .comparator
                    .version(current)
                    .map(|v| self.comparator.label(v))
                    .unwrap_or_default();
                egui::ComboBox::from_id_salt(label)
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        for version in self.comparator.versions() {
                            let enabled =
                                version.id != other || self.comparator.versions().len() == 1;
                            let clicked = ui
                                .add_enabled_ui(enabled, |ui| {
                                    ui.selectable_label(
                                        version.id == current,
                                        self.comparator.label(version),
                                    )
                                    .clicked()
                                })
                                .inner;
                            if clicked {
                                picked = Some((side, version.id));
                            }
                        }
                    });
                ui.add_space(16.0);
            }
        });

        let (side, version_id) = picked?;
        self.select(side, version_id)
    }
}

/// Holds the compare view while the compare screen is open and routes worker
/// responses to it. Responses for a view that was closed find either no view or
/// a view awaiting a different ticket, and are dropped.
#[derive(Default)]
pub struct CompareSlot {
    view: Option<CompareView>,
}

impl CompareSlot {
    /// Replace any open view with a new one loading `file_id`
    pub fn open(&mut self, file_id: FileId) -> CompareRequest {
        self.close();
        let mut view = CompareView::default();
        let request = view.open(file_id);
        self.view = Some(view);
        request
    }

    pub fn close(&mut self) {
        if let Some(mut view) = self.view.take() {
            view.close();
        }
    }

    pub fn view_mut(&mut self) -> Option<&mut CompareView> {
        self.view.as_mut()
    }

    pub fn is_busy(&self) -> bool {
        self.view
            .as_ref()
            .is_some_and(|view| view.comparator().is_busy())
    }

    pub fn document_loaded(
        &mut self,
        ticket: Ticket,
        file_id: FileId,
        result: Result<Document, ApiError>,
    ) -> Option<CompareRequest> {
        let Some(view) = self
            .view
            .as_mut()
            .filter(|view| view.comparator().file_id() == Some(file_id))
        else {
            debug!(file_id, ticket, "Discarding document for a closed compare view");
            return None;
        };
        view.document_loaded(ticket, result)
    }

    pub fn diff_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<ComparisonResult, ApiError>,
    ) -> bool {
        match self.view.as_mut() {
            Some(view) => view.diff_loaded(ticket, result),
            None => {
                debug!(ticket, "Discarding comparison for a closed compare view");
                false
            }
        }
    }
}
