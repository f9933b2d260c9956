use crate::backend::api_client::ApiError;
use crate::compare::version_label;
use crate::constant::NOTICE_DURATION_SECS;
use crate::document::{Document, FileId};
use crate::library::{
    FileKind, download_revision, format_file_size, latest_version_number, versions_for_listing,
};
use crate::messages::Listing;
use egui::{Color32, RichText, ScrollArea, Ui};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub const DOWNLOAD_FAILED: &str = "Download failed. Please try again.";

pub enum FilesAction {
    Refresh,
    Download {
        document: Document,
        revision: Option<u32>,
    },
    Compare(FileId),
    UploadNewVersion {
        virtual_path: String,
        file_name: String,
    },
    Share(Document),
}

pub struct FilesView {
    listing: Listing,
    files: Vec<Document>,
    loading: bool,
    error: Option<String>,
    /// Version number picked per row, defaults to the latest
    selected_versions: HashMap<FileId, u32>,
    notice: Option<(String, Instant)>,
}

impl FilesView {
    pub fn new(listing: Listing) -> Self {
        Self {
            listing,
            files: Vec::new(),
            loading: false,
            error: None,
            selected_versions: HashMap::new(),
            notice: None,
        }
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply_files(&mut self, files: Vec<Document>) {
        self.selected_versions = files
            .iter()
            .map(|doc| (doc.id, latest_version_number(doc)))
            .collect();
        self.files = files;
        self.loading = false;
        self.error = None;
    }

    pub fn apply_error(&mut self) {
        self.loading = false;
        self.error = Some(match self.listing {
            Listing::Owned => "Could not load files. Please try again.".to_string(),
            Listing::Shared => "Could not load shared files. Please try again.".to_string(),
        });
    }

    pub fn show_notice(&mut self, message: String) {
        self.notice = Some((message, Instant::now()));
    }

    fn active_notice(&mut self, now: Instant) -> Option<&str> {
        let expired = self.notice.as_ref().is_some_and(|(_, shown)| {
            now.duration_since(*shown) >= Duration::from_secs(NOTICE_DURATION_SECS)
        });
        if expired {
            self.notice = None;
        }
        self.notice.as_ref().map(|(message, _)| message.as_str())
    }

    /// Show the outcome of a download started from this view
    pub fn apply_download(&mut self, result: &Result<Option<PathBuf>, ApiError>) {
        match result {
            Ok(Some(path)) => self.show_notice(format!("Saved to {}", path.display())),
            Ok(None) => {}
            Err(_) => self.show_notice(DOWNLOAD_FAILED.to_string()),
        }
    }

    /// Whether the view still changes without input (spinner or a notice to expire)
    pub fn is_active(&self) -> bool {
        self.loading || self.notice.is_some()
    }

    pub fn selected_version(&self, doc: &Document) -> u32 {
        self.selected_versions
            .get(&doc.id)
            .copied()
            .unwrap_or_else(|| latest_version_number(doc))
    }

    /// Download action for the row's picked version
    pub fn download_action(&self, doc: &Document) -> FilesAction {
        FilesAction::Download {
            document: doc.clone(),
            revision: download_revision(self.selected_version(doc), latest_version_number(doc)),
        }
    }

    pub fn show(&mut self, ui: &mut Ui) -> Option<FilesAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.heading(match self.listing {
                Listing::Owned => "My Files",
                Listing::Shared => "Shared with Me",
            });
            if ui.button("⟳").on_hover_text("Refresh").clicked() {
                action = Some(FilesAction::Refresh);
            }
        });

        if let Some(notice) = self.active_notice(Instant::now()) {
            ui.label(RichText::new(notice).color(Color32::from_rgb(0, 100, 0)));
        }
        if let Some(error) = &self.error {
            ui.label(RichText::new(error).color(Color32::from_rgb(150, 0, 0)));
        }
        if self.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading files...");
            });
            return action;
        }
        if self.files.is_empty() && self.error.is_none() {
            ui.label(match self.listing {
                Listing::Owned => "No files yet. Upload one to get started.",
                Listing::Shared => "No files have been shared with you.",
            });
            return action;
        }

        ui.separator();
        let mut picked = None;
        ScrollArea::vertical().show(ui, |ui| {
            for doc in &self.files {
                ui.push_id(doc.id, |ui| {
                    let (row_action, row_pick) = self.show_row(ui, doc);
                    if row_action.is_some() {
                        action = row_action;
                    }
                    if row_pick.is_some() {
                        picked = row_pick;
                    }
                });
                ui.separator();
            }
        });
        if let Some((file_id, version_number)) = picked {
            self.select_version(file_id, version_number);
        }

        action
    }

    /// Draws one row. Returns the clicked action and a changed version pick.
    fn show_row(
        &self,
        ui: &mut Ui,
        doc: &Document,
    ) -> (Option<FilesAction>, Option<(FileId, u32)>) {
        let mut action = None;
        let versions = versions_for_listing(doc);
        let kind = FileKind::from_mime(doc.mime_type.as_deref());
        let mut selected = self.selected_version(doc);

        ui.horizontal(|ui| {
            ui.label(RichText::new(kind.icon()).size(20.0));
            ui.vertical(|ui| {
                ui.label(RichText::new(&doc.file_name).strong());
                ui.label(RichText::new(&doc.virtual_path).monospace().weak());
                let mut meta = format!(
                    "{} · {}",
                    doc.mime_type.as_deref().unwrap_or("unknown type"),
                    format_file_size(doc.file_size)
                );
                if let Some(created) = doc.created_at {
                    meta.push_str(&format!(" · {}", created.format("%Y-%m-%d %H:%M")));
                }
                if let Some(owner) = &doc.owner_email {
                    meta.push_str(&format!(" · shared by {owner}"));
                }
                ui.label(RichText::new(meta).small());
                ui.label(
                    RichText::new(format!(
                        "{} version{} available",
                        versions.len(),
                        if versions.len() == 1 { "" } else { "s" }
                    ))
                    .small(),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if !doc.is_shared() && ui.button("🔗").on_hover_text("Share").clicked() {
                    action = Some(FilesAction::Share(doc.clone()));
                }
                if doc.can_edit()
                    && ui.button("⬆").on_hover_text("Upload new version").clicked()
                {
                    action = Some(FilesAction::UploadNewVersion {
                        virtual_path: doc.virtual_path.clone(),
                        file_name: doc.file_name.clone(),
                    });
                }
                let compare = ui
                    .add_enabled(versions.len() >= 2, egui::Button::new("⇄"))
                    .on_hover_text("Compare versions");
                if compare.clicked() {
                    action = Some(FilesAction::Compare(doc.id));
                }
                if ui.button("⬇").on_hover_text("Download").clicked() {
                    action = Some(self.download_action(doc));
                }

                let selected_label = versions
                    .iter()
                    .find(|v| v.version_number == selected)
                    .map(|v| version_label(v, &versions))
                    .unwrap_or_else(|| format!("Version {selected}"));
                egui::ComboBox::from_id_salt(("version", doc.id))
                    .selected_text(selected_label)
                    .show_ui(ui, |ui| {
                        for version in &versions {
                            ui.selectable_value(
                                &mut selected,
                                version.version_number,
                                version_label(version, &versions),
                            );
                        }
                    });
            });
        });

        let picked = (selected != self.selected_version(doc)).then_some((doc.id, selected));
        (action, picked)
    }

    pub fn select_version(&mut self, file_id: FileId, version_number: u32) {
        self.selected_versions.insert(file_id, version_number);
    }
}
