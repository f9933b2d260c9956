use crate::backend::api_client::ApiError;
use crate::document::{UploadReceipt, UploadRequest};
use egui::{Color32, RichText, Ui};
use std::path::PathBuf;

pub const UPLOAD_REQUIRED: &str = "File and virtual path are required.";
pub const UPLOAD_FAILED: &str = "Upload failed. Please try again.";

pub enum UploadAction {
    PickFile,
    Submit(UploadRequest),
}

/// Upload form. Also used for "upload new version", in which case `target`
/// names the document that receives the version.
#[derive(Default)]
pub struct UploadView {
    file: Option<PathBuf>,
    name: String,
    virtual_path: String,
    notes: String,
    target: Option<String>,
    uploading: bool,
    error: Option<String>,
    success: Option<String>,
}

impl UploadView {
    /// Form prefilled for a new version of an existing document
    pub fn for_new_version(virtual_path: String, file_name: String) -> Self {
        Self {
            name: file_name.clone(),
            virtual_path,
            target: Some(file_name),
            ..Self::default()
        }
    }

    pub fn is_new_version(&self) -> bool {
        self.target.is_some()
    }

    pub fn set_file(&mut self, path: PathBuf) {
        if self.name.trim().is_empty() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                self.name = name.to_string();
            }
        }
        self.file = Some(path);
    }

    pub fn validate(&self) -> Result<UploadRequest, String> {
        let virtual_path = self.virtual_path.trim();
        let Some(path) = self.file.clone() else {
            return Err(UPLOAD_REQUIRED.to_string());
        };
        if virtual_path.is_empty() {
            return Err(UPLOAD_REQUIRED.to_string());
        }

        let name = match self.name.trim() {
            "" => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string(),
            name => name.to_string(),
        };
        let notes = Some(self.notes.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(UploadRequest {
            path,
            name,
            virtual_path: virtual_path.to_string(),
            notes,
        })
    }

    fn begin_submit(&mut self) -> Option<UploadAction> {
        if self.uploading {
            return None;
        }
        self.success = None;
        match self.validate() {
            Ok(request) => {
                self.uploading = true;
                self.error = None;
                Some(UploadAction::Submit(request))
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    pub fn apply_result(&mut self, result: &Result<UploadReceipt, ApiError>) {
        self.uploading = false;
        match result {
            Ok(receipt) => {
                *self = Self {
                    success: Some(format!(
                        "Upload successful! Version {} created.",
                        receipt.version
                    )),
                    ..Self::default()
                };
            }
            Err(err) => {
                self.error = Some(
                    err.detail()
                        .map(str::to_string)
                        .unwrap_or_else(|| UPLOAD_FAILED.to_string()),
                );
            }
        }
    }

    pub fn show(&mut self, ui: &mut Ui) -> Option<UploadAction> {
        let mut action = None;

        ui.heading("Upload File");
        if let Some(target) = &self.target {
            ui.label(format!("Uploading a new version of {target}"));
        }
        ui.add_space(8.0);

        ui.add_enabled_ui(!self.uploading, |ui| {
            egui::Grid::new("upload_form")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("File");
                    ui.horizontal(|ui| {
                        if ui.button("Choose file...").clicked() {
                            action = Some(UploadAction::PickFile);
                        }
                        match &self.file {
                            Some(path) => ui.label(path.display().to_string()),
                            None => ui.label(RichText::new("No file selected").weak()),
                        };
                    });
                    ui.end_row();

                    ui.label("Name");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.name)
                            .hint_text("Defaults to the file name"),
                    );
                    ui.end_row();

                    ui.label("Virtual path");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.virtual_path)
                            .hint_text("/documents/report.txt"),
                    );
                    ui.end_row();

                    ui.label("Notes");
                    ui.add(egui::TextEdit::multiline(&mut self.notes).desired_rows(3));
                    ui.end_row();
                });

            ui.add_space(8.0);
            let label = if self.uploading { "Uploading..." } else { "Upload" };
            if ui.button(label).clicked() {
                action = self.begin_submit();
            }
        });

        if self.uploading {
            ui.spinner();
        }
        if let Some(error) = &self.error {
            ui.label(RichText::new(error).color(Color32::from_rgb(150, 0, 0)));
        }
        if let Some(success) = &self.success {
            ui.label(RichText::new(success).color(Color32::from_rgb(0, 100, 0)));
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(version: u32) -> UploadReceipt {
        UploadReceipt {
            message: "ok".to_string(),
            version,
            checksum: "abc".to_string(),
        }
    }

    #[test]
    fn test_requires_file_and_virtual_path() {
        let mut view = UploadView::default();
        view.virtual_path = "/docs/a.txt".to_string();
        assert_eq!(view.validate().unwrap_err(), UPLOAD_REQUIRED);

        let mut view = UploadView::default();
        view.set_file(PathBuf::from("/tmp/a.txt"));
        view.virtual_path = "   ".to_string();
        assert_eq!(view.validate().unwrap_err(), UPLOAD_REQUIRED);
    }

    #[test]
    fn test_name_defaults_to_file_name() {
        let mut view = UploadView::default();
        view.set_file(PathBuf::from("/tmp/notes.md"));
        view.virtual_path = " /docs/notes.md ".to_string();

        let request = view.validate().unwrap();
        assert_eq!(request.name, "notes.md");
        assert_eq!(request.virtual_path, "/docs/notes.md");
        assert_eq!(request.notes, None);
    }

    #[test]
    fn test_new_version_keeps_prefilled_name() {
        let mut view =
            UploadView::for_new_version("/docs/plan.txt".to_string(), "plan.txt".to_string());
        view.set_file(PathBuf::from("/tmp/plan-v2.txt"));
        view.notes = "second draft".to_string();

        let request = view.validate().unwrap();
        assert_eq!(request.name, "plan.txt");
        assert_eq!(request.virtual_path, "/docs/plan.txt");
        assert_eq!(request.notes.as_deref(), Some("second draft"));
    }

    #[test]
    fn test_success_resets_form() {
        let mut view = UploadView::default();
        view.set_file(PathBuf::from("/tmp/a.txt"));
        view.virtual_path = "/a.txt".to_string();
        assert!(matches!(view.begin_submit(), Some(UploadAction::Submit(_))));
        assert!(view.begin_submit().is_none());

        view.apply_result(&Ok(receipt(4)));
        assert_eq!(
            view.success.as_deref(),
            Some("Upload successful! Version 4 created.")
        );
        assert!(view.file.is_none());
        assert!(view.virtual_path.is_empty());
        assert!(!view.uploading);
    }

    #[test]
    fn test_failure_prefers_server_detail() {
        let mut view = UploadView::default();
        view.apply_result(&Err(ApiError::Status {
            status: 403,
            detail: Some("You do not have permission to upload to this path".to_string()),
        }));
        assert_eq!(
            view.error.as_deref(),
            Some("You do not have permission to upload to this path")
        );

        view.apply_result(&Err(ApiError::Status {
            status: 500,
            detail: None,
        }));
        assert_eq!(view.error.as_deref(), Some(UPLOAD_FAILED));
    }
}
