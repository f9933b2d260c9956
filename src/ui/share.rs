use crate::backend::api_client::ApiError;
use crate::document::{Document, FileId, ShareReceipt, ShareRequest};
use egui::{Color32, Context, RichText};

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const SHARE_FAILED: &str = "Failed to share file";

pub enum ShareAction {
    Submit(ShareRequest),
    Cancel,
}

/// Modal window for sharing one owned document with another user
pub struct ShareDialog {
    file_id: FileId,
    file_name: String,
    email: String,
    can_edit: bool,
    sharing: bool,
    error: Option<String>,
}

impl ShareDialog {
    pub fn new(document: &Document) -> Self {
        Self {
            file_id: document.id,
            file_name: document.file_name.clone(),
            email: String::new(),
            can_edit: false,
            sharing: false,
            error: None,
        }
    }

    pub fn validate(&self) -> Result<ShareRequest, String> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(EMAIL_REQUIRED.to_string());
        }
        Ok(ShareRequest {
            file_id: self.file_id,
            user_email: email.to_string(),
            can_edit: self.can_edit,
        })
    }

    fn begin_submit(&mut self) -> Option<ShareAction> {
        if self.sharing {
            return None;
        }
        match self.validate() {
            Ok(request) => {
                self.sharing = true;
                self.error = None;
                Some(ShareAction::Submit(request))
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    /// Returns the notice to show on the files screen when sharing succeeded.
    /// On failure the dialog stays open with the error.
    pub fn apply_result(&mut self, result: Result<ShareReceipt, ApiError>) -> Option<String> {
        self.sharing = false;
        match result {
            Ok(receipt) => Some(receipt.message),
            Err(err) => {
                self.error = Some(
                    err.detail()
                        .map(str::to_string)
                        .unwrap_or_else(|| SHARE_FAILED.to_string()),
                );
                None
            }
        }
    }

    pub fn show(&mut self, ctx: &Context) -> Option<ShareAction> {
        let mut action = None;
        let mut open = true;

        egui::Window::new(format!("Share \"{}\"", self.file_name))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!self.sharing, |ui| {
                    ui.label("User email");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.email)
                            .hint_text("colleague@example.com")
                            .desired_width(260.0),
                    );
                    ui.checkbox(&mut self.can_edit, "Allow editing");
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        let label = if self.sharing { "Sharing..." } else { "Share" };
                        if ui.button(label).clicked() {
                            action = self.begin_submit();
                        }
                        if ui.button("Cancel").clicked() {
                            action = Some(ShareAction::Cancel);
                        }
                    });
                });
                if let Some(error) = &self.error {
                    ui.label(RichText::new(error).color(Color32::from_rgb(150, 0, 0)));
                }
            });

        if !open {
            action = Some(ShareAction::Cancel);
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        serde_json::from_str(r#"{"id": 5, "file_name": "plan.txt", "virtual_path": "/plan.txt"}"#)
            .unwrap()
    }

    #[test]
    fn test_blank_email_is_rejected() {
        let mut dialog = ShareDialog::new(&document());
        dialog.email = "   ".to_string();
        assert_eq!(dialog.validate().unwrap_err(), EMAIL_REQUIRED);
        assert!(dialog.begin_submit().is_none());
        assert_eq!(dialog.error.as_deref(), Some(EMAIL_REQUIRED));
    }

    #[test]
    fn test_request_trims_email() {
        let mut dialog = ShareDialog::new(&document());
        dialog.email = " friend@example.com ".to_string();
        dialog.can_edit = true;

        let request = dialog.validate().unwrap();
        assert_eq!(request.file_id, 5);
        assert_eq!(request.user_email, "friend@example.com");
        assert!(request.can_edit);
    }

    #[test]
    fn test_result_handling() {
        let mut dialog = ShareDialog::new(&document());
        dialog.email = "friend@example.com".to_string();
        assert!(dialog.begin_submit().is_some());
        assert!(dialog.begin_submit().is_none());

        let notice = dialog.apply_result(Err(ApiError::Status {
            status: 404,
            detail: None,
        }));
        assert!(notice.is_none());
        assert_eq!(dialog.error.as_deref(), Some(SHARE_FAILED));

        let notice = dialog.apply_result(Ok(ShareReceipt {
            message: "File shared with friend@example.com".to_string(),
            permissions: vec!["read".to_string()],
        }));
        assert_eq!(notice.as_deref(), Some("File shared with friend@example.com"));
    }
}
