use egui::{Color32, RichText, Ui};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub enum LoginAction {
    Submit { email: String, password: String },
}

#[derive(Default)]
pub struct LoginView {
    email: String,
    password: String,
    error: Option<String>,
    submitting: bool,
}

impl LoginView {
    pub fn with_email(email: Option<String>) -> Self {
        Self {
            email: email.unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Start a submission. Returns `None` while a previous one is in flight or
    /// when a field is empty.
    pub fn begin_submit(&mut self) -> Option<LoginAction> {
        if self.submitting {
            return None;
        }
        let email = self.email.trim().to_string();
        if email.is_empty() || self.password.is_empty() {
            self.error = Some("Email and password are required.".to_string());
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(LoginAction::Submit {
            email,
            password: self.password.clone(),
        })
    }

    pub fn on_success(&mut self) {
        self.submitting = false;
        self.password.clear();
        self.error = None;
    }

    pub fn on_failure(&mut self) {
        self.submitting = false;
        self.error = Some(INVALID_CREDENTIALS.to_string());
    }

    pub fn show(&mut self, ui: &mut Ui) -> Option<LoginAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.heading("Sign in");
            ui.add_space(20.0);

            ui.add_enabled_ui(!self.submitting, |ui| {
                ui.label("Email Address");
                ui.add(
                    egui::TextEdit::singleline(&mut self.email)
                        .hint_text("Enter your email")
                        .desired_width(280.0),
                );
                ui.label("Password");
                let password = ui.add(
                    egui::TextEdit::singleline(&mut self.password)
                        .password(true)
                        .hint_text("Enter your password")
                        .desired_width(280.0),
                );

                let enter = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let label = if self.submitting { "Signing in..." } else { "Sign in" };
                if ui.button(label).clicked() || enter {
                    action = self.begin_submit();
                }
            });

            if self.submitting {
                ui.spinner();
            }

            if let Some(error) = &self.error {
                ui.add_space(8.0);
                ui.label(RichText::new(error).color(Color32::from_rgb(150, 0, 0)));
            }
        });

        action
    }
}
