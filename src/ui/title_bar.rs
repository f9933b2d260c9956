use egui::{Align, Layout, RichText, Ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    MyFiles,
    SharedWithMe,
    Upload,
}

pub enum TitleBarAction {
    Navigate(NavTarget),
    Logout,
}

pub struct TitleBar;

pub struct TitleBarState<'a> {
    pub title: &'a str,
    /// `None` on the login screen
    pub user_email: Option<&'a str>,
    pub active: Option<NavTarget>,
    pub busy: bool,
}

impl TitleBar {
    pub fn show(ui: &mut Ui, state: TitleBarState<'_>) -> Option<TitleBarAction> {
        let TitleBarState {
            title,
            user_email,
            active,
            busy,
        } = state;
        let mut action = None;

        ui.horizontal(|ui| {
            ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                ui.label(RichText::new(title).strong());
                if user_email.is_none() {
                    return;
                }
                ui.add_space(16.0);
                for (target, label) in [
                    (NavTarget::MyFiles, "My Files"),
                    (NavTarget::SharedWithMe, "Shared with Me"),
                    (NavTarget::Upload, "Upload"),
                ] {
                    if ui
                        .selectable_label(active == Some(target), label)
                        .clicked()
                    {
                        action = Some(TitleBarAction::Navigate(target));
                    }
                }
            });

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.spacing_mut().item_spacing.x = 8.0;
                if let Some(email) = user_email {
                    if ui.button("Logout").clicked() {
                        action = Some(TitleBarAction::Logout);
                    }
                    ui.label(RichText::new(email).small());
                }
                if busy {
                    ui.spinner();
                }
            });
        });

        action
    }
}
