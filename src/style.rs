use egui::{Color32, Context, FontId, Stroke, Style, TextStyle, Visuals};

/// Light theme with roomy spacing. `font_size` scales body and button text.
pub fn configure_style(ctx: &Context, font_size: f32) {
    let mut style = Style::default();
    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(12);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    for (text_style, scale) in [
        (TextStyle::Body, 1.0),
        (TextStyle::Button, 1.0),
        (TextStyle::Monospace, 0.95),
        (TextStyle::Small, 0.8),
        (TextStyle::Heading, 1.4),
    ] {
        let family = match text_style {
            TextStyle::Monospace => egui::FontFamily::Monospace,
            _ => egui::FontFamily::Proportional,
        };
        style
            .text_styles
            .insert(text_style, FontId::new(font_size * scale, family));
    }

    ctx.set_style(style);

    let mut visuals = Visuals::light();
    visuals.window_shadow = egui::epaint::Shadow::NONE;
    visuals.popup_shadow = egui::epaint::Shadow::NONE;

    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, Color32::from_gray(225));
    visuals.widgets.hovered.bg_fill = Color32::from_gray(240);
    visuals.widgets.active.bg_fill = Color32::from_gray(230);

    visuals.selection.bg_fill = Color32::from_rgb(200, 220, 255);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(60, 90, 160));

    ctx.set_visuals(visuals);
}
