use crate::diff::{DiffLine, DiffRow, DiffStats, DiffView};
use egui::{Color32, FontId, RichText, TextFormat, Ui, Vec2, text::LayoutJob};
use similar::{ChangeTag, TextDiff};

const REMOVED_LINE_BG: Color32 = Color32::from_rgb(255, 230, 230);
const ADDED_LINE_BG: Color32 = Color32::from_rgb(230, 255, 230);
const REMOVED_CHAR_BG: Color32 = Color32::from_rgb(255, 170, 170);
const ADDED_CHAR_BG: Color32 = Color32::from_rgb(170, 255, 170);
const REMOVED_TEXT_COLOR: Color32 = Color32::from_rgb(150, 0, 0);
const ADDED_TEXT_COLOR: Color32 = Color32::from_rgb(0, 100, 0);

const FONT_SIZE: f32 = 13.0;
const LINE_HEIGHT: f32 = 20.0;
const CELL_MARGIN: f32 = 6.0;
const GUTTER_WIDTH: f32 = 40.0;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Column {
    Left,
    Right,
}

fn text_format(color: Color32, background: Color32) -> TextFormat {
    TextFormat {
        font_id: FontId::monospace(FONT_SIZE),
        color,
        background,
        line_height: Some(LINE_HEIGHT),
        ..Default::default()
    }
}

pub fn render_stats(ui: &mut Ui, stats: &DiffStats) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format!("+{} lines", stats.added_lines))
                .color(ADDED_TEXT_COLOR)
                .small(),
        );
        ui.label(
            RichText::new(format!("-{} lines", stats.removed_lines))
                .color(REMOVED_TEXT_COLOR)
                .small(),
        );
        ui.label(
            RichText::new(format!(
                "{} characters added, {} removed",
                stats.added_chars, stats.removed_chars
            ))
            .small()
            .weak(),
        );
    });
}

/// Side-by-side rendering: left version on the left, right version on the right
pub fn render_diff_view(ui: &mut Ui, view: &DiffView) {
    let col_w = (ui.available_width() / 2.0 - 12.0).max(120.0);

    ui.horizontal(|ui| {
        ui.add_sized(
            [col_w, LINE_HEIGHT],
            egui::Label::new(RichText::new(&view.left_title).strong()),
        );
        ui.add_sized(
            [col_w, LINE_HEIGHT],
            egui::Label::new(RichText::new(&view.right_title).strong()),
        );
    });
    render_stats(ui, &view.stats);
    ui.separator();

    if view.is_identical() {
        ui.label(RichText::new("The selected versions are identical.").weak());
    }

    egui::ScrollArea::both().show(ui, |ui| {
        ui.style_mut().spacing.item_spacing.y = 1.0;

        for (row_idx, row) in view.rows.iter().enumerate() {
            ui.push_id(row_idx, |ui| {
                egui::Grid::new("diff_row")
                    .num_columns(2)
                    .min_col_width(0.0)
                    .spacing(Vec2::ZERO)
                    .show(ui, |ui| match row {
                        DiffRow::Unchanged(line) => {
                            render_cell(ui, Some(line), None, Column::Left, col_w);
                            render_cell(ui, None, Some(line), Column::Right, col_w);
                            ui.end_row();
                        }
                        DiffRow::Changed(removed, added) => {
                            for i in 0..removed.len().max(added.len()) {
                                let left = removed.get(i);
                                let right = added.get(i);
                                render_cell(ui, left, right, Column::Left, col_w);
                                render_cell(ui, left, right, Column::Right, col_w);
                                ui.end_row();
                            }
                        }
                    });
            });
        }
    });
}

/// One cell of a row. A changed line facing another changed line gets
/// character-level highlighting.
fn render_cell(
    ui: &mut Ui,
    left: Option<&DiffLine>,
    right: Option<&DiffLine>,
    column: Column,
    width: f32,
) {
    let own = match column {
        Column::Left => left,
        Column::Right => right,
    };
    let changed = own.is_some_and(|line| line.left_number.is_none() || line.right_number.is_none());
    let fill = match (own, changed, column) {
        (Some(_), true, Column::Left) => REMOVED_LINE_BG,
        (Some(_), true, Column::Right) => ADDED_LINE_BG,
        _ => Color32::TRANSPARENT,
    };

    egui::Frame::default()
        .fill(fill)
        .inner_margin(CELL_MARGIN)
        .show(ui, |ui| {
            ui.set_min_width(width - CELL_MARGIN * 2.0);
            let Some(line) = own else {
                ui.label("");
                return;
            };

            let base = ui.visuals().text_color();
            let number = match column {
                Column::Left => line.left_number,
                Column::Right => line.right_number,
            };
            let mut job = LayoutJob::default();
            job.append(
                &number.map(|n| format!("{n:>4} ")).unwrap_or_default(),
                0.0,
                text_format(base.gamma_multiply(0.5), Color32::TRANSPARENT),
            );

            match (left, right) {
                (Some(l), Some(r)) if changed => append_char_diff(&mut job, l, r, column, base),
                _ => job.append(
                    &line.content,
                    0.0,
                    text_format(base, Color32::TRANSPARENT),
                ),
            }

            job.wrap.max_width = width - CELL_MARGIN * 2.0 - GUTTER_WIDTH;
            ui.add(egui::Label::new(job).wrap());
        });
}

fn append_char_diff(
    job: &mut LayoutJob,
    left: &DiffLine,
    right: &DiffLine,
    column: Column,
    base: Color32,
) {
    let diff = TextDiff::from_chars(left.content.as_str(), right.content.as_str());
    for change in diff.iter_all_changes() {
        let text = change.value();
        match (change.tag(), column) {
            (ChangeTag::Equal, _) => {
                job.append(text, 0.0, text_format(base, Color32::TRANSPARENT))
            }
            (ChangeTag::Delete, Column::Left) => {
                job.append(text, 0.0, text_format(REMOVED_TEXT_COLOR, REMOVED_CHAR_BG))
            }
            (ChangeTag::Insert, Column::Right) => {
                job.append(text, 0.0, text_format(ADDED_TEXT_COLOR, ADDED_CHAR_BG))
            }
            _ => {}
        }
    }
}
