use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::detail::{embed_url, info_fields, option_lines, row_json, row_label, watch_url};
use crate::data::model::{DatasetRow, VideoTable};
use crate::state::AppState;

const CORRECT_COLOR: Color32 = Color32::from_rgb(0x2e, 0xa0, 0x43);

// ---------------------------------------------------------------------------
// Central panel – selected row
// ---------------------------------------------------------------------------

/// Render the central panel: error, "no results", or the selected row.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🎥 LongVideoBench Dataset Viewer");
    ui.add_space(6.0);

    if let Some(err) = &state.error {
        ui.label(RichText::new(err.to_string()).color(Color32::RED));
        return;
    }

    let Some(table) = state.table.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to start  (File → Open…)");
        });
        return;
    };

    if table.is_empty() {
        ui.label("The dataset has no rows.");
        return;
    }

    if state.visible_indices.is_empty() {
        let warn = ui.visuals().warn_fg_color;
        ui.label(RichText::new("No videos match the selected filters.").color(warn));
        return;
    }

    row_selector(ui, state, &table);

    let Some(row) = state.selected_row() else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols: &mut [Ui]| {
                video_player(&mut cols[0], row);
                basic_info(&mut cols[1], row);
            });
            ui.separator();
            question(ui, row);
            ui.separator();
            full_row(ui, row);
        });
}

fn row_selector(ui: &mut Ui, state: &mut AppState, table: &VideoTable) {
    let mut selected = state.selected;
    let current = state.selected_row().map(row_label).unwrap_or_default();

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Select video");
        egui::ComboBox::from_id_salt("row_selector")
            .selected_text(current)
            .width(ui.available_width().min(480.0))
            .height(400.0)
            .show_ui(ui, |ui: &mut Ui| {
                for (pos, &idx) in state.visible_indices.iter().enumerate() {
                    ui.selectable_value(&mut selected, pos, row_label(&table.rows[idx]));
                }
            });
    });

    if selected != state.selected {
        state.select(selected);
    }
}

fn video_player(ui: &mut Ui, row: &DatasetRow) {
    ui.heading("Video player");
    let embed = embed_url(&row.video_id);
    ui.label(RichText::new(&embed).monospace());
    if ui.button("▶ Play in browser").clicked() {
        ui.ctx().open_url(egui::OpenUrl::new_tab(&embed));
    }
    ui.hyperlink_to("Open on YouTube", watch_url(&row.video_id));
}

fn basic_info(ui: &mut Ui, row: &DatasetRow) {
    ui.heading("Basic info");
    egui::Grid::new("basic_info")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for (key, value) in info_fields(row) {
                ui.strong(key);
                ui.label(value);
                ui.end_row();
            }
        });
}

fn question(ui: &mut Ui, row: &DatasetRow) {
    ui.heading("Question");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.strong("Question:");
        ui.label(row.question.as_str());
    });

    ui.strong("Options:");
    for line in option_lines(row) {
        let text = format!("Option {}: {}", line.index, line.text);
        if line.correct {
            ui.label(
                RichText::new(format!("✅ {text}"))
                    .strong()
                    .color(CORRECT_COLOR),
            );
        } else {
            ui.label(format!("• {text}"));
        }
    }
}

fn full_row(ui: &mut Ui, row: &DatasetRow) {
    egui::CollapsingHeader::new("Show full row")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let json = serde_json::to_string_pretty(&row_json(row))
                .unwrap_or_else(|e| format!("cannot serialize row: {e}"));
            ui.add(
                egui::TextEdit::multiline(&mut json.as_str())
                    .code_editor()
                    .desired_width(f32::INFINITY),
            );
        });
}
