use std::fmt::Display;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::DURATION_STEP;
use crate::data::filter::{choices, Choice};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (Some(table), Some(filters)) = (state.table.clone(), state.filters.clone()) else {
        ui.label("No dataset loaded.");
        return;
    };

    // Edit a copy; the state refilters once if anything changed.
    let mut draft = filters;
    let mut reset = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            choice_combo(ui, "topic", "Topic category", &mut draft.topic, &choices(&table.topics));
            choice_combo(
                ui,
                "question_category",
                "Question category",
                &mut draft.question_category,
                &choices(&table.question_categories),
            );
            choice_combo(
                ui,
                "duration_group",
                "Duration group (s)",
                &mut draft.duration_group,
                &choices(&table.duration_groups),
            );
            ui.separator();

            ui.strong("Duration (s)");
            let (min, max) = table.duration_bounds;
            // Only user edits are clamped; values are rounded for display only.
            let low_changed = ui
                .add(
                    egui::Slider::new(&mut draft.duration.low, min..=max)
                        .text("from")
                        .step_by(DURATION_STEP)
                        .clamping(egui::SliderClamping::Edits)
                        .custom_formatter(|v, _| format!("{v:.1}"))
                        .suffix(" s"),
                )
                .changed();
            let high_changed = ui
                .add(
                    egui::Slider::new(&mut draft.duration.high, min..=max)
                        .text("to")
                        .step_by(DURATION_STEP)
                        .clamping(egui::SliderClamping::Edits)
                        .custom_formatter(|v, _| format!("{v:.1}"))
                        .suffix(" s"),
                )
                .changed();
            if low_changed || high_changed {
                draft.duration = draft.duration.pinned((min, max), DURATION_STEP);
            }
            if draft.duration.low > draft.duration.high {
                if low_changed && !high_changed {
                    draft.duration.high = draft.duration.low;
                } else {
                    draft.duration.low = draft.duration.high;
                }
            }
            ui.separator();

            ui.label(format!(
                "Showing {} / {}",
                state.visible_indices.len(),
                table.len()
            ));
            reset = ui.button("Reset filters").clicked();
        });

    if reset {
        state.reset_filters();
    } else {
        state.update_filters(|f| *f = draft);
    }
}

/// A selector over `All` plus the column's distinct values.
fn choice_combo<T: Clone + PartialEq + Display>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &mut Choice<T>,
    options: &[Choice<T>],
) {
    ui.strong(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                ui.selectable_value(current, option.clone(), option.to_string());
            }
        });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if state.table.is_some() {
            ui.label(format!(
                "{} / {} rows",
                state.visible_indices.len(),
                state.total_rows()
            ));
            ui.separator();
        }

        ui.label(RichText::new(state.store.path().display().to_string()).weak());

        if state.error.is_some() {
            ui.label(RichText::new("load failed").color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open benchmark data")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open(path);
    }
}
