use eframe::egui::{self, Color32, RichText, ScrollArea, TextEdit, Ui};

use crate::data::loader;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – header, table actions, report inputs
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Header ----
            ui.heading("Header");
            ui.separator();
            let editable = !state.header_locked;
            ui.label("Operator");
            ui.add_enabled(editable, TextEdit::singleline(&mut state.operator_input));
            ui.label("Part");
            ui.add_enabled(editable, TextEdit::singleline(&mut state.part_input));
            if ui
                .add_enabled(editable, egui::Button::new("Apply header"))
                .clicked()
            {
                if let Err(e) = state.apply_header() {
                    state.notify(e);
                }
            }
            ui.add_space(12.0);

            // ---- Table ----
            ui.heading("Table");
            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                ui.add(
                    TextEdit::singleline(&mut state.new_operator_input)
                        .hint_text("Operator name")
                        .desired_width(120.0),
                );
                if ui.button("Add operator").clicked() {
                    if let Err(e) = state.add_operator() {
                        state.notify(e);
                    }
                }
            });
            if ui.button("Add trial").clicked() {
                state.add_trial();
            }
            if ui.button("Store & analyze").clicked() {
                state.store_measurements();
            }
            ui.add_space(12.0);

            // ---- Reproducibility report ----
            ui.heading("Tolerance");
            ui.separator();
            egui::Grid::new("tolerance_inputs")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    ui.label("Nominal");
                    ui.add(TextEdit::singleline(&mut state.nominal_input).desired_width(90.0));
                    ui.end_row();
                    ui.label("Tolerance ±");
                    ui.add(TextEdit::singleline(&mut state.tolerance_input).desired_width(90.0));
                    ui.end_row();
                });
            if ui.button("Reproducibility report").clicked() {
                if let Err(e) = state.compute_report() {
                    state.notify(e);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Result summary
// ---------------------------------------------------------------------------

fn fmt_value(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Textual metrics under the table.
pub fn summary(ui: &mut Ui, state: &AppState) {
    let decimals = state.config.decimals;

    if let Some(m) = &state.metrics {
        ui.heading("Gage R&R Metrics");
        egui::Grid::new("metric_summary")
            .num_columns(2)
            .show(ui, |ui: &mut Ui| {
                for (label, value) in m.entries() {
                    ui.strong(format!("{label}:"));
                    ui.label(fmt_value(value, decimals));
                    ui.end_row();
                }
            });
        ui.add_space(8.0);
    }

    if let Some(r) = &state.report {
        ui.heading("Reproducibility Report");
        egui::Grid::new("operator_summary")
            .num_columns(5)
            .striped(true)
            .show(ui, |ui: &mut Ui| {
                for title in ["Operator", "n", "Mean", "Variance", "Bias"] {
                    ui.strong(title);
                }
                ui.end_row();
                for op in &r.operators {
                    ui.label(&op.operator);
                    ui.label(op.count.to_string());
                    ui.label(fmt_value(op.mean, decimals));
                    ui.label(fmt_value(op.variance, decimals));
                    ui.label(fmt_value(op.bias, decimals));
                    ui.end_row();
                }
            });
        ui.add_space(4.0);
        egui::Grid::new("report_summary")
            .num_columns(2)
            .show(ui, |ui: &mut Ui| {
                let rows = [
                    ("Nominal", fmt_value(r.nominal, decimals)),
                    ("Tolerance ±", fmt_value(r.tolerance, decimals)),
                    ("Repeatability", fmt_value(r.repeatability, decimals)),
                    ("Reproducibility", fmt_value(r.reproducibility, decimals)),
                    ("Total Variation", fmt_value(r.total_variation, decimals)),
                    ("Std. deviation", fmt_value(r.std_dev, decimals)),
                    ("% of tolerance", format!("{:.2}%", r.percent_of_tolerance)),
                ];
                for (label, value) in rows {
                    ui.strong(format!("{label}:"));
                    ui.label(value);
                    ui.end_row();
                }
                ui.strong("Verdict:");
                ui.label(RichText::new(r.interpretation.label()).strong());
                ui.end_row();
            });
        ui.add_space(8.0);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Import measurements…").clicked() {
                import_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export measurements…").clicked() {
                export_csv_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        if ui.button("Export PNG").clicked() && state.request_export().is_some() {
            ui.ctx()
                .send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
        }

        ui.separator();

        ui.label(format!(
            "{} operators × {} trials",
            state.table.n_cols(),
            state.table.n_rows()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn import_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Import measurements")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let result = loader::load_file(&path).and_then(|records| state.import_records(records));
        if let Err(e) = result {
            log::error!("Failed to import {}: {e:#}", path.display());
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn export_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export measurements")
        .set_file_name(format!("GageRR_{}.csv", state.part_input.trim()))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        let records = state.collect_records();
        match loader::save_csv(&path, &records) {
            Ok(()) => {
                log::info!("Exported {} measurements to {}", records.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export measurements: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_use_configured_decimals() {
        assert_eq!(fmt_value(1.0 / 3.0, 4), "0.3333");
        assert_eq!(fmt_value(2.6, 0), "3");
        assert_eq!(fmt_value(f64::NAN, 4), "NaN");
        assert_eq!(fmt_value(f64::INFINITY, 4), "inf");
    }
}
