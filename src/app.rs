use std::sync::Arc;

use eframe::egui::{self, ColorImage, Ui};

use crate::config::AppConfig;
use crate::export;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GageRrApp {
    pub state: AppState,
}

impl GageRrApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }

    /// Save a screenshot that arrived for a pending export.
    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        let screenshot: Option<Arc<ColorImage>> = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(image) = screenshot else {
            return;
        };
        let Some(file_name) = self.state.pending_export.take() else {
            return;
        };

        let result = export::save_screenshot_dialog(
            &file_name,
            &image,
            self.state.chart_rect,
            ctx.pixels_per_point(),
        );
        if let Err(e) = result {
            log::error!("Failed to export chart: {e:#}");
            self.state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    /// Blocking notification for rejected actions.
    fn notice_modal(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.notice.clone() else {
            return;
        };
        let modal = egui::Modal::new(egui::Id::new("notice_modal")).show(ctx, |ui: &mut Ui| {
            ui.set_width(300.0);
            ui.heading("Notice");
            ui.label(&message);
            ui.add_space(8.0);
            ui.button("OK").clicked()
        });
        if modal.inner || modal.should_close() {
            self.state.notice = None;
        }
    }
}

impl eframe::App for GageRrApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_screenshot(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: header and actions ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table, summary, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    table::measurement_table(ui, &mut self.state);
                    ui.separator();
                    panels::summary(ui, &self.state);
                    plot::charts(ui, &mut self.state);
                });
        });

        self.notice_modal(ctx);
    }
}
