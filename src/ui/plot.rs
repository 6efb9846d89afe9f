use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::analysis::gage::{GageRrMetrics, ReproducibilityReport};
use crate::color::{METRIC_COLORS, operator_colors};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart area (central panel, below the table)
// ---------------------------------------------------------------------------

/// Render the title and every available bar chart, remembering their screen
/// area for PNG export.
pub fn charts(ui: &mut Ui, state: &mut AppState) {
    if state.metrics.is_none() && state.report.is_none() {
        state.chart_rect = None;
        ui.label("Enter measurements and press “Store & analyze” to chart them.");
        return;
    }

    let height = state.config.chart_height;
    let response = ui
        .vertical(|ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(&state.chart_title);
            });
            if let Some(metrics) = &state.metrics {
                metric_chart(ui, metrics, height);
            }
            if let Some(report) = &state.report {
                ui.add_space(8.0);
                operator_chart(ui, report, height);
            }
        })
        .response;
    state.chart_rect = Some(response.rect);
}

/// Repeatability / reproducibility / total variation bars.
fn metric_chart(ui: &mut Ui, metrics: &GageRrMetrics, height: f32) {
    let bars: Vec<(String, f64, Color32)> = metrics
        .entries()
        .iter()
        .zip(METRIC_COLORS)
        .map(|(&(label, value), color)| (label.to_string(), value, color))
        .collect();
    bar_chart(ui, "metric_chart", &bars, height);
}

/// One bar per operator: that operator's variance.
fn operator_chart(ui: &mut Ui, report: &ReproducibilityReport, height: f32) {
    let variances = report.operator_variances();
    let names: Vec<String> = variances.iter().map(|(name, _)| name.clone()).collect();
    let bars: Vec<(String, f64, Color32)> = variances
        .into_iter()
        .zip(operator_colors(&names))
        .map(|((name, value), color)| (name, value, color))
        .collect();
    bar_chart(ui, "operator_chart", &bars, height);
}

/// Categorical bar chart with the y axis starting at zero.
///
/// Non-finite values keep their category label but draw no bar.
fn bar_chart(ui: &mut Ui, id: &str, bars: &[(String, f64, Color32)], height: f32) {
    let labels: Vec<String> = bars.iter().map(|(label, _, _)| label.clone()).collect();
    let chart_bars: Vec<Bar> = bars
        .iter()
        .enumerate()
        .filter(|(_, (_, value, _))| value.is_finite())
        .map(|(i, (label, value, color))| {
            Bar::new(i as f64, *value)
                .name(label)
                .fill(*color)
                .width(0.6)
        })
        .collect();

    Plot::new(id)
        .height(height)
        .y_axis_label("Variance")
        .include_y(0.0)
        .include_x(-0.5)
        .include_x(bars.len() as f64 - 0.5)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(chart_bars).name("Variance"));
        });
}

/// Label for an x grid mark; only integral positions name a category.
fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_on_integral_marks() {
        let labels = vec!["Repeatability".to_string(), "Reproducibility".to_string()];
        assert_eq!(category_label(&labels, 0.0), "Repeatability");
        assert_eq!(category_label(&labels, 1.0), "Reproducibility");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 7.0), "");
    }
}
