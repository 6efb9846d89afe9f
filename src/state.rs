use anyhow::{Result, bail};
use eframe::egui::Rect;

use crate::analysis::gage::{
    GageRrMetrics, ReproducibilityReport, calculate_gage_rr, reproducibility_report,
};
use crate::config::AppConfig;
use crate::data::loader::single_part;
use crate::data::model::{MAX_TRIALS, MeasurementRecord, MeasurementTable, parse_cell};
use crate::error::ValidationError;
use crate::export::{CHART_TITLE, chart_caption, export_file_name};
use crate::ui::navigation::CellPos;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The whole session, independent of rendering. Every button and key
/// handler is a method here.
pub struct AppState {
    pub config: AppConfig,

    /// Header text fields.
    pub operator_input: String,
    pub part_input: String,
    /// Set once the header is applied; the fields become read-only.
    pub header_locked: bool,

    /// Measurement grid: known operators × trials.
    pub table: MeasurementTable,

    /// Name typed for the next operator column.
    pub new_operator_input: String,

    /// Report inputs.
    pub nominal_input: String,
    pub tolerance_input: String,

    /// Latest "Store & analyze" result.
    pub metrics: Option<GageRrMetrics>,
    /// Latest reproducibility report.
    pub report: Option<ReproducibilityReport>,

    /// Title drawn above the charts; carries the caption after an export.
    pub chart_title: String,

    /// Blocking notification shown in a modal until dismissed.
    pub notice: Option<String>,
    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// Cell to focus on the next frame.
    pub pending_focus: Option<CellPos>,
    /// File name waiting for the next screenshot.
    pub pending_export: Option<String>,
    /// Screen area of the charts in the last frame.
    pub chart_rect: Option<Rect>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let table = MeasurementTable::new(config.initial_trials);
        Self {
            config,
            operator_input: String::new(),
            part_input: String::new(),
            header_locked: false,
            table,
            new_operator_input: String::new(),
            nominal_input: String::new(),
            tolerance_input: String::new(),
            metrics: None,
            report: None,
            chart_title: CHART_TITLE.to_string(),
            notice: None,
            status_message: None,
            pending_focus: None,
            pending_export: None,
            chart_rect: None,
        }
    }

    fn operator(&self) -> &str {
        self.operator_input.trim()
    }

    fn part(&self) -> &str {
        self.part_input.trim()
    }

    /// Raise a blocking notification for a rejected action.
    pub fn notify(&mut self, err: ValidationError) {
        log::warn!("{err}");
        self.notice = Some(err.to_string());
    }

    /// Lock the operator/part identifiers. The header operator names the
    /// first table column.
    pub fn apply_header(&mut self) -> Result<(), ValidationError> {
        if self.operator().is_empty() || self.part().is_empty() {
            return Err(ValidationError::MissingHeader);
        }
        let operator = self.operator().to_string();
        if self.table.operators().iter().skip(1).any(|op| *op == operator) {
            return Err(ValidationError::DuplicateOperator(operator));
        }
        self.table.rename_operator(0, &operator);
        self.header_locked = true;
        log::info!("Header applied: operator {operator}, part {}", self.part());
        Ok(())
    }

    /// Records for every numeric cell, tagged with the header part. An
    /// unnamed first column takes the typed header operator.
    pub fn collect_records(&self) -> Vec<MeasurementRecord> {
        let mut records = self.table.records(self.part());
        for record in records.iter_mut().filter(|r| r.operator.is_empty()) {
            record.operator = self.operator().to_string();
        }
        records
    }

    /// Operator columns for the report, with the same naming fallback as
    /// [`AppState::collect_records`].
    fn operator_values(&self) -> Vec<(String, Vec<f64>)> {
        let mut columns = self.table.operator_values();
        for (name, _) in columns.iter_mut().filter(|(name, _)| name.is_empty()) {
            *name = self.operator().to_string();
        }
        columns
    }

    /// Rebuild the records from the table and compute the 3-metric breakdown.
    pub fn store_measurements(&mut self) -> GageRrMetrics {
        let records = self.collect_records();
        let metrics = calculate_gage_rr(&records);
        log::info!(
            "Analyzed {} measurements: repeatability {:.4}, reproducibility {:.4}, total {:.4}",
            records.len(),
            metrics.repeatability,
            metrics.reproducibility,
            metrics.total_variation
        );
        self.metrics = Some(metrics);
        self.chart_title = CHART_TITLE.to_string();
        metrics
    }

    /// Append the operator typed in `new_operator_input` as a new column.
    pub fn add_operator(&mut self) -> Result<(), ValidationError> {
        self.table.add_operator(&self.new_operator_input)?;
        log::info!("Added operator column '{}'", self.new_operator_input.trim());
        self.new_operator_input.clear();
        Ok(())
    }

    /// Append a trial row and return its index.
    pub fn add_trial(&mut self) -> usize {
        let row = self.table.add_trial();
        log::debug!("Added trial {}", row + 1);
        row
    }

    /// Append a trial row and focus its first cell.
    pub fn append_row_and_focus(&mut self) {
        let row = self.add_trial();
        self.pending_focus = Some(CellPos::new(row, 0));
    }

    /// Per-operator reproducibility against `nominal ± tolerance`.
    pub fn compute_report(&mut self) -> Result<&ReproducibilityReport, ValidationError> {
        let nominal = parse_cell(&self.nominal_input).ok_or(ValidationError::InvalidNominal)?;
        let tolerance =
            parse_cell(&self.tolerance_input).ok_or(ValidationError::InvalidTolerance)?;

        let report = reproducibility_report(&self.operator_values(), nominal, tolerance);
        log::info!(
            "Reproducibility {:.4} over {} operators: {:.2}% of tolerance ({})",
            report.reproducibility,
            report.operators.len(),
            report.percent_of_tolerance,
            report.interpretation
        );
        self.chart_title = CHART_TITLE.to_string();
        Ok(&*self.report.insert(report))
    }

    /// Caption the charts and queue a screenshot. Returns the proposed file
    /// name, or `None` when there is nothing drawn yet.
    pub fn request_export(&mut self) -> Option<String> {
        if self.metrics.is_none() && self.report.is_none() {
            self.status_message = Some("Nothing to export: run an analysis first".into());
            log::warn!("Export requested before any chart was drawn");
            return None;
        }
        self.chart_title = chart_caption(self.operator(), self.part());
        let name = export_file_name(self.operator(), self.part());
        self.pending_export = Some(name.clone());
        Some(name)
    }

    /// Replace the table with imported records of a single part.
    pub fn import_records(&mut self, records: Vec<MeasurementRecord>) -> Result<()> {
        let Some(part) = single_part(&records)? else {
            bail!("File contains no numeric measurements");
        };
        if let Some(r) = records.iter().find(|r| r.trial == 0 || r.trial > MAX_TRIALS) {
            bail!("Trial {} is outside 1..={MAX_TRIALS}", r.trial);
        }
        self.table = MeasurementTable::from_records(&records);
        self.operator_input = self.table.operators()[0].clone();
        self.part_input = part;
        self.header_locked = true;
        self.metrics = None;
        self.report = None;
        self.chart_title = CHART_TITLE.to_string();
        self.status_message = None;
        log::info!(
            "Imported {} measurements: {} operators × {} trials",
            records.len(),
            self.table.n_cols(),
            self.table.n_rows()
        );
        Ok(())
    }
}
