use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// MeasurementRecord – one numeric cell of the table
// ---------------------------------------------------------------------------

/// A single measurement: who measured which part on which trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub operator: String,
    pub part: String,
    /// 1-based trial (row) number.
    pub trial: u32,
    pub value: f64,
}

/// Largest trial number a table accepts; rows are allocated up to it.
pub const MAX_TRIALS: u32 = 10_000;

/// Parse a table cell. Empty, non-numeric or non-finite text (`NaN`, `inf`)
/// yields `None`.
pub fn parse_cell(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// MeasurementTable – operators as columns, trials as rows
// ---------------------------------------------------------------------------

/// Editable measurement grid. Every row holds exactly one cell per operator.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTable {
    /// Column headers, i.e. the known operators.
    operators: Vec<String>,
    /// `rows[trial][operator]` raw cell text.
    rows: Vec<Vec<String>>,
}

impl MeasurementTable {
    /// One unnamed operator column and `trials` empty rows.
    pub fn new(trials: usize) -> Self {
        Self {
            operators: vec![String::new()],
            rows: vec![vec![String::new()]; trials],
        }
    }

    pub fn operators(&self) -> &[String] {
        &self.operators
    }

    /// Number of trial rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of operator columns.
    pub fn n_cols(&self) -> usize {
        self.operators.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut String> {
        self.rows.get_mut(row)?.get_mut(col)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, text: impl Into<String>) {
        if let Some(cell) = self.cell_mut(row, col) {
            *cell = text.into();
        }
    }

    /// Append an operator column with one empty cell per existing row.
    pub fn add_operator(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingOperatorName);
        }
        if self.operators.iter().any(|op| op == name) {
            return Err(ValidationError::DuplicateOperator(name.to_string()));
        }
        self.operators.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        Ok(())
    }

    /// Rename the column at `index`. Out-of-range indices are ignored.
    pub fn rename_operator(&mut self, index: usize, name: &str) {
        if let Some(op) = self.operators.get_mut(index) {
            *op = name.trim().to_string();
        }
    }

    /// Append one empty trial row and return its index.
    pub fn add_trial(&mut self) -> usize {
        self.rows.push(vec![String::new(); self.operators.len()]);
        self.rows.len() - 1
    }

    /// Collect every numeric cell as a record for `part`, row-major.
    pub fn records(&self, part: &str) -> Vec<MeasurementRecord> {
        let mut records = Vec::new();
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col_idx, text) in row.iter().enumerate() {
                if let Some(value) = parse_cell(text) {
                    records.push(MeasurementRecord {
                        operator: self.operators[col_idx].clone(),
                        part: part.to_string(),
                        trial: row_idx as u32 + 1,
                        value,
                    });
                }
            }
        }
        records
    }

    /// Numeric values of each operator column, in column order.
    pub fn operator_values(&self) -> Vec<(String, Vec<f64>)> {
        self.operators
            .iter()
            .enumerate()
            .map(|(col_idx, name)| {
                let values = self
                    .rows
                    .iter()
                    .filter_map(|row| parse_cell(&row[col_idx]))
                    .collect();
                (name.clone(), values)
            })
            .collect()
    }

    /// Rebuild a table from records of a single part.
    ///
    /// Operators appear in first-seen order; rows span trial 1 up to the
    /// largest trial seen. A later record for the same cell overwrites an
    /// earlier one. Trials outside `1..=MAX_TRIALS` are skipped.
    pub fn from_records(records: &[MeasurementRecord]) -> Self {
        let mut operators: Vec<String> = Vec::new();
        for r in records {
            if !operators.contains(&r.operator) {
                operators.push(r.operator.clone());
            }
        }
        if operators.is_empty() {
            operators.push(String::new());
        }
        let in_range = |r: &&MeasurementRecord| (1..=MAX_TRIALS).contains(&r.trial);
        let n_rows = records
            .iter()
            .filter(in_range)
            .map(|r| r.trial as usize)
            .max()
            .unwrap_or(0);
        let mut table = Self {
            rows: vec![vec![String::new(); operators.len()]; n_rows],
            operators,
        };
        for r in records.iter().filter(in_range) {
            if let Some(col) = table.operators.iter().position(|op| *op == r.operator) {
                table.set_cell(r.trial as usize - 1, col, r.value.to_string());
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> MeasurementTable {
        let mut t = MeasurementTable::new(3);
        t.rename_operator(0, "Ann");
        t.set_cell(0, 0, "10.1");
        t.set_cell(1, 0, "abc");
        t.set_cell(2, 0, " 9.9 ");
        t
    }

    #[test]
    fn parse_cell_accepts_numbers_only() {
        assert_eq!(parse_cell("1.5"), Some(1.5));
        assert_eq!(parse_cell("  -2e3 "), Some(-2000.0));
        assert_eq!(parse_cell(""), None);
        assert_eq!(parse_cell("   "), None);
        assert_eq!(parse_cell("12mm"), None);
        assert_eq!(parse_cell("NaN"), None);
        assert_eq!(parse_cell("inf"), None);
        assert_eq!(parse_cell("-infinity"), None);
    }

    #[test]
    fn adding_operator_keeps_existing_values() {
        let mut t = filled();
        let before: Vec<Option<String>> =
            (0..3).map(|r| t.cell(r, 0).map(str::to_string)).collect();

        t.add_operator("Bob").unwrap();

        assert_eq!(t.n_cols(), 2);
        for r in 0..3 {
            assert_eq!(t.cell(r, 0).map(str::to_string), before[r]);
            assert_eq!(t.cell(r, 1), Some(""));
            assert_eq!(t.cell(r, 2), None);
        }
    }

    #[test]
    fn add_operator_rejects_blank_and_duplicates() {
        let mut t = filled();
        assert_eq!(t.add_operator("  "), Err(ValidationError::MissingOperatorName));
        assert_eq!(
            t.add_operator("Ann"),
            Err(ValidationError::DuplicateOperator("Ann".into()))
        );
        assert_eq!(t.n_cols(), 1);
    }

    #[test]
    fn add_trial_appends_full_width_row() {
        let mut t = filled();
        t.add_operator("Bob").unwrap();
        let idx = t.add_trial();
        assert_eq!(idx, 3);
        assert_eq!(t.n_rows(), 4);
        assert_eq!(t.cell(3, 1), Some(""));
    }

    #[test]
    fn records_skip_non_numeric_cells() {
        let t = filled();
        let recs = t.records("P1");
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].trial, 1);
        assert_eq!(recs[1].trial, 3);
        assert_eq!(recs[1].value, 9.9);
        assert!(recs.iter().all(|r| r.operator == "Ann" && r.part == "P1"));
    }

    #[test]
    fn operator_values_follow_column_order() {
        let mut t = filled();
        t.add_operator("Bob").unwrap();
        t.set_cell(1, 1, "10.0");
        let cols = t.operator_values();
        assert_eq!(cols[0], ("Ann".to_string(), vec![10.1, 9.9]));
        assert_eq!(cols[1], ("Bob".to_string(), vec![10.0]));
    }

    #[test]
    fn from_records_rebuilds_grid() {
        let recs = vec![
            MeasurementRecord { operator: "Ann".into(), part: "P".into(), trial: 1, value: 1.0 },
            MeasurementRecord { operator: "Bob".into(), part: "P".into(), trial: 3, value: 2.5 },
        ];
        let t = MeasurementTable::from_records(&recs);
        assert_eq!(t.operators(), ["Ann".to_string(), "Bob".to_string()]);
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.cell(0, 0), Some("1"));
        assert_eq!(t.cell(2, 1), Some("2.5"));
        assert_eq!(t.cell(1, 1), Some(""));
        assert_eq!(t.records("P"), recs);
    }

    #[test]
    fn from_records_skips_out_of_range_trials() {
        let recs = vec![
            MeasurementRecord { operator: "Ann".into(), part: "P".into(), trial: 2, value: 1.0 },
            MeasurementRecord { operator: "Ann".into(), part: "P".into(), trial: u32::MAX, value: 9.0 },
        ];
        let t = MeasurementTable::from_records(&recs);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.records("P").len(), 1);
    }
}
