//! Gage R&R figures built on [`super::variance`].

use crate::data::model::MeasurementRecord;

use super::tolerance::{Interpretation, percent_of_tolerance};
use super::variance::{average_group_variance, group_by, group_variance, mean, overall_variance};

// ---------------------------------------------------------------------------
// Three-metric breakdown over a record list
// ---------------------------------------------------------------------------

/// Variance breakdown shown by the "Store & analyze" action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GageRrMetrics {
    /// Average within-part variance.
    pub repeatability: f64,
    /// Average within-operator variance.
    pub reproducibility: f64,
    /// Variance of every measurement pooled.
    pub total_variation: f64,
}

impl GageRrMetrics {
    /// `(label, value)` pairs in chart order.
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            ("Repeatability", self.repeatability),
            ("Reproducibility", self.reproducibility),
            ("Total Variation", self.total_variation),
        ]
    }
}

/// Group `records` by part and by operator and average the group variances.
pub fn calculate_gage_rr(records: &[MeasurementRecord]) -> GageRrMetrics {
    let by_part = group_by(records.iter().map(|r| (r.part.as_str(), r.value)));
    let by_operator = group_by(records.iter().map(|r| (r.operator.as_str(), r.value)));
    let all: Vec<f64> = records.iter().map(|r| r.value).collect();

    GageRrMetrics {
        repeatability: average_group_variance(&by_part),
        reproducibility: average_group_variance(&by_operator),
        total_variation: overall_variance(&all),
    }
}

// ---------------------------------------------------------------------------
// Reproducibility report over per-operator columns
// ---------------------------------------------------------------------------

/// One operator's column in the report.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorSummary {
    pub operator: String,
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    /// `mean - nominal`.
    pub bias: f64,
}

/// Reproducibility against a tolerance band.
#[derive(Debug, Clone, PartialEq)]
pub struct ReproducibilityReport {
    pub nominal: f64,
    pub tolerance: f64,
    /// In table column order.
    pub operators: Vec<OperatorSummary>,
    /// Average of the per-operator variances.
    pub repeatability: f64,
    /// Population variance of the operator means.
    pub reproducibility: f64,
    pub total_variation: f64,
    /// `sqrt(reproducibility)`.
    pub std_dev: f64,
    pub percent_of_tolerance: f64,
    pub interpretation: Interpretation,
}

impl ReproducibilityReport {
    /// `(operator, variance)` pairs for the per-operator chart.
    pub fn operator_variances(&self) -> Vec<(String, f64)> {
        self.operators
            .iter()
            .map(|s| (s.operator.clone(), s.variance))
            .collect()
    }
}

/// Build the report from ordered `(operator, values)` columns.
///
/// Operators with no values are kept; their NaN mean propagates into the
/// reproducibility figure.
pub fn reproducibility_report(
    operator_values: &[(String, Vec<f64>)],
    nominal: f64,
    tolerance: f64,
) -> ReproducibilityReport {
    let operators: Vec<OperatorSummary> = operator_values
        .iter()
        .map(|(name, values)| {
            let m = mean(values);
            OperatorSummary {
                operator: name.clone(),
                count: values.len(),
                mean: m,
                variance: group_variance(values),
                bias: m - nominal,
            }
        })
        .collect();

    let means: Vec<f64> = operators.iter().map(|s| s.mean).collect();
    let variances: Vec<f64> = operators.iter().map(|s| s.variance).collect();
    let all: Vec<f64> = operator_values
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .collect();

    let reproducibility = group_variance(&means);
    let std_dev = reproducibility.sqrt();
    let percent = percent_of_tolerance(std_dev, tolerance);

    ReproducibilityReport {
        nominal,
        tolerance,
        operators,
        repeatability: mean(&variances),
        reproducibility,
        total_variation: overall_variance(&all),
        std_dev,
        percent_of_tolerance: percent,
        interpretation: Interpretation::from_percent(percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(operator: &str, part: &str, trial: u32, value: f64) -> MeasurementRecord {
        MeasurementRecord {
            operator: operator.to_string(),
            part: part.to_string(),
            trial,
            value,
        }
    }

    #[test]
    fn single_part_single_operator() {
        let records = vec![
            rec("Ann", "P1", 1, 2.0),
            rec("Ann", "P1", 2, 4.0),
            rec("Ann", "P1", 3, 4.0),
            rec("Ann", "P1", 4, 4.0),
            rec("Ann", "P1", 5, 5.0),
            rec("Ann", "P1", 6, 5.0),
            rec("Ann", "P1", 7, 7.0),
            rec("Ann", "P1", 8, 9.0),
        ];
        let m = calculate_gage_rr(&records);
        assert!((m.repeatability - 4.0).abs() < 1e-12);
        assert!((m.reproducibility - 4.0).abs() < 1e-12);
        assert!((m.total_variation - 4.0).abs() < 1e-12);
    }

    #[test]
    fn groups_split_by_part_and_operator() {
        let records = vec![
            rec("Ann", "P1", 1, 1.0),
            rec("Ann", "P2", 1, 3.0),
            rec("Bob", "P1", 1, 1.0),
            rec("Bob", "P2", 1, 3.0),
        ];
        let m = calculate_gage_rr(&records);
        // each part is constant
        assert_eq!(m.repeatability, 0.0);
        // each operator sees {1, 3}
        assert!((m.reproducibility - 1.0).abs() < 1e-12);
        assert!((m.total_variation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_records_yield_nan() {
        let m = calculate_gage_rr(&[]);
        assert!(m.repeatability.is_nan());
        assert!(m.reproducibility.is_nan());
        assert!(m.total_variation.is_nan());
    }

    #[test]
    fn entries_are_in_chart_order() {
        let m = GageRrMetrics {
            repeatability: 1.0,
            reproducibility: 2.0,
            total_variation: 3.0,
        };
        let labels: Vec<&str> = m.entries().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, ["Repeatability", "Reproducibility", "Total Variation"]);
    }

    #[test]
    fn report_uses_variance_of_operator_means() {
        let cols = vec![
            ("Ann".to_string(), vec![9.0, 11.0]),
            ("Bob".to_string(), vec![11.0, 13.0]),
        ];
        let r = reproducibility_report(&cols, 10.0, 10.0);
        assert_eq!(r.operators.len(), 2);
        assert_eq!(r.operators[0].mean, 10.0);
        assert_eq!(r.operators[1].bias, 2.0);
        // means 10 and 12
        assert!((r.reproducibility - 1.0).abs() < 1e-12);
        assert!((r.std_dev - 1.0).abs() < 1e-12);
        assert!((r.percent_of_tolerance - 30.0).abs() < 1e-9);
        assert_eq!(r.interpretation, Interpretation::Marginal);
        assert!((r.repeatability - 1.0).abs() < 1e-12);
        assert_eq!(
            r.operator_variances(),
            vec![("Ann".to_string(), 1.0), ("Bob".to_string(), 1.0)]
        );
    }

    #[test]
    fn identical_operators_are_excellent() {
        let cols = vec![
            ("Ann".to_string(), vec![5.0, 5.2, 4.8]),
            ("Bob".to_string(), vec![5.2, 4.8, 5.0]),
        ];
        let r = reproducibility_report(&cols, 5.0, 0.5);
        assert!(r.reproducibility.abs() < 1e-12);
        assert_eq!(r.interpretation, Interpretation::Excellent);
    }

    #[test]
    fn empty_operator_list_is_nan() {
        let r = reproducibility_report(&[], 1.0, 1.0);
        assert!(r.reproducibility.is_nan());
        assert!(r.percent_of_tolerance.is_nan());
        assert_eq!(r.interpretation, Interpretation::Poor);
    }

    #[test]
    fn zero_tolerance_is_infinite_percent() {
        let cols = vec![
            ("Ann".to_string(), vec![1.0]),
            ("Bob".to_string(), vec![3.0]),
        ];
        let r = reproducibility_report(&cols, 2.0, 0.0);
        assert!(r.percent_of_tolerance.is_infinite());
        assert_eq!(r.interpretation, Interpretation::Poor);
    }
}
