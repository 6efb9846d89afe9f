use std::fmt;

// ---------------------------------------------------------------------------
// Percent of tolerance consumed by a ±3σ spread
// ---------------------------------------------------------------------------

/// Share of the tolerance width (2 × tolerance) covered by a 6σ spread, in
/// percent.
///
/// A zero tolerance yields `inf` (or NaN when `std_dev` is also zero).
pub fn percent_of_tolerance(std_dev: f64, tolerance: f64) -> f64 {
    (6.0 * std_dev) / (2.0 * tolerance) * 100.0
}

// ---------------------------------------------------------------------------
// Interpretation
// ---------------------------------------------------------------------------

/// Verdict on a percent-of-tolerance figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    Excellent,
    Acceptable,
    Marginal,
    Poor,
}

impl Interpretation {
    /// Strict less-than chain: `< 10`, `< 30`, `< 50`, else poor.
    /// NaN fails every comparison and lands in [`Interpretation::Poor`].
    pub fn from_percent(percent: f64) -> Self {
        if percent < 10.0 {
            Interpretation::Excellent
        } else if percent < 30.0 {
            Interpretation::Acceptable
        } else if percent < 50.0 {
            Interpretation::Marginal
        } else {
            Interpretation::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Interpretation::Excellent => "Excellent",
            Interpretation::Acceptable => "Acceptable",
            Interpretation::Marginal => "Marginal",
            Interpretation::Poor => "Poor",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_sigma_over_tolerance_width() {
        let pct = percent_of_tolerance(1.0, 10.0);
        assert!((pct - 30.0).abs() < 1e-12);
        assert!((percent_of_tolerance(0.5, 10.0) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn boundaries_use_strict_less_than() {
        use Interpretation::*;
        let cases = [
            (0.0, Excellent),
            (9.999, Excellent),
            (10.0, Acceptable),
            (29.999, Acceptable),
            (30.0, Marginal),
            (49.999, Marginal),
            (50.0, Poor),
            (250.0, Poor),
        ];
        for (pct, expected) in cases {
            assert_eq!(Interpretation::from_percent(pct), expected, "percent = {pct}");
        }
    }

    #[test]
    fn one_sigma_on_tolerance_ten_sits_on_marginal_boundary() {
        let pct = percent_of_tolerance(1.0, 10.0);
        assert_eq!(Interpretation::from_percent(pct), Interpretation::Marginal);
        let just_under = percent_of_tolerance(0.9999, 10.0);
        assert_eq!(Interpretation::from_percent(just_under), Interpretation::Acceptable);
    }

    #[test]
    fn degenerate_values_do_not_panic() {
        assert!(percent_of_tolerance(1.0, 0.0).is_infinite());
        assert!(percent_of_tolerance(0.0, 0.0).is_nan());
        assert_eq!(Interpretation::from_percent(f64::NAN), Interpretation::Poor);
        assert_eq!(Interpretation::from_percent(f64::INFINITY), Interpretation::Poor);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(Interpretation::Acceptable.to_string(), "Acceptable");
    }
}
