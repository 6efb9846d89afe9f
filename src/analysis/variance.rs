use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Values sharing a group key (operator or part name).
pub type Groups = BTreeMap<String, Vec<f64>>;

/// Bucket `(key, value)` pairs into [`Groups`].
pub fn group_by<'a, I>(pairs: I) -> Groups
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut groups = Groups::new();
    for (key, value) in pairs {
        groups.entry(key.to_string()).or_default().push(value);
    }
    groups
}

// ---------------------------------------------------------------------------
// Variance
// ---------------------------------------------------------------------------

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance: mean squared deviation from the mean (divides by N).
///
/// An empty slice gives NaN.
pub fn group_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Mean of [`group_variance`] over every group. NaN when there are no groups.
pub fn average_group_variance(groups: &Groups) -> f64 {
    let total: f64 = groups.values().map(|vals| group_variance(vals)).sum();
    total / groups.len() as f64
}

/// Population variance of all values pooled together.
pub fn overall_variance(all_values: &[f64]) -> f64 {
    group_variance(all_values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_has_zero_variance() {
        assert_eq!(group_variance(&[3.7]), 0.0);
    }

    #[test]
    fn textbook_variance() {
        let v = group_variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((v - 4.0).abs() < 1e-12);
    }

    #[test]
    fn divides_by_n_not_n_minus_one() {
        // sample variance of [1, 3] would be 2.0
        assert!((group_variance(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_inputs_are_nan() {
        assert!(group_variance(&[]).is_nan());
        assert!(average_group_variance(&Groups::new()).is_nan());
    }

    #[test]
    fn average_over_groups() {
        let groups = group_by([("a", 1.0), ("a", 3.0), ("b", 5.0), ("b", 5.0)]);
        assert_eq!(groups.len(), 2);
        // (1.0 + 0.0) / 2
        assert!((average_group_variance(&groups) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn group_by_keeps_every_value_once() {
        let groups = group_by([("x", 1.0), ("y", 2.0), ("x", 3.0)]);
        assert_eq!(groups["x"], vec![1.0, 3.0]);
        assert_eq!(groups["y"], vec![2.0]);
        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn empty_group_poisons_the_average() {
        let mut groups = group_by([("a", 1.0), ("a", 2.0)]);
        groups.insert("b".to_string(), Vec::new());
        assert!(average_group_variance(&groups).is_nan());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn bounded_vec(min_len: usize, max_len: usize) -> BoxedStrategy<Vec<f64>> {
        proptest::collection::vec(-1e3_f64..1e3, min_len..=max_len).boxed()
    }

    proptest! {
        #[test]
        fn variance_is_shift_invariant(values in bounded_vec(1, 40), shift in -1e3_f64..1e3) {
            let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
            let a = group_variance(&values);
            let b = group_variance(&shifted);
            prop_assert!((a - b).abs() <= 1e-6 * (1.0 + a.abs()), "{a} vs {b}");
        }

        #[test]
        fn variance_is_non_negative(values in bounded_vec(1, 40)) {
            prop_assert!(group_variance(&values) >= 0.0);
        }

        #[test]
        fn constant_group_has_zero_variance(value in -1e3_f64..1e3, n in 1usize..20) {
            let values = vec![value; n];
            prop_assert!(group_variance(&values).abs() < 1e-9);
        }
    }
}
