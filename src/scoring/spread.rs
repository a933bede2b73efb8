//! Pairwise dissimilarity of ordinal codes.

/// Mean over all unordered pairs of `sqrt(|a - b|)`.
///
/// Returns 0 for fewer than two values. The square root keeps a single
/// outlier from dominating while every disagreement still counts.
///
/// # Examples
///
/// ```
/// use suite_alloc::scoring::pairwise_spread;
///
/// assert_eq!(pairwise_spread(&[2, 2, 2]), 0.0);
/// assert!((pairwise_spread(&[1, 5]) - 2.0).abs() < 1e-12);
/// ```
pub fn pairwise_spread(values: &[u32]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, &a) in values.iter().enumerate() {
        for &b in &values[i + 1..] {
            sum += (a.abs_diff(b) as f64).sqrt();
        }
    }
    let pairs = (n * (n - 1) / 2) as f64;
    sum / pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(pairwise_spread(&[]), 0.0);
        assert_eq!(pairwise_spread(&[4]), 0.0);
    }

    #[test]
    fn test_known_values() {
        // pairs: (0,1)=1, (0,4)=2, (1,4)=sqrt(3)
        let expected = (1.0 + 2.0 + 3f64.sqrt()) / 3.0;
        assert!((pairwise_spread(&[0, 1, 4]) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_order_independent() {
        let a = pairwise_spread(&[3, 0, 2, 1]);
        let b = pairwise_spread(&[0, 1, 2, 3]);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_tight_cluster_beats_outlier_spread() {
        assert!(pairwise_spread(&[1, 1, 2, 2]) < pairwise_spread(&[0, 0, 0, 3]));
    }
}
