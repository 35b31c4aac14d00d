//! Area under the ROC curve

use std::cmp::Ordering;

/// One-vs-rest ROC area from (score, is_positive) pairs
///
/// Equals the trapezoidal area over all score thresholds: the probability
/// that a random positive outscores a random negative, ties counting half.
/// NaN when either class is absent.
pub fn area_under_roc(scored: &[(f64, bool)]) -> f64 {
    let positives = scored.iter().filter(|(_, p)| *p).count();
    let negatives = scored.len() - positives;
    if positives == 0 || negatives == 0 {
        return f64::NAN;
    }

    let mut sorted: Vec<(f64, bool)> = scored.to_vec();
    sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut area = 0.0;
    let mut negatives_below = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let score = sorted[i].0;
        let mut pos_tied = 0usize;
        let mut neg_tied = 0usize;
        while i < sorted.len() && sorted[i].0 == score {
            if sorted[i].1 {
                pos_tied += 1;
            } else {
                neg_tied += 1;
            }
            i += 1;
        }
        area += pos_tied as f64 * (negatives_below as f64 + 0.5 * neg_tied as f64);
        negatives_below += neg_tied;
    }

    area / (positives as f64 * negatives as f64)
}
