//! Cluster classification of local statistics

use lisagrid_core::{ClusterLabel, ClusterSummary, Error, LocalStatistic, Result};

/// Default significance level
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Reject significance levels outside the open interval (0, 1)
pub fn validate_alpha(alpha: f64) -> Result<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(Error::invalid_parameter(
            "alpha",
            alpha,
            "must lie strictly between 0 and 1",
        ));
    }
    Ok(())
}

/// Label each cell by its Moran quadrant when significant, NS otherwise.
///
/// A cell is significant when `p_value <= alpha`. Unclassified quadrants
/// (zero deviation, zero lag, no neighbors) are always NS.
pub fn classify(local: &[LocalStatistic], alpha: f64) -> Result<Vec<ClusterLabel>> {
    validate_alpha(alpha)?;
    Ok(local
        .iter()
        .map(|s| {
            if s.is_isolated() || s.p_value > alpha {
                ClusterLabel::NS
            } else {
                ClusterLabel::from_quadrant(s.quadrant)
            }
        })
        .collect())
}

/// Count cells per label
pub fn summarize(labels: &[ClusterLabel]) -> ClusterSummary {
    ClusterSummary::from_labels(labels)
}
