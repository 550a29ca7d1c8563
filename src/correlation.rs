// Spatial correlation between the gold candidate and the silver references.
//
// The field geometry is fixed: the gold sample sits between two silver
// references at roughly the same height. References off that level are
// background clutter; a gold candidate off the references' level is a
// false positive. Both directions are filtered before classification.

use crate::types::Region;
use tracing::debug;

/// Cross-filter the candidates against the fixed scene geometry.
///
/// Returns the gold region plus exactly two silver regions, sorted by
/// center x, or None when the frame is ambiguous. A vertical offset of
/// exactly `vertical_tolerance` still counts as level (inclusive).
pub fn correlate(
    gold: &[Region],
    silver: &[Region],
    vertical_tolerance: f32,
) -> Option<(Region, [Region; 2])> {
    // Only a single gold candidate is classifiable
    let [marker] = gold else {
        debug!(gold = gold.len(), "gold candidate count != 1, skipping");
        return None;
    };

    // Keep references level with the gold candidate
    let mut level: Vec<Region> = silver
        .iter()
        .copied()
        .filter(|r| (r.center_y() - marker.center_y()).abs() <= vertical_tolerance)
        .collect();

    if level.len() != 2 {
        debug!(
            silver = silver.len(),
            level = level.len(),
            "silver references level with gold != 2, skipping"
        );
        return None;
    }

    // Symmetric check: the gold candidate must also sit level with the
    // average height of the two surviving references
    let avg_y = (level[0].center_y() + level[1].center_y()) / 2.0;
    if (marker.center_y() - avg_y).abs() > vertical_tolerance {
        debug!("gold candidate not level with reference average, skipping");
        return None;
    }

    // Sort references by horizontal center so the decision rule always
    // sees (left, right) regardless of extraction order.
    level.sort_by(|a, b| {
        a.center_x()
            .partial_cmp(&b.center_x())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Some((*marker, [level[0], level[1]]))
}
