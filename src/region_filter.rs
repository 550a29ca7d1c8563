// Candidate filtering: area band plus the squareness heuristic.
//
// The area band rejects both speckle noise and oversized merged blobs
// (e.g. a glare streak joining with the backdrop). Squareness rejects
// elongated blobs that cannot be the cube-shaped gold sample.

use crate::types::{ColorConfig, Region};

/// True if the box's w/h ratio deviates from 1 by at most `tolerance`.
/// The boundary is inclusive: a deviation of exactly `tolerance` passes.
pub fn is_square_enough(region: &Region, tolerance: f32) -> bool {
    (region.aspect_ratio() - 1.0).abs() <= tolerance
}

/// Retain regions whose area falls inside the color's inclusive band and,
/// when enabled, whose bounding box passes the squareness check.
pub fn filter_regions(regions: &[Region], config: &ColorConfig) -> Vec<Region> {
    regions
        .iter()
        .copied()
        .filter(|r| config.area.contains(r.area))
        .filter(|r| !config.check_squareness || is_square_enough(r, config.squareness_tolerance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AreaBand, ColorConfig, HsvBand};

    fn region(width: usize, height: usize, area: usize) -> Region {
        Region {
            x: 0,
            y: 0,
            width,
            height,
            area,
        }
    }

    fn config(min: usize, max: usize, check_squareness: bool, tol: f32) -> ColorConfig {
        ColorConfig {
            hsv: HsvBand {
                lower: [0, 0, 0],
                upper: [179, 255, 255],
            },
            area: AreaBand { min, max },
            check_squareness,
            squareness_tolerance: tol,
        }
    }

    #[test]
    fn test_area_bounds_are_inclusive() {
        let cfg = config(100, 200, false, 0.0);
        let regions = vec![
            region(10, 10, 99),  // one below min: rejected
            region(10, 10, 100), // at min: kept
            region(14, 14, 200), // at max: kept
            region(15, 15, 201), // one above max: rejected
        ];
        let kept = filter_regions(&regions, &cfg);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].area, 100);
        assert_eq!(kept[1].area, 200);
    }

    #[test]
    fn test_squareness_boundary() {
        let tol = 0.25;
        // Strictly inside: 110/100 = 1.1
        assert!(is_square_enough(&region(110, 100, 0), tol));
        // Exactly at the boundary: 125/100 = 1.25 (inclusive, passes)
        assert!(is_square_enough(&region(125, 100, 0), tol));
        // Tall boxes deviate below 1: 100/125 = 0.8, deviation 0.2
        assert!(is_square_enough(&region(100, 125, 0), tol));
        // Strictly outside: 130/100 = 1.30
        assert!(!is_square_enough(&region(130, 100, 0), tol));
        // Elongated noise streak
        assert!(!is_square_enough(&region(300, 40, 0), tol));
    }

    #[test]
    fn test_squareness_disabled_keeps_elongated_blobs() {
        let cfg = config(0, usize::MAX, false, 0.1);
        let kept = filter_regions(&[region(300, 40, 500)], &cfg);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_squareness_enabled_rejects_elongated_blobs() {
        let cfg = config(0, usize::MAX, true, 0.1);
        let kept = filter_regions(&[region(300, 40, 500), region(50, 50, 500)], &cfg);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].width, 50);
    }
}
