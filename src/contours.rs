// Connected-blob extraction from a binary mask.
//
// Flood-fill labeling stands in for OpenCV's contour tracing: each
// 8-connected foreground component becomes one Region with its bounding
// box and pixel-count area. Regions come out in scan order (top-left
// blob first); callers must not depend on any stronger ordering.

use crate::segmentation::ColorMask;
use crate::types::Region;
use std::collections::VecDeque;
use tracing::trace;

const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Extract all 8-connected foreground blobs as Regions.
/// `visited` is a reusable scratch buffer; its contents are overwritten.
pub fn extract_regions(mask: &ColorMask, visited: &mut Vec<bool>) -> Vec<Region> {
    let (w, h) = (mask.width, mask.height);
    visited.clear();
    visited.resize(w * h, false);

    let mut regions = Vec::new();
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    for start_y in 0..h {
        for start_x in 0..w {
            let start_idx = start_y * w + start_x;
            if visited[start_idx] || mask.data[start_idx] == 0 {
                continue;
            }

            // BFS over one component
            let (mut min_x, mut max_x) = (start_x, start_x);
            let (mut min_y, mut max_y) = (start_y, start_y);
            let mut area = 0usize;

            visited[start_idx] = true;
            queue.push_back((start_x, start_y));

            while let Some((x, y)) = queue.pop_front() {
                area += 1;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);

                for (dx, dy) in NEIGHBORS_8 {
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                        continue;
                    }
                    let nidx = ny as usize * w + nx as usize;
                    if !visited[nidx] && mask.data[nidx] != 0 {
                        visited[nidx] = true;
                        queue.push_back((nx as usize, ny as usize));
                    }
                }
            }

            regions.push(Region {
                x: min_x,
                y: min_y,
                width: max_x - min_x + 1,
                height: max_y - min_y + 1,
                area,
            });
        }
    }

    trace!(blobs = regions.len(), "extracted regions from mask");
    regions
}

/// True if the foreground pixel at (x, y) sits on its blob's outline:
/// at least one 4-neighbor is background or out of bounds.
#[inline]
pub fn is_outline_pixel(mask: &ColorMask, x: usize, y: usize) -> bool {
    if mask.get(x, y) == 0 {
        return false;
    }
    let (w, h) = (mask.width, mask.height);
    (x == 0 || mask.get(x - 1, y) == 0)
        || (x + 1 >= w || mask.get(x + 1, y) == 0)
        || (y == 0 || mask.get(x, y - 1) == 0)
        || (y + 1 >= h || mask.get(x, y + 1) == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&[u8]]) -> ColorMask {
        let mut mask = ColorMask::default();
        mask.reset(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                mask.data[y * rows[0].len() + x] = if v != 0 { 255 } else { 0 };
            }
        }
        mask
    }

    #[test]
    fn test_single_blob_bounding_box_and_area() {
        let mask = mask_from_rows(&[
            &[0, 0, 0, 0, 0],
            &[0, 1, 1, 0, 0],
            &[0, 1, 1, 0, 0],
            &[0, 0, 0, 0, 0],
        ]);
        let mut visited = Vec::new();
        let regions = extract_regions(&mask, &mut visited);
        assert_eq!(regions.len(), 1);
        let r = regions[0];
        assert_eq!((r.x, r.y, r.width, r.height), (1, 1, 2, 2));
        assert_eq!(r.area, 4);
    }

    #[test]
    fn test_two_separate_blobs_scan_order() {
        let mask = mask_from_rows(&[
            &[1, 1, 0, 0, 0, 0],
            &[1, 1, 0, 0, 1, 1],
            &[0, 0, 0, 0, 1, 1],
        ]);
        let mut visited = Vec::new();
        let regions = extract_regions(&mask, &mut visited);
        assert_eq!(regions.len(), 2);
        // Scan order: top-left blob first
        assert_eq!(regions[0].x, 0);
        assert_eq!(regions[1].x, 4);
        assert_eq!(regions[0].area, 4);
        assert_eq!(regions[1].area, 4);
    }

    #[test]
    fn test_diagonal_pixels_are_one_blob() {
        let mask = mask_from_rows(&[&[1, 0, 0], &[0, 1, 0], &[0, 0, 1]]);
        let mut visited = Vec::new();
        let regions = extract_regions(&mask, &mut visited);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 3);
        assert_eq!((regions[0].width, regions[0].height), (3, 3));
    }

    #[test]
    fn test_area_is_pixel_count_not_box_area() {
        // L-shaped blob: 5 pixels inside a 3x3 box
        let mask = mask_from_rows(&[&[1, 0, 0], &[1, 0, 0], &[1, 1, 1]]);
        let mut visited = Vec::new();
        let regions = extract_regions(&mask, &mut visited);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 5);
        assert_eq!((regions[0].width, regions[0].height), (3, 3));
    }

    #[test]
    fn test_empty_mask_yields_no_regions() {
        let mut mask = ColorMask::default();
        mask.reset(8, 8);
        let mut visited = Vec::new();
        assert!(extract_regions(&mask, &mut visited).is_empty());
    }

    #[test]
    fn test_outline_detection() {
        let mask = mask_from_rows(&[
            &[0, 0, 0, 0, 0],
            &[0, 1, 1, 1, 0],
            &[0, 1, 1, 1, 0],
            &[0, 1, 1, 1, 0],
            &[0, 0, 0, 0, 0],
        ]);
        assert!(is_outline_pixel(&mask, 1, 1));
        assert!(is_outline_pixel(&mask, 2, 1));
        assert!(is_outline_pixel(&mask, 3, 3));
        // Interior pixel of the 3x3 block is not outline
        assert!(!is_outline_pixel(&mask, 2, 2));
        // Background pixel is never outline
        assert!(!is_outline_pixel(&mask, 0, 0));
    }
}
