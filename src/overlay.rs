// In-place frame annotation.
//
// Draws straight into the host's RGB buffer: hollow boxes around the
// filtered candidates (blue = gold, green = silver), blob outlines when
// enabled, and the classification label on a dark banner. Glyphs are a
// small embedded 5x7 bitmap covering the four label strings.

use crate::contours::is_outline_pixel;
use crate::segmentation::ColorMask;
use crate::types::Region;

pub type Rgb = [u8; 3];

pub const GOLD_BOX: Rgb = [0, 0, 255];
pub const SILVER_BOX: Rgb = [0, 255, 0];
pub const LABEL_TEXT: Rgb = [255, 255, 255];
pub const LABEL_BG: Rgb = [40, 40, 40];

#[inline]
fn put_pixel(frame: &mut [u8], width: usize, height: usize, x: i64, y: i64, color: Rgb) {
    if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        return;
    }
    let idx = (y as usize * width + x as usize) * 3;
    frame[idx] = color[0];
    frame[idx + 1] = color[1];
    frame[idx + 2] = color[2];
}

/// Hollow rectangle, `thickness` pixels thick, clipped to the frame.
pub fn draw_rect_outline(
    frame: &mut [u8],
    width: usize,
    height: usize,
    region: &Region,
    color: Rgb,
    thickness: usize,
) {
    let x0 = region.x as i64;
    let y0 = region.y as i64;
    let x1 = x0 + region.width as i64 - 1;
    let y1 = y0 + region.height as i64 - 1;

    for t in 0..thickness as i64 {
        for x in x0..=x1 {
            put_pixel(frame, width, height, x, y0 + t, color);
            put_pixel(frame, width, height, x, y1 - t, color);
        }
        for y in y0..=y1 {
            put_pixel(frame, width, height, x0 + t, y, color);
            put_pixel(frame, width, height, x1 - t, y, color);
        }
    }
}

/// Trace every blob outline in the mask onto the frame.
pub fn draw_mask_outlines(
    frame: &mut [u8],
    width: usize,
    height: usize,
    mask: &ColorMask,
    color: Rgb,
) {
    for y in 0..mask.height.min(height) {
        for x in 0..mask.width.min(width) {
            if is_outline_pixel(mask, x, y) {
                put_pixel(frame, width, height, x as i64, y as i64, color);
            }
        }
    }
}

// 5x7 glyphs, one byte per row, bit 4 = leftmost column. Only the letters
// of the four position labels are defined.
const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;

fn glyph(c: char) -> Option<[u8; GLYPH_H]> {
    let rows = match c {
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0F, 0x10, 0x10, 0x17, 0x11, 0x11, 0x0E],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x1F],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        _ => return None,
    };
    Some(rows)
}

/// Width in pixels of a rendered label at the given scale.
pub fn text_width(text: &str, scale: usize) -> usize {
    if text.is_empty() {
        return 0;
    }
    text.chars().count() * (GLYPH_W + 1) * scale - scale
}

/// Render `text` at (x, y) on a dark banner. Undefined characters render
/// as blank space.
pub fn draw_label(
    frame: &mut [u8],
    width: usize,
    height: usize,
    text: &str,
    x: usize,
    y: usize,
    scale: usize,
) {
    let pad = 3 * scale;
    let banner = Region {
        x: x.saturating_sub(pad),
        y: y.saturating_sub(pad),
        width: text_width(text, scale) + pad * 2,
        height: GLYPH_H * scale + pad * 2,
        area: 0,
    };
    for by in banner.y..banner.y + banner.height {
        for bx in banner.x..banner.x + banner.width {
            put_pixel(frame, width, height, bx as i64, by as i64, LABEL_BG);
        }
    }

    let mut cursor_x = x;
    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for (gy, row) in rows.iter().enumerate() {
                for gx in 0..GLYPH_W {
                    if row & (1 << (GLYPH_W - 1 - gx)) != 0 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                put_pixel(
                                    frame,
                                    width,
                                    height,
                                    (cursor_x + gx * scale + sx) as i64,
                                    (y + gy * scale + sy) as i64,
                                    LABEL_TEXT,
                                );
                            }
                        }
                    }
                }
            }
        }
        cursor_x += (GLYPH_W + 1) * scale;
    }
}
