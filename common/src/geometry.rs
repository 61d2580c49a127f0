//! Coordinate conversions between the rendered page in the browser and PDF
//! user space.
//!
//! Mappings store positions in document points measured from the *top-left*
//! corner of the page, which is what a click on the rendered page naturally
//! gives us once the render scale is removed. PDF user space has its origin at
//! the *bottom-left*, so drawing requires a single vertical flip:
//!
//! ```text
//! baseline_y = page_height - y - font_size
//! ```

use serde::{Deserialize, Serialize};

/// Width and height of a page in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

/// Scale used when the caller passes a non-positive or non-finite value.
const FALLBACK_SCALE: f64 = 1.0;

fn effective_scale(render_scale: f64) -> f64 {
    if render_scale.is_finite() && render_scale > 0.0 {
        render_scale
    } else {
        FALLBACK_SCALE
    }
}

/// Converts a click offset (CSS pixels relative to the top-left corner of the
/// rendered page) into document points measured from the top-left corner.
pub fn screen_to_document(offset_x: f64, offset_y: f64, render_scale: f64) -> (f32, f32) {
    let scale = effective_scale(render_scale);
    ((offset_x / scale) as f32, (offset_y / scale) as f32)
}

/// Inverse of [`screen_to_document`], used to position markers over the page.
pub fn document_to_screen(x: f32, y: f32, render_scale: f64) -> (f64, f64) {
    let scale = effective_scale(render_scale);
    (x as f64 * scale, y as f64 * scale)
}

/// Baseline of a line of text whose top edge sits `y` points below the top of
/// a page `page_height` points tall.
pub fn baseline_y(page_height: f32, y: f32, font_size: f32) -> f32 {
    page_height - y - font_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_offsets_are_divided_by_scale() {
        assert_eq!(screen_to_document(150.0, 300.0, 1.5), (100.0, 200.0));
    }

    #[test]
    fn invalid_scale_falls_back_to_identity() {
        assert_eq!(screen_to_document(40.0, 20.0, 0.0), (40.0, 20.0));
        assert_eq!(screen_to_document(40.0, 20.0, f64::NAN), (40.0, 20.0));
        assert_eq!(document_to_screen(40.0, 20.0, -2.0), (40.0, 20.0));
    }

    #[test]
    fn screen_and_document_conversions_are_inverse() {
        let (x, y) = screen_to_document(123.0, 456.0, 2.0);
        assert_eq!(document_to_screen(x, y, 2.0), (123.0, 456.0));
    }

    #[test]
    fn baseline_flips_from_top_origin() {
        assert_eq!(baseline_y(792.0, 100.0, 12.0), 680.0);
        assert_eq!(baseline_y(842.0, 0.0, 10.0), 832.0);
    }
}
