//! Pure helpers for the mapper view: page bounds, viewer URL and the inline
//! styles that line the overlay and its markers up with the rendered page.

use common::geometry::{document_to_screen, PageSize};
use common::model::field_mapping::FieldMapping;

/// Keeps `page` inside `1..=page_count`. A document without pages stays on 1.
pub fn clamp_page(page: u32, page_count: u32) -> u32 {
    page.clamp(1, page_count.max(1))
}

/// Source for the browser's built-in viewer, opened on `page` at the zoom
/// matching `render_scale`.
pub fn viewer_src(url: &str, page: u32, render_scale: f64) -> String {
    format!(
        "{}#page={}&zoom={}&toolbar=0&navpanes=0&scrollbar=0",
        url,
        page,
        (render_scale * 100.0).round() as i64
    )
}

/// Box holding the viewer, sized to the page at `render_scale`.
pub fn frame_style(size: PageSize, render_scale: f64) -> String {
    let (width, height) = document_to_screen(size.width, size.height, render_scale);
    format!("position:relative;width:{:.1}px;height:{:.1}px;", width, height)
}

/// Transparent layer over the viewer that receives the clicks.
pub fn overlay_style(size: PageSize, render_scale: f64) -> String {
    let (width, height) = document_to_screen(size.width, size.height, render_scale);
    format!(
        "position:absolute;top:0;left:0;width:{:.1}px;height:{:.1}px;cursor:crosshair;",
        width, height
    )
}

/// Positions a marker so its top-left corner sits on the mapped point, with
/// text at the size it will be stamped.
pub fn marker_style(mapping: &FieldMapping, render_scale: f64) -> String {
    let (left, top) = document_to_screen(mapping.x, mapping.y, render_scale);
    let font_px = mapping.font_size() as f64 * render_scale;
    let color = mapping.color.as_deref().unwrap_or("#1976d2");
    format!(
        "position:absolute;left:{:.1}px;top:{:.1}px;font-size:{:.1}px;line-height:1;color:{};",
        left, top, font_px, color
    )
}

/// How many times `field_name` has been placed.
pub fn placement_count(mappings: &[FieldMapping], field_name: &str) -> usize {
    mappings.iter().filter(|m| m.field_name == field_name).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_clamped() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(4, 0), 1);
    }

    #[test]
    fn viewer_opens_requested_page() {
        assert_eq!(
            viewer_src("blob:x", 2, 1.5),
            "blob:x#page=2&zoom=150&toolbar=0&navpanes=0&scrollbar=0"
        );
    }

    #[test]
    fn markers_follow_scale() {
        let mapping = FieldMapping::new("name", 1, 100.0, 200.0);
        let style = marker_style(&mapping, 1.5);
        assert!(style.contains("left:150.0px"));
        assert!(style.contains("top:300.0px"));
        assert!(style.contains("font-size:18.0px"));
    }

    #[test]
    fn overlay_covers_scaled_page() {
        let style = overlay_style(PageSize { width: 612.0, height: 792.0 }, 1.5);
        assert!(style.contains("width:918.0px;height:1188.0px"));
    }

    #[test]
    fn counts_placements_per_field() {
        let mappings = vec![
            FieldMapping::new("a", 1, 0.0, 0.0),
            FieldMapping::new("a", 2, 0.0, 0.0),
            FieldMapping::new("b", 1, 0.0, 0.0),
        ];
        assert_eq!(placement_count(&mappings, "a"), 2);
        assert_eq!(placement_count(&mappings, "c"), 0);
    }
}
