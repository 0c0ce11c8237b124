//! Fixed geometry of both postcard faces.
//!
//! Every number here mirrors the on-screen preview layout; rendering and
//! tests share these so the exported bitmaps match the preview
//! pixel-for-pixel in proportion.

use kurbo::{Point, Rect};

/// One face, always landscape 3:2.
pub const FACE_WIDTH: u32 = 1500;
pub const FACE_HEIGHT: u32 = 1000;

/// Vertical gap between the two faces in the merged export.
pub const MERGE_GAP: u32 = 40;

/// Message text: left margin, top anchor, wrap width and the column height
/// used for vertical centering.
pub const TEXT_X: f64 = 60.0;
pub const TEXT_TOP: f64 = 80.0;
pub const TEXT_MAX_WIDTH: f64 = 630.0;
pub const TEXT_CONTAINER_HEIGHT: f64 = 840.0;

/// Divider between message half and address half.
pub const DIVIDER_X: f64 = 750.0;
pub const DIVIDER_TOP: f64 = 50.0;
pub const DIVIDER_BOTTOM: f64 = 950.0;
pub const DIVIDER_WIDTH: f64 = 2.0;

pub const ZIP_BOX_COUNT: usize = 6;
pub const ZIP_BOX_SIZE: f64 = 50.0;
pub const ZIP_BOX_GAP: f64 = 10.0;
pub const ZIP_BOX_Y: f64 = 60.0;
pub const ZIP_BOX_X0: f64 = 810.0;
pub const ZIP_BOX_STROKE: f64 = 2.0;

/// Stamp area (1:1.2) and the margin inset for contain-fitting artwork.
pub const STAMP_X: f64 = 1220.0;
pub const STAMP_Y: f64 = 60.0;
pub const STAMP_WIDTH: f64 = 220.0;
pub const STAMP_HEIGHT: f64 = 264.0;
pub const STAMP_MARGIN: f64 = 5.0;
pub const STAMP_GLYPH_SIZE: f64 = 100.0;

pub const PERF_RADIUS: f64 = 6.0;
pub const PERF_STEP: f64 = 22.0;

pub const POSTMARK_CENTER: Point = Point::new(1200.0, 300.0);
pub const POSTMARK_RADIUS: f64 = 70.0;
pub const POSTMARK_STROKE: f64 = 3.0;
pub const POSTMARK_ROTATION_DEG: f64 = -30.0;
pub const POSTMARK_DATE_OFFSET: Point = Point::new(0.0, -10.0);
pub const POSTMARK_DATE_SIZE: f64 = 16.0;
pub const POSTMARK_LOCATION_OFFSET: Point = Point::new(0.0, 15.0);
pub const POSTMARK_LOCATION_SIZE: f64 = 12.0;
pub const POSTMARK_LOCATION_SIZE_SMALL: f64 = 10.0;
/// Uppercased locations longer than this drop to the small size.
pub const POSTMARK_LOCATION_MAX_CHARS: usize = 15;

pub const RECIPIENT_TEXT_SIZE: f64 = 32.0;
pub const RECIPIENT_RULE_X0: f64 = 810.0;
pub const RECIPIENT_RULE_X1: f64 = 1440.0;
/// Name rule stops short of the postmark circle.
pub const RECIPIENT_NAME_RULE_X1: f64 =
    POSTMARK_CENTER.x - POSTMARK_RADIUS - 20.0;
pub const RECIPIENT_FIRST_RULE_Y: f64 = 280.0;
pub const RECIPIENT_RULE_SPACING: f64 = 90.0;
pub const RECIPIENT_RULE_WIDTH: f64 = 1.0;
/// Text sits this far above its rule.
pub const RECIPIENT_TEXT_LIFT: f64 = 10.0;
/// Empty addresses still get this many blank rules.
pub const RECIPIENT_BLANK_RULES: usize = 2;

pub const PLACEHOLDER_LABEL_SIZE: f64 = 48.0;

pub fn face_rect() -> Rect {
    Rect::new(0.0, 0.0, f64::from(FACE_WIDTH), f64::from(FACE_HEIGHT))
}

pub fn face_center() -> Point {
    face_rect().center()
}

/// Height of the merged two-face export.
pub fn merged_height() -> u32 {
    FACE_HEIGHT + MERGE_GAP + FACE_HEIGHT
}

/// Destination of the back-side handwriting/photo content.
pub fn back_image_rect() -> Rect {
    Rect::new(60.0, 80.0, 60.0 + 650.0, 80.0 + 840.0)
}

pub fn stamp_rect() -> Rect {
    Rect::new(STAMP_X, STAMP_Y, STAMP_X + STAMP_WIDTH, STAMP_Y + STAMP_HEIGHT)
}

pub fn stamp_glyph_center() -> Point {
    stamp_rect().center()
}

/// Outline of the i-th postal-code box (0-based, left to right).
pub fn zip_box(i: usize) -> Rect {
    let x = ZIP_BOX_X0 + (ZIP_BOX_SIZE + ZIP_BOX_GAP) * i as f64;
    Rect::new(x, ZIP_BOX_Y, x + ZIP_BOX_SIZE, ZIP_BOX_Y + ZIP_BOX_SIZE)
}

/// Centers of the simulated perforation holes around the stamp, in draw
/// order. Corners appear twice (once per edge), matching the preview's 48
/// dots.
pub fn perforation_centers() -> Vec<Point> {
    let r = stamp_rect();
    let mut out = Vec::with_capacity(48);
    for i in 0..=10 {
        let x = r.x0 + PERF_STEP * i as f64;
        out.push(Point::new(x, r.y0));
        out.push(Point::new(x, r.y1));
    }
    for i in 0..=12 {
        let y = r.y0 + PERF_STEP * i as f64;
        out.push(Point::new(r.x0, y));
        out.push(Point::new(r.x1, y));
    }
    out
}

/// Baseline rule for recipient row `index` (0 = name, then address lines).
pub fn recipient_rule_y(index: usize) -> f64 {
    RECIPIENT_FIRST_RULE_Y + RECIPIENT_RULE_SPACING * index as f64
}

/// Scale `src` to fit inside `target` inset by `margin`, preserving aspect
/// ratio, centered. At least one axis of the result is exact unless the
/// source is degenerate.
pub fn fit_contain(src_w: f64, src_h: f64, target: Rect, margin: f64) -> Rect {
    let inner = Rect::new(
        target.x0 + margin,
        target.y0 + margin,
        target.x1 - margin,
        target.y1 - margin,
    );
    if !(src_w > 0.0) || !(src_h > 0.0) {
        return inner;
    }
    let scale = (inner.width() / src_w).min(inner.height() / src_h);
    let dw = src_w * scale;
    let dh = src_h * scale;
    let x = inner.x0 + (inner.width() - dw) / 2.0;
    let y = inner.y0 + (inner.height() - dh) / 2.0;
    Rect::new(x, y, x + dw, y + dh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_and_merge_dimensions() {
        assert_eq!(face_rect().width(), 1500.0);
        assert_eq!(face_rect().height(), 1000.0);
        assert_eq!(merged_height(), 2040);
    }

    #[test]
    fn zip_boxes_step_right_and_clear_the_stamp() {
        assert_eq!(zip_box(0).x0, 810.0);
        assert_eq!(zip_box(0).y0, 60.0);
        assert_eq!(zip_box(5).x0, 1110.0);
        assert!(zip_box(ZIP_BOX_COUNT - 1).x1 < STAMP_X);
    }

    #[test]
    fn perforations_ring_the_stamp() {
        let centers = perforation_centers();
        assert_eq!(centers.len(), 48);
        let r = stamp_rect();
        for p in &centers {
            let on_x_edge = p.x == r.x0 || p.x == r.x1;
            let on_y_edge = p.y == r.y0 || p.y == r.y1;
            assert!(on_x_edge || on_y_edge, "dot {p:?} is off the stamp edge");
        }
        // edge steps land exactly on the far corners
        assert!(centers.contains(&Point::new(r.x1, r.y0)));
        assert!(centers.contains(&Point::new(r.x0, r.y1)));
    }

    #[test]
    fn recipient_rules_descend_in_fixed_steps() {
        assert_eq!(recipient_rule_y(0), 280.0);
        assert_eq!(recipient_rule_y(1), 370.0);
        assert_eq!(recipient_rule_y(2), 460.0);
        assert_eq!(recipient_rule_y(3), 550.0);
        assert_eq!(RECIPIENT_NAME_RULE_X1, 1110.0);
    }

    #[test]
    fn contain_fit_wide_source_pins_width() {
        let dst = fit_contain(400.0, 200.0, stamp_rect(), STAMP_MARGIN);
        assert_eq!(dst.width(), 210.0);
        assert_eq!(dst.height(), 105.0);
        assert_eq!(dst.x0, 1225.0);
        // centered in the 254-high inner area
        assert_eq!(dst.y0, 65.0 + (254.0 - 105.0) / 2.0);
    }

    #[test]
    fn contain_fit_tall_source_pins_height() {
        let dst = fit_contain(100.0, 508.0, stamp_rect(), STAMP_MARGIN);
        assert_eq!(dst.height(), 254.0);
        assert_eq!(dst.width(), 50.0);
        assert_eq!(dst.x0, 1225.0 + (210.0 - 50.0) / 2.0);
        assert_eq!(dst.y0, 65.0);
    }

    #[test]
    fn contain_fit_never_overflows_inner_area() {
        for (w, h) in [(1.0, 1.0), (5000.0, 3.0), (3.0, 5000.0), (210.0, 254.0)] {
            let dst = fit_contain(w, h, stamp_rect(), STAMP_MARGIN);
            assert!(dst.width() <= 210.0 + 1e-9);
            assert!(dst.height() <= 254.0 + 1e-9);
            let exact_w = (dst.width() - 210.0).abs() < 1e-9;
            let exact_h = (dst.height() - 254.0).abs() < 1e-9;
            assert!(exact_w || exact_h);
        }
    }

    #[test]
    fn contain_fit_degenerate_source_falls_back_to_inner_rect() {
        let dst = fit_contain(0.0, 100.0, stamp_rect(), STAMP_MARGIN);
        assert_eq!(dst, Rect::new(1225.0, 65.0, 1435.0, 319.0));
    }
}
