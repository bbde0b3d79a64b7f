use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(0x36, 0x39, 0x3f);
pub(super) const PANEL_FILL: Color32 = Color32::from_rgb(0x2b, 0x2d, 0x31);
pub(super) const CHIP_FILL: Color32 = Color32::from_rgb(0x31, 0x33, 0x38);
pub(super) const MUTED_TEXT: Color32 = Color32::from_rgb(0xb5, 0xba, 0xc1);
pub(super) const ACCENT: Color32 = Color32::from_rgb(0x72, 0x89, 0xda);
pub(super) const SUCCESS_TEXT: Color32 = Color32::from_rgb(0x4a, 0xde, 0x80);
pub(super) const ERROR_TEXT: Color32 = Color32::from_rgb(0xf8, 0x71, 0x71);
pub(super) const EDGE_DIM: Color32 = Color32::from_rgba_unmultiplied_const(0x4f, 0x54, 0x5c, 128);
pub(super) const EDGE_HIGHLIGHT: Color32 = Color32::WHITE;

/// Parses `#rrggbb` or `#rgb`; anything else is `None`.
pub(super) fn parse_hex_color(text: &str) -> Option<Color32> {
    let hex = text.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => {
            let short = |index: usize| channel(index..index + 1).map(|value| value * 17);
            Some(Color32::from_rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKGROUND);
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let top_left = rect.left_top();
    let top_right = rect.right_top();
    let bottom_left = rect.left_bottom();
    let bottom_right = rect.right_bottom();

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_right, bottom_right)
        || segments_intersect(start, end, bottom_right, bottom_left)
        || segments_intersect(start, end, bottom_left, top_left)
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

/// Thin outline used on hovered and selected points.
pub(super) fn outline(width: f32) -> Stroke {
    Stroke::new(width, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
}
