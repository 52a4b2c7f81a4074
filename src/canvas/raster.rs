//! Pixel rasterisation for everything the tools can put on a bitmap.
//!
//! Coverage is decided by sampling pixel centres, so output is exact and
//! repeatable, which the snapshot history relies on.

use egui::{Color32, Pos2, Rect};
use image::Rgba;

use super::{Bitmap, GlyphMask};
use crate::tools::{Shape, ShapeKind};

/// Straight-alpha source-over of `src` (with its alpha scaled by `alpha`) onto `dst`.
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>, alpha: f32) {
    let sa = src[3] as f32 / 255.0 * alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let value = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

pub fn opaque(color: Color32) -> Rgba<u8> {
    Rgba([color.r(), color.g(), color.b(), 255])
}

/// Calls `f` for every pixel whose centre lies in the (clipped) box.
fn for_each_pixel(bitmap: &mut Bitmap, area: Rect, mut f: impl FnMut(&mut Rgba<u8>, Pos2)) {
    let clip = |v: f32, limit: u32| (v.max(0.0) as u32).min(limit);
    let x0 = clip(area.min.x.floor(), bitmap.width());
    let y0 = clip(area.min.y.floor(), bitmap.height());
    let x1 = clip(area.max.x.ceil(), bitmap.width());
    let y1 = clip(area.max.y.ceil(), bitmap.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            f(bitmap.get_pixel_mut(x, y), center);
        }
    }
}

fn paint_where(
    bitmap: &mut Bitmap,
    area: Rect,
    color: Color32,
    opacity: f32,
    inside: impl Fn(Pos2) -> bool,
) {
    let src = opaque(color);
    for_each_pixel(bitmap, area, |pixel, center| {
        if inside(center) {
            blend_over(pixel, src, opacity);
        }
    });
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_sq();
    if length_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Round-capped line segment of the given width.
pub fn stroke_segment(
    bitmap: &mut Bitmap,
    from: Pos2,
    to: Pos2,
    width: f32,
    color: Color32,
    opacity: f32,
) {
    let half = width / 2.0;
    let area = Rect::from_two_pos(from, to).expand(half + 1.0);
    paint_where(bitmap, area, color, opacity, |p| {
        distance_to_segment(p, from, to) <= half
    });
}

/// Replace a `side`-sized square centred on `center` with `fill`.
pub fn clear_square(bitmap: &mut Bitmap, center: Pos2, side: f32, fill: Rgba<u8>) {
    let area = Rect::from_center_size(center, egui::vec2(side, side));
    for_each_pixel(bitmap, area, |pixel, p| {
        if area.contains(p) {
            *pixel = fill;
        }
    });
}

/// Half-open containment: `max` is excluded
fn covers(rect: Rect, p: Pos2) -> bool {
    p.x >= rect.min.x && p.x < rect.max.x && p.y >= rect.min.y && p.y < rect.max.y
}

fn inside_ellipse(p: Pos2, center: Pos2, rx: f32, ry: f32) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let dx = (p.x - center.x) / rx;
    let dy = (p.y - center.y) / ry;
    dx * dx + dy * dy <= 1.0
}

fn edge(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
}

fn inside_triangle(p: Pos2, [a, b, c]: [Pos2; 3]) -> bool {
    let d1 = edge(p, a, b);
    let d2 = edge(p, b, c);
    let d3 = edge(p, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Filled body in `fill`, then an outline of `stroke_width` centred on the edge.
pub fn draw_shape(
    bitmap: &mut Bitmap,
    shape: &Shape,
    fill: Color32,
    outline: Color32,
    stroke_width: f32,
    opacity: f32,
) {
    let bounds = shape.bounds();
    let half = stroke_width / 2.0;
    let area = bounds.expand(half + 1.0);

    match shape.kind() {
        ShapeKind::Rectangle => {
            paint_where(bitmap, bounds, fill, opacity, |p| covers(bounds, p));
            let outer = bounds.expand(half);
            let inner = bounds.shrink(half);
            paint_where(bitmap, area, outline, opacity, |p| {
                covers(outer, p) && !(inner.is_positive() && covers(inner, p))
            });
        }
        ShapeKind::Circle => {
            let center = bounds.center();
            let rx = bounds.width() / 2.0;
            let ry = bounds.height() / 2.0;
            paint_where(bitmap, bounds, fill, opacity, |p| inside_ellipse(p, center, rx, ry));
            paint_where(bitmap, area, outline, opacity, |p| {
                inside_ellipse(p, center, rx + half, ry + half)
                    && !inside_ellipse(p, center, rx - half, ry - half)
            });
        }
        ShapeKind::Triangle => {
            let vertices = shape.vertices();
            paint_where(bitmap, bounds, fill, opacity, |p| inside_triangle(p, vertices));
            let [a, b, c] = vertices;
            paint_where(bitmap, area, outline, opacity, |p| {
                distance_to_segment(p, a, b) <= half
                    || distance_to_segment(p, b, c) <= half
                    || distance_to_segment(p, c, a) <= half
            });
        }
    }
}

pub fn blend_mask(bitmap: &mut Bitmap, mask: &GlyphMask, color: Color32, opacity: f32) {
    let src = opaque(color);
    for (x, y, coverage) in mask.samples() {
        if x < 0 || y < 0 || x as u32 >= bitmap.width() || y as u32 >= bitmap.height() {
            continue;
        }
        blend_over(bitmap.get_pixel_mut(x as u32, y as u32), src, coverage * opacity);
    }
}
