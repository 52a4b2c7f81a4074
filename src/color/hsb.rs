//! Hue/saturation/brightness conversions.
//!
//! Hue is in degrees, saturation and brightness are fractions in `0..=1`.
//! RGB components are fractions as well; quantisation to bytes happens in
//! [`to_color32`].

use egui::Color32;

/// Standard HSB (HSV) to RGB transform. Hue wraps at 360.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> [f32; 3] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let chroma = brightness * saturation;
    let x = chroma * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = brightness - chroma;

    let (r, g, b) = match h.floor() as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    [r + m, g + m, b + m]
}

/// Inverse of [`hsb_to_rgb`]. Achromatic input yields hue 0 and saturation 0.
pub fn rgb_to_hsb(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let saturation = if max > 0.0 { delta / max } else { 0.0 };
    let hue = if delta <= f32::EPSILON {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    (hue.rem_euclid(360.0), saturation, max)
}

pub fn to_color32(rgb: [f32; 3]) -> Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
}

pub fn from_color32(color: Color32) -> [f32; 3] {
    [
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
    ]
}

/// HSB straight to an opaque [`Color32`].
pub fn hsb_to_color32(hue: f32, saturation: f32, brightness: f32) -> Color32 {
    to_color32(hsb_to_rgb(hue, saturation, brightness))
}
