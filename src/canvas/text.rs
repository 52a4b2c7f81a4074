use ab_glyph::{Font, FontArc, GlyphId, OutlinedGlyph, PxScale, ScaleFont, point};
use egui::{FontDefinitions, FontFamily, Pos2, Rect, pos2};

use super::GlyphMask;
use crate::error::{EngineError, EngineResult};

/// Turns strings into coverage masks using egui's bundled proportional font.
#[derive(Clone)]
pub struct TextRasterizer {
    font: FontArc,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer").finish_non_exhaustive()
    }
}

impl TextRasterizer {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }

    /// Load the first proportional font egui ships with.
    pub fn with_default_font() -> EngineResult<Self> {
        let definitions = FontDefinitions::default();
        let data = definitions
            .families
            .get(&FontFamily::Proportional)
            .and_then(|names| names.first())
            .and_then(|name| definitions.font_data.get(name))
            .ok_or(EngineError::FontUnavailable)?;
        let font = FontArc::try_from_vec(data.font.to_vec())?;
        Ok(Self::new(font))
    }

    /// Lay `text` out on one line with its top edge at `top_left.y`.
    ///
    /// Only coverage inside `clip` is kept; glyphs entirely outside it are
    /// never outlined.
    pub fn rasterize(&self, text: &str, top_left: Pos2, size: f32, clip: Rect) -> GlyphMask {
        let scale = PxScale::from(size);
        let scaled = self.font.as_scaled(scale);
        let mut caret = point(top_left.x, top_left.y + scaled.ascent());
        let mut previous: Option<GlyphId> = None;

        let mut outlines: Vec<OutlinedGlyph> = Vec::new();
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(previous) = previous {
                caret.x += scaled.kern(previous, id);
            }
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let b = outlined.px_bounds();
                let bounds = Rect::from_min_max(pos2(b.min.x, b.min.y), pos2(b.max.x, b.max.y));
                if bounds.intersects(clip) {
                    outlines.push(outlined);
                }
            }
        }

        let Some(bounds) = outlines
            .iter()
            .map(|outlined| {
                let b = outlined.px_bounds();
                Rect::from_min_max(pos2(b.min.x, b.min.y), pos2(b.max.x, b.max.y))
            })
            .reduce(|a, b| a.union(b))
        else {
            return GlyphMask::empty();
        };
        let bounds = bounds.intersect(clip);
        if !bounds.is_positive() {
            return GlyphMask::empty();
        }

        let origin_x = bounds.min.x.floor() as i32;
        let origin_y = bounds.min.y.floor() as i32;
        let width = (bounds.max.x.ceil() as i32 - origin_x).max(0) as u32;
        let height = (bounds.max.y.ceil() as i32 - origin_y).max(0) as u32;
        let mut mask = GlyphMask::new(origin_x, origin_y, width, height);

        for outlined in &outlines {
            let glyph_bounds = outlined.px_bounds();
            let gx0 = glyph_bounds.min.x as i32;
            let gy0 = glyph_bounds.min.y as i32;
            outlined.draw(|x, y, coverage| {
                mask.accumulate(gx0 + x as i32, gy0 + y as i32, coverage);
            });
        }
        mask
    }
}
