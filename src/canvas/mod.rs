pub mod raster;
mod text;

pub use text::TextRasterizer;

use egui::{Color32, Pos2};
use image::{Rgba, RgbaImage};

use crate::history::CanvasSnapshot;
use crate::tools::{RenderSettings, Shape};

/// Straight-alpha RGBA pixels
pub type Bitmap = RgbaImage;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Largest coverage buffer a `Vec<f32>` can hold
const MAX_MASK_LEN: usize = isize::MAX as usize / std::mem::size_of::<f32>();

/// Per-pixel coverage produced by the text rasteriser
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    origin_x: i32,
    origin_y: i32,
    width: u32,
    height: u32,
    coverage: Vec<f32>,
}

impl GlyphMask {
    /// A zeroed mask; collapses to an empty one if the area does not fit in memory.
    pub fn new(origin_x: i32, origin_y: i32, width: u32, height: u32) -> Self {
        let len = (width as usize).checked_mul(height as usize);
        let Some(len) = len.filter(|len| *len <= MAX_MASK_LEN) else {
            log::warn!("Glyph mask of {width}x{height} is too large, dropping it");
            return Self::empty();
        };
        Self {
            origin_x,
            origin_y,
            width,
            height,
            coverage: vec![0.0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn empty() -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            width: 0,
            height: 0,
            coverage: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.coverage.iter().all(|c| *c <= 0.0)
    }

    /// Overlapping glyphs keep the stronger coverage
    pub fn accumulate(&mut self, x: i32, y: i32, coverage: f32) {
        let (lx, ly) = (x - self.origin_x, y - self.origin_y);
        if lx < 0 || ly < 0 || lx as u32 >= self.width || ly as u32 >= self.height {
            return;
        }
        let index = ly as usize * self.width as usize + lx as usize;
        self.coverage[index] = self.coverage[index].max(coverage.clamp(0.0, 1.0));
    }

    /// Absolute `(x, y, coverage)` for every covered pixel
    pub fn samples(&self) -> impl Iterator<Item = (i32, i32, f32)> + '_ {
        let width = self.width.max(1) as usize;
        self.coverage
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0.0)
            .map(move |(i, c)| {
                (
                    self.origin_x + (i % width) as i32,
                    self.origin_y + (i / width) as i32,
                    *c,
                )
            })
    }
}

/// One drawing operation, applied to either buffer.
#[derive(Debug, Clone)]
pub enum DrawOp {
    Segment {
        from: Pos2,
        to: Pos2,
        color: Color32,
        width: f32,
        opacity: f32,
    },
    Shape {
        shape: Shape,
        settings: RenderSettings,
    },
    /// Clears a square to the buffer's empty color
    Erase { center: Pos2, side: f32 },
    Glyphs {
        mask: GlyphMask,
        color: Color32,
        opacity: f32,
    },
}

fn apply(op: &DrawOp, bitmap: &mut Bitmap, empty: Rgba<u8>) {
    match op {
        DrawOp::Segment {
            from,
            to,
            color,
            width,
            opacity,
        } => raster::stroke_segment(bitmap, *from, *to, *width, *color, *opacity),
        DrawOp::Shape { shape, settings } => raster::draw_shape(
            bitmap,
            shape,
            settings.fill,
            settings.outline,
            settings.stroke_width,
            settings.opacity,
        ),
        DrawOp::Erase { center, side } => raster::clear_square(bitmap, *center, *side, empty),
        DrawOp::Glyphs {
            mask,
            color,
            opacity,
        } => raster::blend_mask(bitmap, mask, *color, *opacity),
    }
}

/// The persisted buffer (committed pixels) and the preview overlay.
///
/// Nothing outside this type writes pixels.
#[derive(Debug)]
pub struct CanvasSurface {
    persisted: Bitmap,
    preview: Bitmap,
    background: Rgba<u8>,
    preview_is_clear: bool,
    /// Bumped on every pixel change of either buffer
    revision: u64,
}

impl CanvasSurface {
    pub fn new(width: u32, height: u32, background: [u8; 4]) -> Self {
        let background = Rgba(background);
        Self {
            persisted: Bitmap::from_pixel(width, height, background),
            preview: Bitmap::from_pixel(width, height, TRANSPARENT),
            background,
            preview_is_clear: true,
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.persisted.width()
    }

    pub fn height(&self) -> u32 {
        self.persisted.height()
    }

    pub fn persisted(&self) -> &Bitmap {
        &self.persisted
    }

    pub fn preview(&self) -> &Bitmap {
        &self.preview
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Persisted pixels with the preview drawn on top
    pub fn composite(&self) -> Bitmap {
        let mut out = self.persisted.clone();
        if !self.preview_is_clear {
            for (dst, src) in out.pixels_mut().zip(self.preview.pixels()) {
                if src[3] > 0 {
                    raster::blend_over(dst, *src, 1.0);
                }
            }
        }
        out
    }

    pub fn commit(&mut self, op: &DrawOp) {
        apply(op, &mut self.persisted, self.background);
        self.revision += 1;
    }

    pub fn draw_preview(&mut self, op: &DrawOp) {
        apply(op, &mut self.preview, TRANSPARENT);
        self.preview_is_clear = false;
        self.revision += 1;
    }

    pub fn clear_preview(&mut self) {
        if self.preview_is_clear {
            return;
        }
        for pixel in self.preview.pixels_mut() {
            *pixel = TRANSPARENT;
        }
        self.preview_is_clear = true;
        self.revision += 1;
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot::new(self.persisted.clone())
    }

    /// Overwrite the persisted buffer with a stored snapshot
    pub fn restore(&mut self, snapshot: &CanvasSnapshot) {
        self.persisted.clone_from(snapshot.pixels());
        self.revision += 1;
    }
}
