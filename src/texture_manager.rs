use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;

/// The rasters the shell shows as textures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Canvas,
    SaturationBrightness,
    HueStrip,
}

impl TextureSlot {
    fn name(&self) -> &'static str {
        match self {
            Self::Canvas => "canvas",
            Self::SaturationBrightness => "sb_panel",
            Self::HueStrip => "hue_strip",
        }
    }
}

pub fn to_color_image(bitmap: &RgbaImage) -> ColorImage {
    let size = [bitmap.width() as usize, bitmap.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, bitmap.as_raw())
}

/// Keeps one GPU texture per slot and re-uploads it only when the
/// producer's revision moves.
#[derive(Default)]
pub struct TextureManager {
    textures: HashMap<TextureSlot, (TextureHandle, u64)>,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("textures", &format!("<{} textures>", self.textures.len()))
            .finish()
    }
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `slot`, regenerated through `generator` if `revision`
    /// differs from the uploaded one.
    pub fn get_or_update<F>(
        &mut self,
        ctx: &Context,
        slot: TextureSlot,
        revision: u64,
        generator: F,
    ) -> TextureId
    where
        F: FnOnce() -> ColorImage,
    {
        if let Some((handle, uploaded)) = self.textures.get_mut(&slot) {
            if *uploaded != revision {
                handle.set(generator(), TextureOptions::NEAREST);
                *uploaded = revision;
            }
            return handle.id();
        }

        let handle = ctx.load_texture(slot.name(), generator(), TextureOptions::NEAREST);
        let id = handle.id();
        log::debug!("Created texture {}", slot.name());
        self.textures.insert(slot, (handle, revision));
        id
    }
}
