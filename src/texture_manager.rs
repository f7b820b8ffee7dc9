use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::surface::PixelBlock;

/// Which picture a cached texture shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Surface,
    Placement,
}

/// Keeps one texture per slot and re-uploads it only when its key changes
#[derive(Default)]
pub struct TextureManager {
    textures: HashMap<TextureSlot, (u64, TextureHandle)>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `slot`, regenerated with `generator` when `key` differs from the cached one
    pub fn get_or_upload<F>(
        &mut self,
        ctx: &Context,
        slot: TextureSlot,
        key: u64,
        generator: F,
    ) -> TextureId
    where
        F: FnOnce() -> ColorImage,
    {
        match self.textures.get_mut(&slot) {
            Some((cached, handle)) if *cached == key => handle.id(),
            Some((cached, handle)) => {
                handle.set(generator(), TextureOptions::NEAREST);
                *cached = key;
                handle.id()
            }
            None => {
                let name = format!("{slot:?}");
                let handle = ctx.load_texture(name, generator(), TextureOptions::NEAREST);
                let id = handle.id();
                self.textures.insert(slot, (key, handle));
                id
            }
        }
    }
}

/// Upload format for a pixel block
pub fn color_image(block: &PixelBlock) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(
        [block.width() as usize, block.height() as usize],
        block.as_raw(),
    )
}
