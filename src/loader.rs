use futures::channel::oneshot;
use log::debug;

use crate::error::{EditorError, EditorResult};
use crate::surface::PixelBlock;

/// Decode an encoded image (PNG, JPEG, ...) into straight-alpha RGBA
pub fn decode_image(bytes: &[u8]) -> EditorResult<PixelBlock> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(EditorError::Decode)
}

/// Resolves a [`PendingImage`] from wherever the image comes from
#[derive(Debug)]
pub struct ImageSender {
    sender: oneshot::Sender<EditorResult<PixelBlock>>,
}

impl ImageSender {
    pub fn resolve(self, result: EditorResult<PixelBlock>) {
        if self.sender.send(result).is_err() {
            debug!("Image resolved after its receiver was dropped");
        }
    }
}

/// An image that becomes available later, resolved exactly once
#[derive(Debug)]
pub struct PendingImage {
    receiver: oneshot::Receiver<EditorResult<PixelBlock>>,
}

impl PendingImage {
    /// A pending image and the handle that resolves it
    pub fn channel() -> (ImageSender, PendingImage) {
        let (sender, receiver) = oneshot::channel();
        (ImageSender { sender }, PendingImage { receiver })
    }

    /// Wrap an already known outcome
    pub fn ready(result: EditorResult<PixelBlock>) -> Self {
        let (sender, pending) = Self::channel();
        sender.resolve(result);
        pending
    }

    /// Decode `bytes` off the UI loop
    pub fn decode(bytes: Vec<u8>) -> Self {
        let (sender, pending) = Self::channel();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || sender.resolve(decode_image(&bytes)));

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move { sender.resolve(decode_image(&bytes)) });

        pending
    }

    /// The outcome, once it is there. A dropped sender counts as a failure.
    pub fn try_take(&mut self) -> Option<EditorResult<PixelBlock>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(EditorError::LoadCancelled)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_resolves_immediately() {
        let mut pending = PendingImage::ready(Ok(PixelBlock::new(3, 2)));
        let image = pending.try_take().unwrap().unwrap();
        assert_eq!(image.dimensions(), (3, 2));
    }

    #[test]
    fn test_unresolved_then_resolved() {
        let (sender, mut pending) = PendingImage::channel();
        assert!(pending.try_take().is_none());
        sender.resolve(Ok(PixelBlock::new(1, 1)));
        assert!(pending.try_take().unwrap().is_ok());
    }

    #[test]
    fn test_dropped_sender_is_cancellation() {
        let (sender, mut pending) = PendingImage::channel();
        drop(sender);
        assert!(matches!(pending.try_take(), Some(Err(EditorError::LoadCancelled))));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_image(b"not an image"), Err(EditorError::Decode(_))));
    }
}
