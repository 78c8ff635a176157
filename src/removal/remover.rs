use crate::foundation::error::StickerResult;

/// Receives fractional progress from a long-running external step.
///
/// May be called zero or more times before the step completes.
pub trait ProgressSink {
    /// Report `current` of `total` units done for `stage`.
    fn progress(&mut self, stage: &str, current: u64, total: u64);
}

/// Progress sink that discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn progress(&mut self, _stage: &str, _current: u64, _total: u64) {}
}

/// Turns encoded image bytes into encoded image bytes with a transparent background.
///
/// Implementations block until the result is available. The returned bytes must be decodable
/// by [`crate::raster::codec::decode_bitmap`].
pub trait BackgroundRemover {
    /// Remove the background of one image.
    fn remove_background(
        &mut self,
        bytes: &[u8],
        progress: &mut dyn ProgressSink,
    ) -> StickerResult<Vec<u8>>;
}

impl<R: BackgroundRemover + ?Sized> BackgroundRemover for Box<R> {
    fn remove_background(
        &mut self,
        bytes: &[u8],
        progress: &mut dyn ProgressSink,
    ) -> StickerResult<Vec<u8>> {
        (**self).remove_background(bytes, progress)
    }
}
