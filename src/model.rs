use std::path::Path;

use crate::foundation::core::Bitmap;
use crate::foundation::error::{StickerError, StickerResult};

/// Raw bytes of one selected input file.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Encoded image bytes as read from disk.
    pub bytes: Vec<u8>,
    /// File name the bytes came from, used in messages.
    pub original_name: String,
}

impl SourceImage {
    /// Wrap in-memory bytes.
    pub fn new(bytes: Vec<u8>, original_name: impl Into<String>) -> Self {
        Self {
            bytes,
            original_name: original_name.into(),
        }
    }

    /// Read a source file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> StickerResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| StickerError::input(format!("read '{}': {e}", path.display())))?;
        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            bytes,
            original_name,
        })
    }
}

/// Full-resolution composed bitmap for one stored input, before spec resizing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MasterImage {
    /// Composed pixels.
    pub bitmap: Bitmap,
    /// Name of the source file.
    pub original_name: String,
    /// 0-based position among stored masters; sticker entries are named from it.
    pub sequence_index: usize,
}

impl MasterImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.bitmap.height
    }
}
