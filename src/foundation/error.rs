/// Convenience result type used across stickerpack.
pub type StickerResult<T> = Result<T, StickerError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum StickerError {
    /// Unusable input for a single file: empty bytes, undecodable data, zero-sized bitmap.
    #[error("input error: {0}")]
    Input(String),

    /// The external background remover failed for one file.
    #[error("background removal error: {0}")]
    Removal(String),

    /// Export could not start or a rendition could not be produced.
    #[error("export error: {0}")]
    Export(String),

    /// Archive serialization or write failure.
    #[error("archive error: {0}")]
    Archive(String),

    /// Invalid options or configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StickerError {
    /// Build a [`StickerError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`StickerError::Removal`] value.
    pub fn removal(msg: impl Into<String>) -> Self {
        Self::Removal(msg.into())
    }

    /// Build a [`StickerError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`StickerError::Archive`] value.
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Build a [`StickerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StickerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for failures that only affect the file being ingested.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Removal(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
