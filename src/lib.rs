//! stickerpack turns a batch of raster images into a chat-platform sticker pack.
//!
//! Every input becomes a full-resolution master (optionally cut out by a background remover and
//! outlined with a stroke). On export each master is scaled and centered into every output spec
//! and the renditions are written into one ZIP archive:
//!
//! - Build a [`PackConfig`] (or load one with [`PackConfig::from_path`])
//! - Create a [`StickerSession`] and [`StickerSession::ingest`] the sources
//! - [`StickerSession::export`] the [`PackArchive`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Outline synthesis and scale/center resizing.
pub mod compose;
/// JSON-loadable pack configuration.
pub mod config;
/// Source and master image types.
pub mod model;
/// Output specs and archive assembly.
pub mod pack;
/// Pixel buffers, blending and image codecs.
pub mod raster;
/// Background removal boundary.
pub mod removal;
/// Session state and pipeline orchestration.
pub mod session;

pub use crate::foundation::core::{Bitmap, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{StickerError, StickerResult};

pub use crate::compose::resize::{
    DEFAULT_PADDING, Placement, ResampleFilter, ResizeTarget, placement, resize,
};
pub use crate::compose::stroke::{STROKE_MARGIN, StrokeOpts, compose_stroke};
pub use crate::config::PackConfig;
pub use crate::model::{MasterImage, SourceImage};
pub use crate::pack::archive::{
    ArchiveEntry, DEFAULT_ARCHIVE_NAME, PackArchive, PackOptions, PackageBuilder,
};
pub use crate::pack::spec::{FixedNamePolicy, SpecDefinition, default_specs};
pub use crate::raster::codec::{decode_bitmap, encode_png};
pub use crate::removal::command::CommandRemover;
pub use crate::removal::remover::{BackgroundRemover, NoProgress, ProgressSink};
pub use crate::session::observer::{EventLog, NullObserver, PipelineEvent, PipelineObserver};
pub use crate::session::pipeline::{IngestReport, PipelineOpts, StickerSession, render_single};
