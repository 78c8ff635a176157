//! Session state and the sequential ingest/export pipeline.

/// Pipeline events and observers.
pub mod observer;
/// The [`pipeline::StickerSession`] and its per-file ingest steps.
pub mod pipeline;
