//! Background removal boundary.
//!
//! The segmentation model is an external collaborator. The pipeline only sees the
//! [`remover::BackgroundRemover`] trait and reports progress through a
//! [`remover::ProgressSink`].

/// Remover backed by an external program speaking stdin/stdout.
pub mod command;
/// Remover and progress traits.
pub mod remover;
