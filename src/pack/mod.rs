//! Pack layout and serialization.
//!
//! Every master image is rendered into every [`spec::SpecDefinition`]; the renditions become
//! [`archive::ArchiveEntry`] values and are written into one ZIP archive.

/// Rendering masters into entries and writing the ZIP archive.
pub mod archive;
/// Output spec definitions and archive naming.
pub mod spec;
