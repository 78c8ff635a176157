use std::collections::HashMap;
use std::io::{Cursor, Write as _};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::compose::resize::{ResampleFilter, resize_into};
use crate::foundation::core::Bitmap;
use crate::foundation::error::{StickerError, StickerResult};
use crate::model::MasterImage;
use crate::pack::spec::{FixedNamePolicy, SpecDefinition};
use crate::raster::codec::encode_png;
use crate::raster::surface::Surface;
use crate::session::observer::{PipelineEvent, PipelineObserver};

/// Default download name of a built pack.
pub const DEFAULT_ARCHIVE_NAME: &str = "Sticker_Pack_Premium.zip";

/// One rendered, PNG-encoded rendition of a master image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive, `<folder>/<file>`.
    pub path: String,
    /// PNG bytes.
    pub png: Vec<u8>,
    /// Sequence index of the master this entry was rendered from.
    pub sequence_index: usize,
    /// Name of the spec this entry was rendered for.
    pub spec_name: String,
}

/// A serialized pack, ready to be written or offered for download.
#[derive(Clone, Debug)]
pub struct PackArchive {
    /// Suggested file name.
    pub file_name: String,
    /// ZIP bytes.
    pub bytes: Vec<u8>,
    /// Paths stored in the archive, in archive order.
    pub paths: Vec<String>,
    /// Number of renditions produced (one per master and spec).
    pub rendered_entries: usize,
}

impl PackArchive {
    /// Write the archive to `path` atomically: a sibling temp file is written, then renamed.
    ///
    /// On failure no file is left at `path`.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> StickerResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StickerError::archive(format!("create output dir '{}': {e}", parent.display()))
            })?;
        }

        let tmp = temp_sibling(path);
        let res = std::fs::write(&tmp, &self.bytes)
            .and_then(|()| std::fs::rename(&tmp, path))
            .map_err(|e| StickerError::archive(format!("write '{}': {e}", path.display())));
        if res.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        res
    }

    /// Write the archive into `dir` under [`PackArchive::file_name`] and return the full path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> StickerResult<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        self.write_to_path(&path)?;
        Ok(path)
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.partial", std::process::id()));
    path.with_file_name(name)
}

/// Options shared by every rendition of a pack.
#[derive(Clone, Debug)]
pub struct PackOptions {
    /// Output specs, in rendering order.
    pub specs: Vec<SpecDefinition>,
    /// Clearance around the scaled image.
    pub padding: u32,
    /// Resampling filter.
    pub filter: ResampleFilter,
    /// Which master fills fixed-name paths.
    pub fixed_name_policy: FixedNamePolicy,
    /// Archive file name.
    pub archive_name: String,
}

/// Renders master images into every spec and serializes the result.
///
/// Renders sequentially through one reusable [`Surface`].
pub struct PackageBuilder<'a> {
    opts: &'a PackOptions,
    surface: Surface,
}

impl<'a> PackageBuilder<'a> {
    /// Create a builder for the given options.
    pub fn new(opts: &'a PackOptions) -> Self {
        Self {
            opts,
            surface: Surface::new(),
        }
    }

    /// Render one master into one spec.
    pub fn render(&mut self, bitmap: &Bitmap, spec: &SpecDefinition) -> StickerResult<Bitmap> {
        resize_into(
            &mut self.surface,
            bitmap,
            spec.resize_target(self.opts.padding),
            self.opts.filter,
        )?;
        Ok(self.surface.snapshot())
    }

    /// Render and encode every (master, spec) pair, masters outer, specs inner.
    ///
    /// Any failure aborts the whole export.
    pub fn render_entries(
        &mut self,
        masters: &[MasterImage],
        observer: &mut dyn PipelineObserver,
    ) -> StickerResult<Vec<ArchiveEntry>> {
        let mut entries = Vec::with_capacity(masters.len() * self.opts.specs.len());
        let opts = self.opts;

        for master in masters {
            for spec in &opts.specs {
                let path = spec.entry_path(master.sequence_index);
                let rendition = self.render(&master.bitmap, spec).map_err(|e| {
                    StickerError::export(format!(
                        "render '{}' into {path}: {e}",
                        master.original_name
                    ))
                })?;
                let png = encode_png(&rendition)?;

                tracing::debug!(path = %path, bytes = png.len(), "entry rendered");
                observer.on_event(&PipelineEvent::EntryRendered {
                    path: path.clone(),
                    sequence_index: master.sequence_index,
                });
                entries.push(ArchiveEntry {
                    path,
                    png,
                    sequence_index: master.sequence_index,
                    spec_name: spec.name.clone(),
                });
            }
        }
        Ok(entries)
    }

    /// Render every entry and serialize them into one archive.
    #[tracing::instrument(skip_all, fields(masters = masters.len()))]
    pub fn build(
        &mut self,
        masters: &[MasterImage],
        observer: &mut dyn PipelineObserver,
    ) -> StickerResult<PackArchive> {
        if masters.is_empty() {
            return Err(StickerError::export("no processed images to export"));
        }

        let entries = self.render_entries(masters, observer)?;
        let rendered_entries = entries.len();
        let (bytes, paths) = write_zip(&entries, self.opts.fixed_name_policy)?;

        tracing::info!(
            rendered = rendered_entries,
            files = paths.len(),
            bytes = bytes.len(),
            "archive built"
        );
        observer.on_event(&PipelineEvent::ArchiveBuilt {
            files: paths.len(),
            bytes: bytes.len(),
        });

        Ok(PackArchive {
            file_name: self.opts.archive_name.clone(),
            bytes,
            paths,
            rendered_entries,
        })
    }

    /// Render one bitmap into every spec without packaging.
    ///
    /// Outputs are named by [`SpecDefinition::standalone_file_name`] (`main.png`, `tab.png`,
    /// `sticker.png` for the default set), in spec order.
    pub fn render_single(&mut self, bitmap: &Bitmap) -> StickerResult<Vec<(String, Vec<u8>)>> {
        let opts = self.opts;
        let mut out = Vec::with_capacity(opts.specs.len());
        for spec in &opts.specs {
            let rendition = self.render(bitmap, spec)?;
            out.push((spec.standalone_file_name(), encode_png(&rendition)?));
        }
        Ok(out)
    }

    /// Reusable surface usage counters.
    pub fn surface_stats(&self) -> crate::raster::surface::SurfaceStats {
        self.surface.stats()
    }
}

/// Resolve entries sharing a path according to `policy`, keeping first-occurrence order.
pub fn resolve_paths(entries: &[ArchiveEntry], policy: FixedNamePolicy) -> Vec<&ArchiveEntry> {
    let mut slot_by_path: HashMap<&str, usize> = HashMap::new();
    let mut kept: Vec<&ArchiveEntry> = Vec::new();

    for entry in entries {
        match slot_by_path.get(entry.path.as_str()) {
            Some(&slot) => {
                if policy == FixedNamePolicy::LastWins {
                    kept[slot] = entry;
                }
            }
            None => {
                slot_by_path.insert(entry.path.as_str(), kept.len());
                kept.push(entry);
            }
        }
    }
    kept
}

/// Serialize entries into ZIP bytes. Returns the bytes and the stored paths in order.
///
/// Entries are stored uncompressed (PNG data is already compressed) with a fixed timestamp, so
/// identical entries always produce identical bytes.
pub fn write_zip(
    entries: &[ArchiveEntry],
    policy: FixedNamePolicy,
) -> StickerResult<(Vec<u8>, Vec<String>)> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut paths = Vec::new();
    for entry in resolve_paths(entries, policy) {
        zip.start_file(entry.path.as_str(), options)
            .map_err(|e| StickerError::archive(format!("start '{}': {e}", entry.path)))?;
        zip.write_all(&entry.png)
            .map_err(|e| StickerError::archive(format!("write '{}': {e}", entry.path)))?;
        paths.push(entry.path.clone());
    }

    let cursor = zip
        .finish()
        .map_err(|e| StickerError::archive(format!("finish archive: {e}")))?;
    Ok((cursor.into_inner(), paths))
}

#[cfg(test)]
#[path = "../../tests/unit/pack/archive.rs"]
mod tests;
