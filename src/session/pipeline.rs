use crate::compose::stroke::compose_stroke;
use crate::config::PackConfig;
use crate::foundation::core::Bitmap;
use crate::foundation::error::{StickerError, StickerResult};
use crate::model::{MasterImage, SourceImage};
use crate::pack::archive::{PackArchive, PackageBuilder};
use crate::raster::codec::decode_bitmap;
use crate::removal::remover::{BackgroundRemover, ProgressSink};
use crate::session::observer::{PipelineEvent, PipelineObserver};

/// Per-upload toggles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineOpts {
    /// Run every file through the background remover first.
    pub remove_background: bool,
    /// Draw an outline around the foreground.
    pub add_stroke: bool,
}

/// Counters for one [`StickerSession::ingest`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Files offered.
    pub files: usize,
    /// Masters stored.
    pub stored: usize,
    /// Files skipped after a per-file failure.
    pub failed: usize,
    /// Files whose background removal failed and that used the decoded source instead.
    pub removal_fallbacks: usize,
}

/// Owns the master images of one upload and turns them into a pack.
///
/// Files are processed strictly one after another: decode, removal, stroke, store. A new
/// [`ingest`](Self::ingest) replaces the previous masters.
#[derive(Debug)]
pub struct StickerSession {
    config: PackConfig,
    masters: Vec<MasterImage>,
}

impl StickerSession {
    /// Create an empty session. The configuration is validated once here.
    pub fn new(config: PackConfig) -> StickerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            masters: Vec::new(),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Stored masters in sequence order.
    pub fn masters(&self) -> &[MasterImage] {
        &self.masters
    }

    /// Drop every stored master.
    pub fn reset(&mut self) {
        self.masters.clear();
    }

    /// Process `sources` in order and store one master per file that decodes.
    ///
    /// A file that cannot be decoded is reported and skipped before it reaches the remover; the
    /// remaining files keep contiguous sequence indices. A failing background removal is reported
    /// once through `observer` and the file continues with its decoded source.
    #[tracing::instrument(skip_all, fields(files = sources.len()))]
    pub fn ingest(
        &mut self,
        sources: Vec<SourceImage>,
        opts: PipelineOpts,
        remover: Option<&mut dyn BackgroundRemover>,
        observer: &mut dyn PipelineObserver,
    ) -> StickerResult<IngestReport> {
        let mut remover = match (opts.remove_background, remover) {
            (true, None) => {
                return Err(StickerError::validation(
                    "background removal requested without a remover",
                ));
            }
            (true, some) => some,
            (false, _) => None,
        };

        self.masters.clear();
        let total = sources.len();
        let mut report = IngestReport {
            files: total,
            ..IngestReport::default()
        };

        for (position, source) in sources.into_iter().enumerate() {
            let name = source.original_name.clone();
            observer.on_event(&PipelineEvent::FileStarted {
                name: name.clone(),
                position,
                total,
            });

            // The source must decode on its own before it is sent anywhere; it is also the
            // fallback when removal fails.
            let composed = decode_bitmap(&source.bytes).and_then(|original| {
                let base = match remover.as_deref_mut() {
                    Some(r) => match remove_and_decode(r, &source, observer) {
                        Ok(cut) => cut,
                        Err(e) => {
                            tracing::warn!(file = %name, error = %e, "background removal failed");
                            observer.on_event(&PipelineEvent::RemovalFailed {
                                name: name.clone(),
                                message: e.to_string(),
                            });
                            report.removal_fallbacks += 1;
                            original
                        }
                    },
                    None => original,
                };
                self.finish_master(base, opts)
            });

            let bitmap = match composed {
                Ok(bitmap) => bitmap,
                Err(e) if e.is_per_file() => {
                    tracing::warn!(file = %name, error = %e, "file skipped");
                    observer.on_event(&PipelineEvent::FileFailed {
                        name,
                        message: e.to_string(),
                    });
                    report.failed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let sequence_index = self.masters.len();
            tracing::debug!(
                file = %name,
                index = sequence_index,
                width = bitmap.width,
                height = bitmap.height,
                "master stored"
            );
            observer.on_event(&PipelineEvent::FileStored {
                name: name.clone(),
                sequence_index,
                width: bitmap.width,
                height: bitmap.height,
            });
            self.masters.push(MasterImage {
                bitmap,
                original_name: name,
                sequence_index,
            });
            report.stored += 1;
        }

        tracing::info!(
            stored = report.stored,
            failed = report.failed,
            removal_fallbacks = report.removal_fallbacks,
            "ingest finished"
        );
        Ok(report)
    }

    /// Render every stored master into every spec and serialize the archive.
    #[tracing::instrument(skip_all, fields(masters = self.masters.len()))]
    pub fn export(&self, observer: &mut dyn PipelineObserver) -> StickerResult<PackArchive> {
        let opts = self.config.pack_options();
        PackageBuilder::new(&opts).build(&self.masters, observer)
    }

    fn finish_master(&self, bitmap: Bitmap, opts: PipelineOpts) -> StickerResult<Bitmap> {
        if opts.add_stroke {
            compose_stroke(&bitmap, &self.config.stroke)
        } else {
            Ok(bitmap)
        }
    }
}

/// Render one image into every configured spec without stroke or packaging.
///
/// Returns `(file_name, png_bytes)` pairs in spec order.
pub fn render_single(
    source: &SourceImage,
    config: &PackConfig,
) -> StickerResult<Vec<(String, Vec<u8>)>> {
    config.validate()?;
    let bitmap = decode_bitmap(&source.bytes)?;
    let opts = config.pack_options();
    PackageBuilder::new(&opts).render_single(&bitmap)
}

fn remove_and_decode(
    remover: &mut dyn BackgroundRemover,
    source: &SourceImage,
    observer: &mut dyn PipelineObserver,
) -> StickerResult<Bitmap> {
    let mut sink = ObserverProgress {
        name: &source.original_name,
        observer,
    };
    let bytes = remover.remove_background(&source.bytes, &mut sink)?;
    // Output the remover produced but we cannot read counts as a removal failure.
    decode_bitmap(&bytes).map_err(|e| StickerError::removal(format!("remover output: {e}")))
}

/// Forwards remover progress to the observer, tagged with the file name.
struct ObserverProgress<'a> {
    name: &'a str,
    observer: &'a mut dyn PipelineObserver,
}

impl ProgressSink for ObserverProgress<'_> {
    fn progress(&mut self, stage: &str, current: u64, total: u64) {
        self.observer.on_event(&PipelineEvent::RemovalProgress {
            name: self.name.to_string(),
            stage: stage.to_string(),
            current,
            total,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/pipeline.rs"]
mod tests;
