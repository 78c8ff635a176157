/// Something the pipeline wants the user to see.
///
/// The pipeline never prints or touches presentation state; frontends receive these through a
/// [`PipelineObserver`] and decide how to show them.
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineEvent {
    /// Processing of one input file started.
    FileStarted {
        /// Source file name.
        name: String,
        /// 0-based position in the batch.
        position: usize,
        /// Batch size.
        total: usize,
    },
    /// The background remover reported progress.
    RemovalProgress {
        /// Source file name.
        name: String,
        /// Remover-defined stage key (for example a model download).
        stage: String,
        /// Units done.
        current: u64,
        /// Units expected.
        total: u64,
    },
    /// Background removal failed; the original image is used for this file.
    RemovalFailed {
        /// Source file name.
        name: String,
        /// Failure message.
        message: String,
    },
    /// A master image was stored.
    FileStored {
        /// Source file name.
        name: String,
        /// Assigned sequence index.
        sequence_index: usize,
        /// Master width.
        width: u32,
        /// Master height.
        height: u32,
    },
    /// The file could not be processed and was skipped.
    FileFailed {
        /// Source file name.
        name: String,
        /// Failure message.
        message: String,
    },
    /// One export rendition was rendered and encoded.
    EntryRendered {
        /// Archive path of the rendition.
        path: String,
        /// Sequence index of its master.
        sequence_index: usize,
    },
    /// The archive was serialized.
    ArchiveBuilt {
        /// Files stored in the archive.
        files: usize,
        /// Archive size in bytes.
        bytes: usize,
    },
}

/// Receives [`PipelineEvent`]s in pipeline order.
pub trait PipelineObserver {
    /// Called once per event.
    fn on_event(&mut self, event: &PipelineEvent);
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn on_event(&mut self, _event: &PipelineEvent) {}
}

/// Observer that records every event, for tests and batch reports.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    /// Events in arrival order.
    pub events: Vec<PipelineEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removal failures reported for `name`.
    pub fn removal_failures(&self, name: &str) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PipelineEvent::RemovalFailed { name: n, .. } if n == name))
            .count()
    }

    /// Names of files that were skipped.
    pub fn failed_files(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::FileFailed { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PipelineObserver for EventLog {
    fn on_event(&mut self, event: &PipelineEvent) {
        self.events.push(event.clone());
    }
}
