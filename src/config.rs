use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::compose::resize::{DEFAULT_PADDING, ResampleFilter};
use crate::compose::stroke::StrokeOpts;
use crate::foundation::error::{StickerError, StickerResult};
use crate::pack::archive::{DEFAULT_ARCHIVE_NAME, PackOptions};
use crate::pack::spec::{FixedNamePolicy, SpecDefinition, default_specs, validate_specs};

/// Pack configuration.
///
/// Every field has a default, so `{}` is a valid configuration and yields the standard
/// three-spec pack. Example:
///
/// ```json
/// {
///   "stroke": { "width": 6, "color": "#000000" },
///   "padding": 12,
///   "fixed_name_policy": "first-wins"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Outline parameters.
    pub stroke: StrokeOpts,
    /// Clearance around the scaled image in every rendition.
    pub padding: u32,
    /// Resampling filter.
    pub filter: ResampleFilter,
    /// Output specs, in rendering order.
    pub specs: Vec<SpecDefinition>,
    /// Which master fills paths shared by every master.
    pub fixed_name_policy: FixedNamePolicy,
    /// File name of the produced archive.
    pub archive_name: String,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            stroke: StrokeOpts::default(),
            padding: DEFAULT_PADDING,
            filter: ResampleFilter::default(),
            specs: default_specs(),
            fixed_name_policy: FixedNamePolicy::default(),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }
}

impl PackConfig {
    /// Parse a configuration from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> StickerResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| StickerError::serde(format!("parse pack config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> StickerResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StickerError::validation(format!("open pack config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every section for consistency.
    pub fn validate(&self) -> StickerResult<()> {
        self.stroke.validate()?;
        validate_specs(&self.specs, self.padding)?;

        let name = self.archive_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(StickerError::validation(format!(
                "invalid archive name '{}'",
                self.archive_name
            )));
        }
        Ok(())
    }

    /// Options for the export stage.
    pub fn pack_options(&self) -> PackOptions {
        PackOptions {
            specs: self.specs.clone(),
            padding: self.padding,
            filter: self.filter,
            fixed_name_policy: self.fixed_name_policy,
            archive_name: self.archive_name.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
