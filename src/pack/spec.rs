use std::collections::HashSet;

use crate::compose::resize::ResizeTarget;
use crate::foundation::error::{StickerError, StickerResult};

/// One output rendition every master image is rendered into.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecDefinition {
    /// Short name used in logs and for standalone exports (`<name>.png`).
    pub name: String,
    /// Output width in pixels.
    pub target_width: u32,
    /// Output height in pixels.
    pub target_height: u32,
    /// Folder inside the archive.
    pub archive_folder: String,
    /// File name shared by every master, or `None` to name entries by sequence index.
    #[serde(default)]
    pub fixed_file_name: Option<String>,
}

impl SpecDefinition {
    /// Main icon: 240x240 at `main/main.png`.
    pub fn main() -> Self {
        Self::fixed("main", 240, 240, "main", "main.png")
    }

    /// Tab icon: 96x74 at `tab/tab.png`.
    pub fn tab() -> Self {
        Self::fixed("tab", 96, 74, "tab", "tab.png")
    }

    /// Per-image stickers: 370x320 at `stickers/NN.png`.
    pub fn stickers() -> Self {
        Self {
            name: "sticker".to_string(),
            target_width: 370,
            target_height: 320,
            archive_folder: "stickers".to_string(),
            fixed_file_name: None,
        }
    }

    fn fixed(name: &str, w: u32, h: u32, folder: &str, file: &str) -> Self {
        Self {
            name: name.to_string(),
            target_width: w,
            target_height: h,
            archive_folder: folder.to_string(),
            fixed_file_name: Some(file.to_string()),
        }
    }

    /// Return `true` when every master writes to the same path.
    pub fn is_fixed(&self) -> bool {
        self.fixed_file_name.is_some()
    }

    /// File name (without folder) for the master at `sequence_index`.
    pub fn entry_name(&self, sequence_index: usize) -> String {
        match &self.fixed_file_name {
            Some(name) => name.clone(),
            None => sticker_file_name(sequence_index),
        }
    }

    /// Full archive path for the master at `sequence_index`.
    pub fn entry_path(&self, sequence_index: usize) -> String {
        format!("{}/{}", self.archive_folder, self.entry_name(sequence_index))
    }

    /// File name used by the standalone single-image export.
    pub fn standalone_file_name(&self) -> String {
        format!("{}.png", self.name)
    }

    /// Resize target for this spec with the given padding.
    pub fn resize_target(&self, padding: u32) -> ResizeTarget {
        ResizeTarget {
            width: self.target_width,
            height: self.target_height,
            padding,
        }
    }
}

/// The three renditions of a sticker pack: main icon, tab icon, stickers.
pub fn default_specs() -> Vec<SpecDefinition> {
    vec![
        SpecDefinition::main(),
        SpecDefinition::tab(),
        SpecDefinition::stickers(),
    ]
}

/// Sticker file name: 1-based index, zero-padded to two digits.
pub fn sticker_file_name(sequence_index: usize) -> String {
    format!("{:02}.png", sequence_index + 1)
}

/// Which master's rendition is kept at a path shared by every master.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixedNamePolicy {
    /// The first stored master provides `main/main.png` and `tab/tab.png`.
    FirstWins,
    /// The last stored master provides them, as repeated writes to one path would.
    #[default]
    LastWins,
}

/// Validate a spec set against the resize padding.
pub fn validate_specs(specs: &[SpecDefinition], padding: u32) -> StickerResult<()> {
    if specs.is_empty() {
        return Err(StickerError::validation("at least one output spec is required"));
    }

    let mut names = HashSet::new();
    let mut fixed_paths = HashSet::new();
    let mut indexed_folders = HashSet::new();

    for spec in specs {
        spec.resize_target(padding)
            .validate()
            .map_err(|e| StickerError::validation(format!("spec '{}': {e}", spec.name)))?;

        check_segment("spec name", &spec.name)?;
        check_segment("archive folder", &spec.archive_folder)?;
        if !names.insert(spec.name.as_str()) {
            return Err(StickerError::validation(format!(
                "duplicate spec name '{}'",
                spec.name
            )));
        }

        match &spec.fixed_file_name {
            Some(file) => {
                check_segment("file name", file)?;
                if !fixed_paths.insert(spec.entry_path(0)) {
                    return Err(StickerError::validation(format!(
                        "duplicate archive path '{}'",
                        spec.entry_path(0)
                    )));
                }
            }
            None => {
                if !indexed_folders.insert(spec.archive_folder.as_str()) {
                    return Err(StickerError::validation(format!(
                        "folder '{}' is used by more than one indexed spec",
                        spec.archive_folder
                    )));
                }
            }
        }
    }

    // A fixed file inside an indexed folder would collide with `NN.png` names.
    for spec in specs.iter().filter(|s| s.is_fixed()) {
        if indexed_folders.contains(spec.archive_folder.as_str()) {
            return Err(StickerError::validation(format!(
                "fixed file '{}' shares a folder with indexed stickers",
                spec.entry_path(0)
            )));
        }
    }
    Ok(())
}

fn check_segment(what: &str, value: &str) -> StickerResult<()> {
    let bad = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || value.chars().any(char::is_control);
    if bad {
        return Err(StickerError::validation(format!("invalid {what} '{value}'")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pack/spec.rs"]
mod tests;
