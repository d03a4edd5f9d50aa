use std::path::{Path, PathBuf};
use crate::errors::WriteError;
use crate::file_utils::FileManager;

// @module: Subtitle file output

// @const: Default subtitle file extension
pub const SUBTITLE_EXTENSION: &str = "srt";

/// Writes complete subtitle files
#[derive(Debug, Clone)]
pub struct SubtitleFileWriter {
    // @field: Output extension without the dot
    extension: String,
}

impl Default for SubtitleFileWriter {
    fn default() -> Self {
        Self::new(SUBTITLE_EXTENSION)
    }
}

impl SubtitleFileWriter {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Target path for a given source document
    pub fn output_path(&self, source: &Path, output_dir: &Path) -> PathBuf {
        FileManager::generate_output_path(source, output_dir, &self.extension)
    }

    /// Write `blocks` in order to the subtitle file derived from `source`.
    ///
    /// The content is staged in a temporary file next to the target and then
    /// renamed over it, so the target is either fully replaced or untouched.
    pub fn write(&self, source: &Path, output_dir: &Path, blocks: &[String]) -> Result<PathBuf, WriteError> {
        let path = self.output_path(source, output_dir);
        let content = blocks.concat();

        FileManager::write_atomic(&path, content.as_bytes()).map_err(|source| WriteError {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
