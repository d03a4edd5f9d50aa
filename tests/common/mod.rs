/*!
 * Common test utilities for the srtgen test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

// Re-export the mock transcriber module
pub mod mock_transcriber;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a transcription document in the Hugging Face `chunks` shape
pub fn create_test_transcript(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"{
  "text": " Hello there. How are you? Fine, thanks.",
  "chunks": [
    {"timestamp": [0.0, 2.4], "text": " Hello there."},
    {"timestamp": [2.4, 4.9996], "text": " How are you?"},
    {"timestamp": [5.5, 7.25], "text": " Fine, thanks. "}
  ]
}"#;
    create_test_file(dir, filename, content)
}

/// Expected SRT for `create_test_transcript`
pub const EXPECTED_TEST_SRT: &str = "1\n00:00:00,000 --> 00:00:02,400\nHello there.\n\n\
2\n00:00:02,400 --> 00:00:05,000\nHow are you?\n\n\
3\n00:00:05,500 --> 00:00:07,250\nFine, thanks.\n\n";

/// Creates an input and an output directory inside one temporary directory
pub fn create_io_dirs() -> Result<(TempDir, PathBuf, PathBuf)> {
    let temp_dir = create_temp_dir()?;
    let input = temp_dir.path().join("json");
    let output = temp_dir.path().join("srt");
    fs::create_dir_all(&input)?;
    fs::create_dir_all(&output)?;
    Ok((temp_dir, input, output))
}
