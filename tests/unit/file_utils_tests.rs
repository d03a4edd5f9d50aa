/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use srtgen::file_utils::FileManager;
use crate::common;

/// Test that dir_exists only accepts directories
#[test]
fn test_dir_exists_withFileAndDir_shouldOnlyAcceptDir() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_dir_exists.tmp", "test content")?;

    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(&test_file));

    Ok(())
}

/// Test that generate_output_path replaces the extension
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path("/tmp/input/lecture.json", "/tmp/output", "srt");
    assert_eq!(output_path, Path::new("/tmp/output/lecture.srt"));
}

/// Test that find_files matches the suffix, ignores subdirectories and sorts
#[test]
fn test_find_files_withMixedEntries_shouldReturnSortedDirectMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "b.json", "[]")?;
    common::create_test_file(dir, "a.JSON", "[]")?;
    common::create_test_file(dir, "notes.txt", "")?;
    common::create_test_file(dir, "b.json.bak", "")?;
    fs::create_dir(dir.join("nested"))?;
    common::create_test_file(&dir.join("nested"), "c.json", "[]")?;
    fs::create_dir(dir.join("folder.json"))?;

    let files = FileManager::find_files(dir, "json")?;

    assert_eq!(files, vec![dir.join("a.JSON"), dir.join("b.json")]);
    Ok(())
}

/// Test that find_files fails for a missing directory
#[test]
fn test_find_files_withMissingDir_shouldFail() {
    assert!(FileManager::find_files("./non_existent_directory_12345", ".json").is_err());
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&test_subdir)?;

    assert!(test_subdir.is_dir());
    Ok(())
}

/// Test that append_to_log_file appends timestamped lines
#[test]
fn test_append_to_log_file_calledTwice_shouldKeepBothEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_file = temp_dir.path().join("logs").join("issues.log");

    FileManager::append_to_log_file(&log_file, "first")?;
    FileManager::append_to_log_file(&log_file, "second")?;

    let content = fs::read_to_string(&log_file)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('[') && lines[0].ends_with("] first"));
    assert!(lines[1].ends_with("] second"));
    Ok(())
}

/// Test that write_atomic replaces content and leaves no staging file
#[test]
fn test_write_atomic_overExistingFile_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = common::create_test_file(temp_dir.path(), "doc.json", "old")?;

    FileManager::write_atomic(&target, b"new")?;

    assert_eq!(fs::read_to_string(&target)?, "new");
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
    Ok(())
}
