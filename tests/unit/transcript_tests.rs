/*!
 * Tests for transcription document extraction
 */

use anyhow::Result;
use srtgen::errors::TranscriptError;
use srtgen::transcript::{self, TranscriptChunk, TranscriptRecord};
use crate::common;

/// Test extraction of a well-formed document from disk
#[test]
fn test_extract_withValidFile_shouldReturnOrderedRecords() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_transcript(temp_dir.path(), "talk.json")?;

    let records = transcript::extract(&file)?;

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].text, " Hello there.");
    assert_eq!(records[2].start, Some(5.5));
    assert_eq!(records[2].end, Some(7.25));
    Ok(())
}

/// Test that a malformed document yields a parse error naming the file
#[test]
fn test_extract_withCorruptFile_shouldReturnParseErrorWithPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "broken.json", "[{\"timestamp\": [0.0,")?;

    let error = transcript::extract(&file).unwrap_err();

    assert!(matches!(error, TranscriptError::Parse { ref path, .. } if path == &file));
    assert!(error.to_string().contains("broken.json"));
    Ok(())
}

/// Test that an empty file is a parse error, not an empty transcript
#[test]
fn test_extract_withEmptyFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "empty.json", "")?;
    assert!(matches!(transcript::extract(&file), Err(TranscriptError::Parse { .. })));
    Ok(())
}

/// Test that a missing file is a read error
#[test]
fn test_extract_withMissingFile_shouldReturnReadError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.json");
    assert!(matches!(transcript::extract(&missing), Err(TranscriptError::Read { .. })));
    Ok(())
}

/// Test that written chunks are read back unchanged
#[test]
fn test_transcriptChunk_serialized_shouldParseAsDocument() -> Result<()> {
    let chunks = vec![
        TranscriptChunk::new(Some(0.25), Some(1.0), "a"),
        TranscriptChunk::new(None, Some(2.0), "b"),
    ];
    let json = serde_json::to_string(&chunks)?;
    assert_eq!(json, r#"[{"timestamp":[0.25,1.0],"text":"a"},{"timestamp":[null,2.0],"text":"b"}]"#);

    let records = transcript::parse_document(&json).unwrap();
    let expected: Vec<TranscriptRecord> = chunks.iter().map(TranscriptRecord::from).collect();
    assert_eq!(records, expected);
    Ok(())
}
