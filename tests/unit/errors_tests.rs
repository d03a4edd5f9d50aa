/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use srtgen::errors::{FileError, RecordError, TimestampSide, TranscriptError, TranscriptionError, WriteError};

#[test]
fn test_recordError_missingTimestamp_shouldNamePositionAndSide() {
    let error = RecordError::MissingTimestamp { position: 3, side: TimestampSide::End };
    assert_eq!(error.to_string(), "record 3: missing or invalid end timestamp");
}

#[test]
fn test_fileError_records_shouldListEveryRecord() {
    let error = FileError::Records(vec![
        RecordError::MissingTimestamp { position: 0, side: TimestampSide::Start },
        RecordError::ReversedRange { position: 2, start: 3.0, end: 1.5 },
    ]);
    let display = error.to_string();
    assert!(display.starts_with("2 invalid record(s)"));
    assert!(display.contains("record 0: missing or invalid start timestamp"));
    assert!(display.contains("record 2: start 3s is after end 1.5s"));
}

#[test]
fn test_fileError_fromTranscriptError_shouldBeTransparent() {
    let error: FileError = TranscriptError::Parse {
        path: PathBuf::from("/in/a.json"),
        message: "invalid JSON".to_string(),
    }
    .into();
    assert_eq!(error.to_string(), "Failed to parse transcript /in/a.json: invalid JSON");
}

#[test]
fn test_fileError_fromWriteError_shouldNameTarget() {
    let error: FileError = WriteError {
        path: PathBuf::from("/out/a.srt"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    }
    .into();
    assert!(error.to_string().contains("/out/a.srt"));
    assert!(error.to_string().contains("denied"));
}

#[test]
fn test_transcriptionError_timeout_shouldNameSeconds() {
    assert_eq!(
        TranscriptionError::Timeout(30).to_string(),
        "Transcription timed out after 30 seconds"
    );
}
