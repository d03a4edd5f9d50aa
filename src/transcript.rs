/*!
 * Transcription document parsing.
 *
 * A transcription document is the JSON written by the speech recognizer.
 * Three shapes are accepted:
 * - a bare array of chunks `[{"timestamp": [start, end], "text": "..."}]`
 * - an object holding that array under `"chunks"`
 * - an object holding `"segments"` with `start`/`end`/`text` fields
 *
 * Individual timestamps may be null or missing; they become absent values
 * on the record instead of failing the document.
 */

use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::errors::TranscriptError;

/// One recognized speech segment
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRecord {
    /// Start offset in seconds
    pub start: Option<f64>,
    /// End offset in seconds
    pub end: Option<f64>,
    /// Recognized text, untrimmed
    pub text: String,
}

/// Chunk as written to a transcription document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptChunk {
    pub timestamp: [Option<f64>; 2],
    pub text: String,
}

impl TranscriptChunk {
    pub fn new(start: Option<f64>, end: Option<f64>, text: impl Into<String>) -> Self {
        Self {
            timestamp: [start, end],
            text: text.into(),
        }
    }
}

impl From<&TranscriptChunk> for TranscriptRecord {
    fn from(chunk: &TranscriptChunk) -> Self {
        TranscriptRecord {
            start: chunk.timestamp[0],
            end: chunk.timestamp[1],
            text: chunk.text.clone(),
        }
    }
}

/// Read and parse one transcription document
pub fn extract<P: AsRef<Path>>(path: P) -> Result<Vec<TranscriptRecord>, TranscriptError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| TranscriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_document(&content).map_err(|message| TranscriptError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse document content; the error is a human readable reason
pub fn parse_document(content: &str) -> Result<Vec<TranscriptRecord>, String> {
    let json: Value = serde_json::from_str(content).map_err(|e| format!("invalid JSON: {}", e))?;

    let (items, segment_style) = match &json {
        Value::Array(items) => (items, false),
        Value::Object(map) => {
            if let Some(chunks) = map.get("chunks") {
                let items = chunks.as_array().ok_or("\"chunks\" is not an array")?;
                (items, false)
            } else if let Some(segments) = map.get("segments") {
                let items = segments.as_array().ok_or("\"segments\" is not an array")?;
                (items, true)
            } else {
                return Err("object has neither \"chunks\" nor \"segments\"".to_string());
            }
        }
        _ => return Err("expected an array of chunks or an object".to_string()),
    };

    items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            if !item.is_object() {
                return Err(format!("chunk {} is not an object", position));
            }
            Ok(if segment_style {
                parse_segment(item)
            } else {
                parse_chunk(item)
            })
        })
        .collect()
}

// @parses: {"timestamp": [start, end], "text": ...}
fn parse_chunk(item: &Value) -> TranscriptRecord {
    let timestamp = item.get("timestamp").and_then(|t| t.as_array());
    let bound = |i: usize| timestamp.and_then(|t| t.get(i)).and_then(|v| v.as_f64());

    TranscriptRecord {
        start: bound(0),
        end: bound(1),
        text: text_of(item),
    }
}

// @parses: {"start": s, "end": e, "text": ...}
fn parse_segment(item: &Value) -> TranscriptRecord {
    TranscriptRecord {
        start: item.get("start").and_then(|v| v.as_f64()),
        end: item.get("end").and_then(|v| v.as_f64()),
        text: text_of(item),
    }
}

fn text_of(item: &Value) -> String {
    item.get("text")
        .and_then(|t| t.as_str())
        .unwrap_or_default()
        .to_string()
}
