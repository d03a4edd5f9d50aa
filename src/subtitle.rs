use std::fmt;
use serde::{Deserialize, Serialize};
use crate::errors::{RecordError, TimestampSide};
use crate::timecode::Timecode;
use crate::transcript::TranscriptRecord;

// @module: Subtitle block formatting

// @const: First line of an annotated block, replaces the index
pub const NOTE_MARKER: &str = "NOTE invalid timestamp";

/// How records with unusable timestamps are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    /// Reject the record; the file fails
    Strict,
    /// Emit a visibly annotated block and carry on
    #[default]
    Lenient,
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleBlock {
    // @field: Sequence number
    pub index: usize,

    // @field: Start timecode
    pub start: Timecode,

    // @field: End timecode
    pub end: Timecode,

    // @field: Caption text, already trimmed
    pub text: String,
}

impl SubtitleBlock {
    pub fn new(index: usize, start: Timecode, end: Timecode, text: &str) -> Self {
        SubtitleBlock {
            index,
            start,
            end,
            text: text.trim().to_string(),
        }
    }
}

impl fmt::Display for SubtitleBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.start, self.end)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Render the annotated block used for a record whose timestamps are unusable
pub fn format_annotated(position: usize, start: &Timecode, end: &Timecode, text: &str) -> String {
    format!("{} (record {})\n{} --> {}\n{}\n\n", NOTE_MARKER, position, start, end, text.trim())
}

/// Format one caption block.
///
/// `position` identifies the record inside its document and only shows up
/// in errors and annotations. With both timecodes valid the result is the
/// canonical `index / range / text / blank line` block.
pub fn format_block(
    index: usize,
    position: usize,
    start: &Timecode,
    end: &Timecode,
    text: &str,
    mode: FormatMode,
) -> Result<String, RecordError> {
    let side = if !start.is_valid() {
        Some(TimestampSide::Start)
    } else if !end.is_valid() {
        Some(TimestampSide::End)
    } else {
        None
    };

    match (side, mode) {
        (None, _) => Ok(SubtitleBlock::new(index, *start, *end, text).to_string()),
        (Some(_), FormatMode::Lenient) => Ok(format_annotated(position, start, end, text)),
        (Some(side), FormatMode::Strict) => Err(RecordError::MissingTimestamp { position, side }),
    }
}

/// Ordered set of formatted blocks for one output file.
///
/// Valid records are numbered from `index_base` without gaps; annotated
/// blocks do not take a number. Record errors are collected rather than
/// returned so that sibling records are always processed.
#[derive(Debug)]
pub struct SubtitleDocument {
    mode: FormatMode,
    next_index: usize,
    blocks: Vec<String>,
    errors: Vec<RecordError>,
}

impl SubtitleDocument {
    pub fn new(index_base: usize, mode: FormatMode) -> Self {
        SubtitleDocument {
            mode,
            next_index: index_base,
            blocks: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Build a document from an ordered record sequence
    pub fn from_records(records: &[TranscriptRecord], index_base: usize, mode: FormatMode) -> Self {
        let mut document = Self::new(index_base, mode);
        for (position, record) in records.iter().enumerate() {
            document.push_record(position, record);
        }
        document
    }

    /// Convert, format and append one record
    pub fn push_record(&mut self, position: usize, record: &TranscriptRecord) {
        let start = Timecode::from_seconds(record.start);
        let end = Timecode::from_seconds(record.end);

        if let (Some(s), Some(e)) = (start.as_millis(), end.as_millis()) {
            if s > e {
                let error = RecordError::ReversedRange {
                    position,
                    start: record.start.unwrap_or_default(),
                    end: record.end.unwrap_or_default(),
                };
                match self.mode {
                    FormatMode::Strict => self.errors.push(error),
                    FormatMode::Lenient => {
                        self.blocks.push(format_annotated(position, &start, &end, &record.text))
                    }
                }
                return;
            }
        }

        let valid = start.is_valid() && end.is_valid();
        match format_block(self.next_index, position, &start, &end, &record.text, self.mode) {
            Ok(block) => {
                if valid {
                    debug_assert!(block.starts_with(&format!("{}\n", self.next_index)));
                    self.next_index += 1;
                }
                self.blocks.push(block);
            }
            Err(e) => self.errors.push(e),
        }
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn errors(&self) -> &[RecordError] {
        &self.errors
    }

    /// Consume the document; `Err` carries every rejected record
    pub fn into_blocks(self) -> Result<Vec<String>, Vec<RecordError>> {
        if self.errors.is_empty() {
            Ok(self.blocks)
        } else {
            Err(self.errors)
        }
    }
}
