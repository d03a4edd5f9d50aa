/*!
 * # srtgen - speech transcripts to SRT subtitles
 *
 * A Rust library that turns timestamped speech-recognition output into
 * SRT caption files, a whole directory at a time.
 *
 * ## Features
 *
 * - Fractional-second offsets to `HH:MM:SS,mmm` with rounding carry
 * - Strict or lenient handling of missing timestamps
 * - Batch conversion that records per-file failures and keeps going
 * - Atomic, idempotent subtitle output
 * - Optional transcription stage driving an external recognizer
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: Offset to timecode conversion
 * - `subtitle`: Caption block formatting
 * - `transcript`: Transcription document parsing
 * - `writer`: Subtitle file output
 * - `batch`: Directory-level orchestration and `BatchResult`
 * - `transcription`: `Transcriber` trait and the audio directory stage
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod batch;
pub mod errors;
pub mod file_utils;
pub mod subtitle;
pub mod timecode;
pub mod transcript;
pub mod transcription;
pub mod writer;

// Re-export main types for easier usage
pub use app_config::{Config, ConversionConfig, TranscriptionConfig};
pub use batch::{BatchOrchestrator, BatchResult};
pub use subtitle::{FormatMode, SubtitleBlock, SubtitleDocument};
pub use timecode::Timecode;
pub use transcript::{TranscriptChunk, TranscriptRecord};
pub use transcription::{CancellationFlag, CommandTranscriber, Transcriber, TranscriptionStage};
pub use writer::SubtitleFileWriter;
pub use errors::{ConversionError, FileError, RecordError, TranscriptError, TranscriptionError, WriteError};
