/*!
 * Mock transcriber for testing.
 *
 * Simulates recognizer behaviour without running any model:
 * - `MockTranscriber::working()` - returns fixed chunks for every file
 * - `MockTranscriber::failing_on(name)` - fails for one file name
 * - `MockTranscriber::slow(ms)` - sleeps before answering
 */

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use srtgen::errors::TranscriptionError;
use srtgen::transcript::TranscriptChunk;
use srtgen::transcription::{CancellationFlag, Transcriber};

/// Behavior mode for the mock transcriber
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails for the audio file with this name
    FailingOn(String),
    /// Sleeps before succeeding
    Slow { delay_ms: u64 },
    /// Cancels the given flag after the first call
    CancelAfterFirst(CancellationFlag),
}

/// Mock recognizer counting its calls
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    behavior: MockBehavior,
    calls: Arc<AtomicUsize>,
}

impl MockTranscriber {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing_on(name: &str) -> Self {
        Self::new(MockBehavior::FailingOn(name.to_string()))
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    pub fn cancel_after_first(flag: CancellationFlag) -> Self {
        Self::new(MockBehavior::CancelAfterFirst(flag))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Chunks returned for every successful call
    pub fn fixed_chunks() -> Vec<TranscriptChunk> {
        vec![
            TranscriptChunk::new(Some(0.0), Some(1.5), " First line."),
            TranscriptChunk::new(Some(1.5), None, " Unfinished"),
        ]
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<Vec<TranscriptChunk>, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => Ok(Self::fixed_chunks()),
            MockBehavior::FailingOn(name) => {
                let file_name = audio.file_name().map(|f| f.to_string_lossy().to_string());
                if file_name.as_deref() == Some(name.as_str()) {
                    Err(TranscriptionError::Failed {
                        status: 1,
                        stderr: "model crashed".to_string(),
                    })
                } else {
                    Ok(Self::fixed_chunks())
                }
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Ok(Self::fixed_chunks())
            }
            MockBehavior::CancelAfterFirst(flag) => {
                flag.cancel();
                Ok(Self::fixed_chunks())
            }
        }
    }

    fn name(&self) -> String {
        "mock".to_string()
    }
}
