//! Single-worker clip processing: transcribe → rewrite → enhance → emit.
//!
//! [`ProcessingQueue`] owns a capacity-one channel feeding exactly one tokio
//! task.  [`ProcessingQueue::submit`] is a non-blocking `try_send` so it is
//! safe to call from the key-event thread; the controller guarantees it is
//! never called while a previous clip is still in flight (that invariant
//! lives in [`RecordingState`], not in queueing — this is deliberately a
//! reject-if-busy hand-off, not a buffered queue).
//!
//! Blocking work (Whisper inference, clipboard automation) runs on
//! `tokio::task::spawn_blocking` so the async runtime never stalls.  Every
//! collaborator failure is caught here, logged, and treated as "no usable
//! text produced" — the completion callback fires no matter what, so the
//! controller always returns to idle.
//!
//! [`RecordingState`]: super::RecordingState

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::audio::Clip;
use crate::commands::apply_voice_commands;
use crate::config::InteractionMode;
use crate::history::HistoryLog;
use crate::inject::TextEmitter;
use crate::llm::Enhancer;
use crate::stt::Transcriber;

// ---------------------------------------------------------------------------
// SubmitError
// ---------------------------------------------------------------------------

/// Why a clip submission was rejected.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A previous clip is still occupying the single pending slot.
    #[error("a clip is already being processed")]
    Busy,

    /// The worker task has shut down and will accept no more clips.
    #[error("the processing worker has shut down")]
    Closed,
}

// ---------------------------------------------------------------------------
// PipelineWorker
// ---------------------------------------------------------------------------

/// The collaborators and settings used to process one clip.
pub struct PipelineWorker {
    transcriber: Arc<dyn Transcriber>,
    enhancer: Option<Arc<dyn Enhancer>>,
    emitter: Arc<dyn TextEmitter>,
    history: HistoryLog,
    language: Option<String>,
    voice_commands: bool,
    mode: InteractionMode,
}

impl PipelineWorker {
    /// Bundle the collaborators for the worker task.
    ///
    /// `enhancer` is `None` when enhancement is disabled in configuration;
    /// the stage is then skipped entirely.
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        enhancer: Option<Arc<dyn Enhancer>>,
        emitter: Arc<dyn TextEmitter>,
        history: HistoryLog,
        language: Option<String>,
        voice_commands: bool,
        mode: InteractionMode,
    ) -> Self {
        Self {
            transcriber,
            enhancer,
            emitter,
            history,
            language,
            voice_commands,
            mode,
        }
    }

    /// Run the full pipeline for one clip.
    ///
    /// Infallible by design: every stage failure is logged and ends the
    /// clip's processing early, never the worker.
    pub async fn process(&self, clip: Clip) {
        log::info!("processing {:.1}s clip", clip.duration_secs());

        // ── 1. Transcription (blocking → thread pool) ────────────────────
        let transcriber = Arc::clone(&self.transcriber);
        let language = self.language.clone();
        let samples = clip.samples;

        let stt_result = tokio::task::spawn_blocking(move || {
            transcriber.transcribe(&samples, language.as_deref())
        })
        .await;

        let raw_text = match stt_result {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                log::error!("transcription failed: {e}");
                return;
            }
            Err(e) => {
                log::error!("transcription task panicked: {e}");
                return;
            }
        };

        log::debug!("transcript = {raw_text:?}");

        // ── 2. Voice-command rewriting ───────────────────────────────────
        let text = if self.voice_commands {
            apply_voice_commands(&raw_text)
        } else {
            raw_text.trim().to_string()
        };

        // ── 3. Enhancement (optional, async) ─────────────────────────────
        let text = match (&self.enhancer, text.is_empty()) {
            (Some(enhancer), false) => {
                let started = Instant::now();
                match enhancer.enhance(&text).await {
                    Ok(cleaned) => {
                        log::debug!(
                            "enhancement took {} ms",
                            started.elapsed().as_millis()
                        );
                        cleaned
                    }
                    Err(e) => {
                        log::warn!("enhancement failed ({e}); keeping raw transcript");
                        text
                    }
                }
            }
            _ => text,
        };

        // ── 4. History + emission ────────────────────────────────────────
        if text.is_empty() {
            log::info!("no speech detected");
            return;
        }

        self.history.append(&text, self.mode.label());

        let emitter = Arc::clone(&self.emitter);
        let outgoing = text.clone();
        let emit_result =
            tokio::task::spawn_blocking(move || emitter.emit(&outgoing)).await;

        match emit_result {
            Ok(Ok(())) => log::info!("{text}"),
            Ok(Err(e)) => log::warn!("text emission failed: {e}"),
            Err(e) => log::warn!("emit task panicked: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ProcessingQueue
// ---------------------------------------------------------------------------

/// Capacity-one hand-off to the single worker task.
///
/// Dropping the queue closes the channel; the worker finishes any in-flight
/// clip and exits.  Nothing ever joins the worker — shutdown must not block
/// on a running inference.
pub struct ProcessingQueue {
    tx: mpsc::Sender<Clip>,
}

impl ProcessingQueue {
    /// Spawn the worker task on the current tokio runtime.
    ///
    /// `on_complete` fires after **every** processed clip, success and
    /// failure alike — it is how the controller gets back to idle.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime context.
    pub fn spawn(
        worker: PipelineWorker,
        on_complete: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel::<Clip>(1);

        tokio::spawn(async move {
            while let Some(clip) = rx.recv().await {
                worker.process(clip).await;
                on_complete();
            }
            log::debug!("processing queue closed; worker exiting");
        });

        Self { tx }
    }

    /// Hand one clip to the worker without blocking.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Busy`] when the single slot is occupied (the rejected
    /// clip is dropped), [`SubmitError::Closed`] after shutdown.
    pub fn submit(&self, clip: Clip) -> Result<(), SubmitError> {
        use tokio::sync::mpsc::error::TrySendError;

        self.tx.try_send(clip).map_err(|e| match e {
            TrySendError::Full(_) => SubmitError::Busy,
            TrySendError::Closed(_) => SubmitError::Closed,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{Duration, SystemTime};

    use crate::inject::EmitError;
    use crate::stt::MockTranscriber;
    use tempfile::tempdir;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Spy emitter recording every emitted string.
    struct SpyEmitter {
        emitted: Mutex<Vec<String>>,
    }

    impl SpyEmitter {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                emitted: Mutex::new(Vec::new()),
            })
        }

        fn emitted(&self) -> Vec<String> {
            self.emitted.lock().unwrap().clone()
        }
    }

    impl TextEmitter for SpyEmitter {
        fn emit(&self, text: &str) -> Result<(), EmitError> {
            self.emitted.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    /// Enhancer double that uppercases input.
    struct UppercaseEnhancer;

    #[async_trait::async_trait]
    impl Enhancer for UppercaseEnhancer {
        async fn enhance(&self, text: &str) -> Result<String, crate::llm::EnhanceError> {
            Ok(text.to_uppercase())
        }

        fn status(&self) -> String {
            "enabled (test)".into()
        }
    }

    /// Enhancer double that always fails.
    struct FailingEnhancer;

    #[async_trait::async_trait]
    impl Enhancer for FailingEnhancer {
        async fn enhance(&self, _text: &str) -> Result<String, crate::llm::EnhanceError> {
            Err(crate::llm::EnhanceError::Timeout)
        }

        fn status(&self) -> String {
            "enabled (test)".into()
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn one_second_clip() -> Clip {
        Clip {
            samples: vec![0.1_f32; 16_000],
            duration: Duration::from_secs(1),
            started_at: SystemTime::now(),
        }
    }

    struct Harness {
        worker: PipelineWorker,
        emitter: Arc<SpyEmitter>,
        history: HistoryLog,
        _dir: tempfile::TempDir,
    }

    fn harness(
        transcriber: Arc<dyn Transcriber>,
        enhancer: Option<Arc<dyn Enhancer>>,
        voice_commands: bool,
    ) -> Harness {
        let dir = tempdir().expect("temp dir");
        let history = HistoryLog::new(dir.path().join("history.jsonl"));
        let emitter = SpyEmitter::new();

        let worker = PipelineWorker::new(
            transcriber,
            enhancer,
            Arc::clone(&emitter) as Arc<dyn TextEmitter>,
            history.clone(),
            Some("en".into()),
            voice_commands,
            InteractionMode::Hold,
        );

        Harness {
            worker,
            emitter,
            history,
            _dir: dir,
        }
    }

    // -----------------------------------------------------------------------
    // PipelineWorker tests
    // -----------------------------------------------------------------------

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn transcript_is_emitted_and_recorded() {
        let h = harness(Arc::new(MockTranscriber::ok("hello world")), None, false);

        h.worker.process(one_second_clip()).await;

        assert_eq!(h.emitter.emitted(), vec!["hello world".to_string()]);
        let entries = h.history.recent(10);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "hello world");
        assert_eq!(entries[0].mode, "hold");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn voice_commands_rewrite_the_transcript() {
        let h = harness(
            Arc::new(MockTranscriber::ok("hello new paragraph world")),
            None,
            true,
        );

        h.worker.process(one_second_clip()).await;

        assert_eq!(h.emitter.emitted(), vec!["hello\n\nworld".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn enhancer_output_is_emitted() {
        let h = harness(
            Arc::new(MockTranscriber::ok("hello")),
            Some(Arc::new(UppercaseEnhancer)),
            false,
        );

        h.worker.process(one_second_clip()).await;

        assert_eq!(h.emitter.emitted(), vec!["HELLO".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn enhancer_failure_keeps_raw_transcript() {
        let h = harness(
            Arc::new(MockTranscriber::ok("hello")),
            Some(Arc::new(FailingEnhancer)),
            false,
        );

        h.worker.process(one_second_clip()).await;

        assert_eq!(h.emitter.emitted(), vec!["hello".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn empty_transcript_emits_and_records_nothing() {
        let h = harness(Arc::new(MockTranscriber::ok("")), None, false);

        h.worker.process(one_second_clip()).await;

        assert!(h.emitter.emitted().is_empty());
        assert!(h.history.recent(10).is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn transcription_failure_emits_nothing() {
        let h = harness(
            Arc::new(MockTranscriber::err(crate::stt::SttError::Transcription(
                "boom".into(),
            ))),
            None,
            false,
        );

        h.worker.process(one_second_clip()).await;

        assert!(h.emitter.emitted().is_empty());
        assert!(h.history.recent(10).is_empty());
    }

    // -----------------------------------------------------------------------
    // ProcessingQueue tests
    // -----------------------------------------------------------------------

    /// Build a worker whose transcriber blocks long enough to keep the
    /// single slot occupied.
    fn slow_harness(hold_for: Duration) -> Harness {
        struct SlowTranscriber(Duration);

        impl Transcriber for SlowTranscriber {
            fn transcribe(
                &self,
                _samples: &[f32],
                _language: Option<&str>,
            ) -> Result<String, crate::stt::SttError> {
                std::thread::sleep(self.0);
                Ok("slow".into())
            }
        }

        harness(Arc::new(SlowTranscriber(hold_for)), None, false)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn completion_callback_fires_after_each_clip() {
        let h = harness(Arc::new(MockTranscriber::ok("one")), None, false);
        let completions = Arc::new(AtomicUsize::new(0));
        let completions_clone = Arc::clone(&completions);

        let queue = ProcessingQueue::spawn(h.worker, move || {
            completions_clone.fetch_add(1, Ordering::SeqCst);
        });

        queue.submit(one_second_clip()).expect("first submit");

        for _ in 0..200 {
            if completions.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(completions.load(Ordering::SeqCst), 1);
        assert_eq!(h.emitter.emitted(), vec!["one".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn second_submit_while_slot_full_is_rejected() {
        let h = slow_harness(Duration::from_millis(300));
        let queue = ProcessingQueue::spawn(h.worker, || {});

        // Fill the slot twice in quick succession; the worker cannot have
        // consumed both, so at least the second must bounce.
        queue.submit(one_second_clip()).expect("first submit");
        let second = queue.submit(one_second_clip());
        let third = queue.submit(one_second_clip());

        assert!(
            matches!(second, Err(SubmitError::Busy)) || matches!(third, Err(SubmitError::Busy)),
            "overlapping submissions must be rejected"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn completion_fires_even_when_transcription_fails() {
        let h = harness(
            Arc::new(MockTranscriber::err(crate::stt::SttError::Transcription(
                "boom".into(),
            ))),
            None,
            false,
        );
        let completions = Arc::new(AtomicUsize::new(0));
        let completions_clone = Arc::clone(&completions);

        let queue = ProcessingQueue::spawn(h.worker, move || {
            completions_clone.fetch_add(1, Ordering::SeqCst);
        });

        queue.submit(one_second_clip()).expect("submit");

        for _ in 0..200 {
            if completions.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }
}
