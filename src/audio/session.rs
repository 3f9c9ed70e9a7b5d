//! Recording session state: buffer accumulation and clip assembly.
//!
//! [`AudioSession`] owns the accumulation state of one capture excursion.
//! The audio-feed thread calls [`AudioSession::push_chunk`] for every buffer
//! the device delivers; chunks are kept only while the session is active.
//! [`AudioSession::stop`] concatenates everything captured since
//! [`AudioSession::start`] into a single immutable [`Clip`].
//!
//! The clip's duration is **wall-clock elapsed time**, not derived from the
//! sample count — the two can disagree when the device drops frames, and
//! the minimum-length gate in the controller must reflect how long the user
//! actually held the key.
//!
//! # Locking
//!
//! One internal mutex guards the active flag, the buffer list and the start
//! timestamps together.  `stop()` flips the flag and takes ownership of the
//! buffer list in a single critical section, installing a fresh empty list,
//! so a chunk racing in from the feed thread either lands before the drain
//! (and is included) or after it (and is dropped) — never split across both.

use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime};

// ---------------------------------------------------------------------------
// Clip
// ---------------------------------------------------------------------------

/// One complete captured audio segment from start to stop.
///
/// Created once per completed recording, consumed exactly once by the
/// processing queue, never mutated after creation.
#[derive(Debug, Clone)]
pub struct Clip {
    /// Mono PCM samples at the session rate, in arrival order.
    pub samples: Vec<f32>,
    /// Wall-clock time the recording was active.
    pub duration: Duration,
    /// When the recording started.
    pub started_at: SystemTime,
}

impl Clip {
    /// A zero-length clip, as returned by stopping an inactive session.
    fn empty() -> Self {
        Self {
            samples: Vec::new(),
            duration: Duration::ZERO,
            started_at: SystemTime::now(),
        }
    }

    /// Whether the clip contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in fractional seconds, for logging.
    pub fn duration_secs(&self) -> f32 {
        self.duration.as_secs_f32()
    }
}

// ---------------------------------------------------------------------------
// AudioSession
// ---------------------------------------------------------------------------

struct SessionInner {
    active: bool,
    /// Captured buffers in arrival order; concatenated on stop.
    frames: Vec<Vec<f32>>,
    started_at: Option<Instant>,
    started_wall: Option<SystemTime>,
}

/// Accumulates capture buffers for the current recording excursion.
///
/// Safe to share between the controller (start/stop) and the audio-feed
/// thread (push) — all state lives behind one short-held mutex.
pub struct AudioSession {
    sample_rate: u32,
    inner: Mutex<SessionInner>,
}

impl AudioSession {
    /// Create an inactive session expecting mono samples at `sample_rate` Hz.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            inner: Mutex::new(SessionInner {
                active: false,
                frames: Vec::new(),
                started_at: None,
                started_wall: None,
            }),
        }
    }

    /// Begin accumulating audio.
    ///
    /// Clears any leftover buffers and stamps the start time.  Calling
    /// `start` while already active is a no-op — the running excursion keeps
    /// its original start time and buffers.
    pub fn start(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.active {
            return;
        }
        inner.frames.clear();
        inner.active = true;
        inner.started_at = Some(Instant::now());
        inner.started_wall = Some(SystemTime::now());
    }

    /// Stop accumulating and assemble the captured audio into a [`Clip`].
    ///
    /// Calling `stop` while inactive returns an empty clip with zero
    /// duration.  The buffer list is taken and replaced atomically, so
    /// concurrent [`push_chunk`](Self::push_chunk) calls can never land in a
    /// drained list.
    pub fn stop(&self) -> Clip {
        let (frames, duration, started_at) = {
            let mut inner = self.inner.lock().unwrap();
            if !inner.active {
                return Clip::empty();
            }
            inner.active = false;
            let frames = std::mem::take(&mut inner.frames);
            let duration = inner
                .started_at
                .take()
                .map(|t| t.elapsed())
                .unwrap_or_default();
            let started_at = inner.started_wall.take().unwrap_or_else(SystemTime::now);
            (frames, duration, started_at)
        };

        let total: usize = frames.iter().map(Vec::len).sum();
        let mut samples = Vec::with_capacity(total);
        for frame in frames {
            samples.extend_from_slice(&frame);
        }

        Clip {
            samples,
            duration,
            started_at,
        }
    }

    /// Append one buffer of mono samples at the session rate.
    ///
    /// Ignored while the session is inactive, so the persistent capture
    /// stream can keep feeding without gating on the caller side.
    pub fn push_chunk(&self, samples: &[f32]) {
        let mut inner = self.inner.lock().unwrap();
        if inner.active {
            inner.frames.push(samples.to_vec());
        }
    }

    /// Whether a recording excursion is currently active.
    pub fn is_recording(&self) -> bool {
        self.inner.lock().unwrap().active
    }

    /// The mono sample rate this session expects, in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_while_inactive_returns_empty_zero_duration_clip() {
        let session = AudioSession::new(16_000);
        let clip = session.stop();
        assert!(clip.is_empty());
        assert_eq!(clip.duration, Duration::ZERO);
    }

    #[test]
    fn chunks_are_dropped_while_inactive() {
        let session = AudioSession::new(16_000);
        session.push_chunk(&[0.1, 0.2]);
        session.start();
        let clip = session.stop();
        assert!(clip.is_empty());
    }

    #[test]
    fn chunks_concatenate_in_arrival_order() {
        let session = AudioSession::new(16_000);
        session.start();
        session.push_chunk(&[1.0, 2.0]);
        session.push_chunk(&[3.0]);
        session.push_chunk(&[4.0, 5.0]);
        let clip = session.stop();
        assert_eq!(clip.samples, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn start_while_active_is_a_noop() {
        let session = AudioSession::new(16_000);
        session.start();
        session.push_chunk(&[1.0]);
        // A second start must not clear what has been captured so far.
        session.start();
        session.push_chunk(&[2.0]);
        let clip = session.stop();
        assert_eq!(clip.samples, vec![1.0, 2.0]);
    }

    #[test]
    fn start_clears_leftovers_from_previous_excursion() {
        let session = AudioSession::new(16_000);
        session.start();
        session.push_chunk(&[9.0]);
        let _ = session.stop();

        session.start();
        session.push_chunk(&[1.0]);
        let clip = session.stop();
        assert_eq!(clip.samples, vec![1.0]);
    }

    #[test]
    fn duration_is_wall_clock_not_sample_derived() {
        let session = AudioSession::new(16_000);
        session.start();
        // One sample of "audio" but real elapsed time.
        session.push_chunk(&[0.5]);
        std::thread::sleep(Duration::from_millis(30));
        let clip = session.stop();
        assert_eq!(clip.samples.len(), 1);
        assert!(
            clip.duration >= Duration::from_millis(30),
            "duration should reflect wall-clock time, got {:?}",
            clip.duration
        );
    }

    #[test]
    fn stop_deactivates_and_subsequent_pushes_are_dropped() {
        let session = AudioSession::new(16_000);
        session.start();
        session.push_chunk(&[1.0]);
        let first = session.stop();
        assert_eq!(first.samples, vec![1.0]);

        // A chunk arriving after the drain must not appear anywhere.
        session.push_chunk(&[2.0]);
        assert!(!session.is_recording());
        session.start();
        let second = session.stop();
        assert!(second.is_empty());
    }

    #[test]
    fn is_recording_tracks_excursions() {
        let session = AudioSession::new(16_000);
        assert!(!session.is_recording());
        session.start();
        assert!(session.is_recording());
        let _ = session.stop();
        assert!(!session.is_recording());
    }

    #[test]
    fn session_is_sync() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<AudioSession>();
    }
}
