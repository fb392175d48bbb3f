use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::mapping::Category;
use crate::{Result, SoundwalkError};

/// Interface to one loopable audio resource owned by the external decoding
/// layer. Implementations wrap whatever the host can actually play (a media
/// element, a streaming decoder, a demo stub); the engine only ever drives
/// them through this seam.
pub trait AudioSource: Send {
    /// Begins or resumes playback. Idempotent when already playing.
    fn play(&mut self);

    /// Moves the playhead to an absolute offset in seconds.
    fn seek_to(&mut self, seconds: f32);

    /// Total length in seconds, once the source has buffered far enough to
    /// know it.
    fn duration_seconds(&self) -> Option<f32>;

    /// True once enough data is buffered to play through without stalling.
    fn is_ready(&self) -> bool;

    /// Applies an instantaneous volume multiplier.
    fn set_volume(&mut self, gain: f32);
}

/// Shared handle to an [`AudioSource`]. Handle identity (pointer equality)
/// is track identity: the pipeline stores at most one track per handle.
pub type SourceHandle = Arc<Mutex<dyn AudioSource>>;

/// Wraps a concrete source into a [`SourceHandle`].
pub fn source_handle<S: AudioSource + 'static>(source: S) -> SourceHandle {
    Arc::new(Mutex::new(source))
}

/// One registered sound zone source bound into the shared gain path.
///
/// The track owns the gain value applied to its source. The stored value is
/// also what hosts read back to drive visual feedback such as shadow
/// opacity.
pub struct AudioTrack {
    category: Category,
    source: SourceHandle,
    gain: f32,
}

impl AudioTrack {
    /// Silence until the first gain is applied.
    pub(crate) fn new(category: Category, source: SourceHandle) -> Self {
        Self {
            category,
            source,
            gain: 0.0,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Identity check used for deduplicated registration.
    pub fn is_same_source(&self, handle: &SourceHandle) -> bool {
        Arc::ptr_eq(&self.source, handle)
    }

    /// The gain most recently applied through [`AudioTrack::set_volume`].
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Whether the underlying source has buffered enough to play through.
    /// A poisoned handle cannot play, so it reports not-ready.
    pub fn is_ready(&self) -> bool {
        match self.source.lock() {
            Ok(source) => source.is_ready(),
            Err(_) => false,
        }
    }

    pub fn play(&mut self) -> Result<()> {
        self.lock()?.play();
        Ok(())
    }

    /// Relocates playback to `position` (a fraction in [0, 1]) of the total
    /// duration. A no-op while the duration is still unknown.
    pub fn seek(&mut self, position: f32) -> Result<()> {
        let mut source = self.lock()?;
        if let Some(duration) = source.duration_seconds() {
            source.seek_to(position * duration);
        }
        Ok(())
    }

    /// Stores the gain and forwards it to the source.
    pub fn set_volume(&mut self, gain: f32) -> Result<()> {
        self.gain = gain;
        self.lock()?.set_volume(gain);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, dyn AudioSource + 'static>> {
        self.source
            .lock()
            .map_err(|_| SoundwalkError::msg("audio source handle has been poisoned"))
    }
}

impl fmt::Debug for AudioTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioTrack")
            .field("category", &self.category)
            .field("gain", &self.gain)
            .field("ready", &self.is_ready())
            .finish()
    }
}
