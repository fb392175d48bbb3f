use soundwalk_core::AudioSource;

/// Stand-in for a real decoded audio stream.
///
/// The demo binary has no audio hardware to talk to, so this source just
/// records what the engine asks of it. Readiness is flipped explicitly,
/// which lets the walkthrough exercise the loading-to-synchronized
/// transition the same way buffering media elements would.
#[derive(Debug)]
pub struct ScriptedSource {
    name: String,
    duration_seconds: f32,
    ready: bool,
    playing: bool,
    position_seconds: f32,
    volume: f32,
}

impl ScriptedSource {
    pub fn new(name: impl Into<String>, duration_seconds: f32) -> Self {
        Self {
            name: name.into(),
            duration_seconds,
            ready: false,
            playing: false,
            position_seconds: 0.0,
            volume: 0.0,
        }
    }

    /// Marks the source as buffered through, as a media element would after
    /// its can-play-through event.
    pub fn finish_loading(&mut self) {
        self.ready = true;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position_seconds(&self) -> f32 {
        self.position_seconds
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl AudioSource for ScriptedSource {
    fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            tracing::debug!(name = %self.name, "demo source playing");
        }
    }

    fn seek_to(&mut self, seconds: f32) {
        self.position_seconds = seconds.clamp(0.0, self.duration_seconds);
    }

    fn duration_seconds(&self) -> Option<f32> {
        // Media elements do not report a duration until enough metadata
        // has buffered.
        self.ready.then_some(self.duration_seconds)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn set_volume(&mut self, gain: f32) {
        self.volume = gain;
    }
}
