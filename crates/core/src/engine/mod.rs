use crate::mapping::{compute_gain, Category, VolumeState};
use crate::pipeline::AudioPipeline;
use crate::sampler::{SampledColor, SoundMap};
use crate::track::SourceHandle;
use crate::Result;

/// Event-driven facade over the mapping engine.
///
/// The host delivers three kinds of callbacks, all on one thread: pointer
/// moves over the floor plan, readiness transitions from the audio source
/// layer, and volume-control input. The walkthrough samples the sound map,
/// keeps the last sampled color, and pushes recomputed gains into the
/// pipeline after every event that can change them.
#[derive(Debug)]
pub struct Walkthrough {
    map: Option<SoundMap>,
    pipeline: AudioPipeline,
    volumes: VolumeState,
    color: SampledColor,
    playing: bool,
}

impl Walkthrough {
    pub fn new() -> Self {
        Self::with_volumes(VolumeState::default())
    }

    pub fn with_volumes(volumes: VolumeState) -> Self {
        Self {
            map: None,
            pipeline: AudioPipeline::new(),
            volumes,
            color: SampledColor::default(),
            playing: false,
        }
    }

    /// Binds a freshly decoded sound map. Rebinding invalidates nothing;
    /// the last sampled color stays in effect until the next pointer move.
    pub fn bind_map(&mut self, map: SoundMap) {
        tracing::info!(
            width = map.width(),
            height = map.height(),
            "sound map bound"
        );
        self.map = Some(map);
    }

    pub fn add_source(&mut self, category: Category, source: SourceHandle) {
        self.pipeline.add_track(category, source);
    }

    pub fn pipeline(&self) -> &AudioPipeline {
        &self.pipeline
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Loading state for the host's spinner overlay.
    pub fn all_sounds_loaded(&self) -> bool {
        self.pipeline.all_tracks_ready()
    }

    /// The color most recently sampled under the pointer.
    pub fn sampled_color(&self) -> SampledColor {
        self.color
    }

    pub fn volumes(&self) -> &VolumeState {
        &self.volumes
    }

    /// The gain currently mapped to a zone, also used by hosts for visual
    /// feedback derived from the sampled intensities.
    pub fn gain_for(&self, category: Category) -> f32 {
        compute_gain(category, self.color, &self.volumes)
    }

    /// First user gesture: starts the pipeline and begins reacting to
    /// pointer input. Sources may have finished buffering before the
    /// gesture arrived, so readiness is evaluated once right away.
    pub fn start(&mut self) -> Result<()> {
        if self.playing {
            return Ok(());
        }

        self.pipeline.start()?;
        self.playing = true;
        self.pipeline.resync_if_ready()?;
        self.apply_gains()
    }

    /// Pointer move over the floor plan, normalized to [0, 1] x [0, 1].
    /// Ignored until playback has been requested. With no map bound the
    /// sample is skipped and the previous color stays in effect.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> Result<()> {
        if !self.playing {
            return Ok(());
        }

        let Some(map) = &self.map else {
            tracing::warn!("pointer move ignored, no sound map bound");
            return Ok(());
        };

        self.color = map.sample(x, y);
        self.apply_gains()
    }

    /// Relay for the source layer's "buffered enough" callback. Evaluates
    /// the readiness aggregate; when the one-shot realignment fires, gains
    /// are re-applied so freshly audible tracks match the current position.
    pub fn source_loaded(&mut self) -> Result<()> {
        if !self.playing {
            return Ok(());
        }

        if self.pipeline.resync_if_ready()? {
            self.apply_gains()?;
        }
        Ok(())
    }

    /// Master fader input as an integer percentage in [0, 100].
    pub fn set_master_volume_percent(&mut self, percent: u8) -> Result<()> {
        self.volumes.set_master_percent(percent);
        self.apply_gains()
    }

    /// Level input for a manual zone such as the ambient bed.
    pub fn set_category_volume(&mut self, category: Category, volume: f32) -> Result<()> {
        self.volumes.set_manual_volume(category, volume);
        self.apply_gains()
    }

    fn apply_gains(&mut self) -> Result<()> {
        for category in Category::ALL {
            let gain = compute_gain(category, self.color, &self.volumes);
            for track in self.pipeline.tracks_by_category_mut(category) {
                track.set_volume(gain)?;
            }
        }
        Ok(())
    }
}

impl Default for Walkthrough {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::track::AudioSource;

    #[derive(Default)]
    struct RecordingSource {
        ready: bool,
        duration: Option<f32>,
        playing: bool,
        seeks: Vec<f32>,
        volumes: Vec<f32>,
    }

    impl AudioSource for RecordingSource {
        fn play(&mut self) {
            self.playing = true;
        }

        fn seek_to(&mut self, seconds: f32) {
            self.seeks.push(seconds);
        }

        fn duration_seconds(&self) -> Option<f32> {
            self.duration
        }

        fn is_ready(&self) -> bool {
            self.ready
        }

        fn set_volume(&mut self, gain: f32) {
            self.volumes.push(gain);
        }
    }

    fn shared() -> Arc<Mutex<RecordingSource>> {
        Arc::new(Mutex::new(RecordingSource::default()))
    }

    fn mark_loaded(source: &Arc<Mutex<RecordingSource>>) {
        let mut guard = source.lock().unwrap();
        guard.ready = true;
        guard.duration = Some(90.0);
    }

    /// 1x1 map with a fixed color so gains are predictable.
    fn uniform_map(r: u8, g: u8, b: u8) -> SoundMap {
        SoundMap::from_rgba8(1, 1, vec![r, g, b, 255]).unwrap()
    }

    fn last_volume(source: &Arc<Mutex<RecordingSource>>) -> Option<f32> {
        source.lock().unwrap().volumes.last().copied()
    }

    #[test]
    fn pointer_moves_are_ignored_until_started() {
        let club = shared();
        let mut walk = Walkthrough::new();
        walk.bind_map(uniform_map(255, 0, 0));
        walk.add_source(Category::Club, club.clone());

        walk.pointer_moved(0.5, 0.5).unwrap();
        assert_eq!(walk.sampled_color(), SampledColor::default());
        assert!(last_volume(&club).is_none());
    }

    #[test]
    fn pointer_flow_samples_and_applies_gains() {
        let club = shared();
        let street = shared();
        let mut walk = Walkthrough::new();
        walk.bind_map(uniform_map(255, 51, 0));
        walk.add_source(Category::Club, club.clone());
        walk.add_source(Category::Street, street.clone());
        walk.start().unwrap();

        walk.pointer_moved(0.5, 0.5).unwrap();

        assert_eq!(walk.sampled_color(), SampledColor::new(255, 51, 0, 255));
        // master 0.5, weight 1.0, full red channel.
        assert!((last_volume(&club).unwrap() - 0.5).abs() < 1e-6);
        assert!((last_volume(&street).unwrap() - 0.5 * 51.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn missing_map_skips_the_sample_and_keeps_the_previous_color() {
        let club = shared();
        let mut walk = Walkthrough::new();
        walk.add_source(Category::Club, club.clone());
        walk.start().unwrap();

        walk.pointer_moved(0.3, 0.7).unwrap();
        assert_eq!(walk.sampled_color(), SampledColor::default());

        walk.bind_map(uniform_map(200, 0, 0));
        walk.pointer_moved(0.3, 0.7).unwrap();
        assert_eq!(walk.sampled_color(), SampledColor::new(200, 0, 0, 255));
    }

    #[test]
    fn readiness_relay_realigns_once_and_reapplies_gains() {
        let club = shared();
        let street = shared();
        let mut walk = Walkthrough::new();
        walk.bind_map(uniform_map(128, 128, 128));
        walk.add_source(Category::Club, club.clone());
        walk.add_source(Category::Street, street.clone());
        walk.start().unwrap();

        // First source finishes buffering; the aggregate is still false.
        mark_loaded(&club);
        walk.source_loaded().unwrap();
        assert!(!walk.all_sounds_loaded());
        assert!(club.lock().unwrap().seeks.is_empty());

        mark_loaded(&street);
        walk.source_loaded().unwrap();
        assert!(walk.all_sounds_loaded());
        assert_eq!(club.lock().unwrap().seeks, vec![0.0]);
        assert_eq!(street.lock().unwrap().seeks, vec![0.0]);

        // A straggling readiness event must not seek again.
        walk.source_loaded().unwrap();
        assert_eq!(club.lock().unwrap().seeks, vec![0.0]);
    }

    #[test]
    fn readiness_events_before_start_do_nothing() {
        let club = shared();
        let mut walk = Walkthrough::new();
        walk.add_source(Category::Club, club.clone());

        mark_loaded(&club);
        walk.source_loaded().unwrap();
        assert!(club.lock().unwrap().seeks.is_empty());
        assert!(!club.lock().unwrap().playing);
    }

    #[test]
    fn sources_ready_before_the_gesture_realign_on_start() {
        let club = shared();
        let mut walk = Walkthrough::new();
        walk.add_source(Category::Club, club.clone());
        mark_loaded(&club);

        walk.start().unwrap();
        assert!(club.lock().unwrap().playing);
        assert_eq!(club.lock().unwrap().seeks, vec![0.0]);
    }

    #[test]
    fn master_slider_reapplies_every_gain() {
        let club = shared();
        let ambient = shared();
        let mut walk = Walkthrough::new();
        walk.bind_map(uniform_map(255, 0, 0));
        walk.add_source(Category::Club, club.clone());
        walk.add_source(Category::Ambient, ambient.clone());
        walk.set_category_volume(Category::Ambient, 0.8).unwrap();
        walk.start().unwrap();
        walk.pointer_moved(0.0, 0.0).unwrap();

        walk.set_master_volume_percent(100).unwrap();
        assert!((last_volume(&club).unwrap() - 1.0).abs() < 1e-6);
        assert!((last_volume(&ambient).unwrap() - 0.8).abs() < 1e-6);

        walk.set_master_volume_percent(0).unwrap();
        assert_eq!(last_volume(&club).unwrap(), 0.0);
        assert_eq!(last_volume(&ambient).unwrap(), 0.0);
    }

    #[test]
    fn second_gesture_is_a_no_op() {
        let club = shared();
        let mut walk = Walkthrough::new();
        walk.add_source(Category::Club, club.clone());

        walk.start().unwrap();
        walk.start().unwrap();
        assert!(walk.is_playing());
        assert!(club.lock().unwrap().playing);
    }
}
