use crate::graph::AudioGraph;
use crate::mapping::Category;
use crate::track::{AudioTrack, SourceHandle};
use crate::Result;

/// Registry of every track sharing the audio graph.
///
/// The pipeline enforces at-most-one-track-per-source registration,
/// aggregates readiness across all registered tracks, and owns the one-shot
/// synchronization that realigns loop positions once everything has
/// buffered. Tracks started playing at different buffering speeds before
/// becoming fully loaded; without the realignment they would stay out of
/// phase for the rest of the session.
#[derive(Debug)]
pub struct AudioPipeline {
    graph: AudioGraph,
    tracks: Vec<AudioTrack>,
    started: bool,
    synchronized: bool,
}

impl AudioPipeline {
    pub fn new() -> Self {
        Self {
            graph: AudioGraph::new(),
            tracks: Vec::new(),
            started: false,
            synchronized: false,
        }
    }

    pub fn graph(&self) -> &AudioGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut AudioGraph {
        &mut self.graph
    }

    pub fn tracks(&self) -> &[AudioTrack] {
        &self.tracks
    }

    /// Registers a source under a category and connects it into the shared
    /// destination. Re-adding a handle that is already registered is a
    /// no-op, whatever category it arrives under; repeated registration
    /// must not grow a second gain path for the same source.
    pub fn add_track(&mut self, category: Category, source: SourceHandle) {
        if self.tracks.iter().any(|track| track.is_same_source(&source)) {
            tracing::debug!(?category, "source already registered, ignoring duplicate");
            return;
        }

        self.graph.connect();
        self.tracks.push(AudioTrack::new(category, source));
        tracing::debug!(?category, total = self.tracks.len(), "track registered");
    }

    pub fn tracks_by_category(&self, category: Category) -> impl Iterator<Item = &AudioTrack> {
        self.tracks
            .iter()
            .filter(move |track| track.category() == category)
    }

    pub fn tracks_by_category_mut(
        &mut self,
        category: Category,
    ) -> impl Iterator<Item = &mut AudioTrack> {
        self.tracks
            .iter_mut()
            .filter(move |track| track.category() == category)
    }

    /// The single track holding this exact handle, if registered.
    pub fn track_for_source(&self, handle: &SourceHandle) -> Option<&AudioTrack> {
        self.tracks.iter().find(|track| track.is_same_source(handle))
    }

    /// True only when every registered track reports ready. Vacuously true
    /// with no tracks registered.
    pub fn all_tracks_ready(&self) -> bool {
        self.tracks.iter().all(AudioTrack::is_ready)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether the one-shot realignment has already fired.
    pub fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    /// Resumes the shared graph and plays every registered track. Driven by
    /// the first user gesture; later calls are no-ops. When the graph has
    /// been closed by the host the error is surfaced and nothing starts.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            tracing::debug!("pipeline already started");
            return Ok(());
        }

        self.graph.resume()?;
        for track in &mut self.tracks {
            track.play()?;
        }
        self.started = true;
        tracing::info!(tracks = self.tracks.len(), "audio pipeline started");
        Ok(())
    }

    /// Relocates every track to `position` (fraction of each track's own
    /// duration). Tracks that do not know their duration yet skip silently.
    pub fn seek(&mut self, position: f32) -> Result<()> {
        for track in &mut self.tracks {
            track.seek(position)?;
        }
        Ok(())
    }

    /// Runs the loading-to-synchronized transition. Called on every
    /// readiness event; fires the common seek-to-start exactly once, and
    /// only after `start` has been requested and every track reports
    /// ready. Returns whether the realignment fired on this call.
    pub fn resync_if_ready(&mut self) -> Result<bool> {
        if !self.started || self.synchronized || !self.all_tracks_ready() {
            return Ok(false);
        }

        self.synchronized = true;
        self.seek(0.0)?;
        tracing::info!("all tracks ready, loop positions realigned");
        Ok(true)
    }
}

impl Default for AudioPipeline {
    fn default() -> Self {
        Self::new()
    }
}
