//! Core library for the Soundwalk installation.
//!
//! A visitor moves a pointer over a floor-plan image and "walks" through
//! overlapping sound zones: the pointer position is sampled against a
//! color-coded sound map and the sampled channel intensities drive the
//! gains of looping ambient tracks that share one audio graph. Each module
//! owns a distinct subsystem (pixel sampling, the track registry, volume
//! mapping, the event-driven facade) so hosts can embed exactly the layer
//! they need.

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod mapping;
pub mod pipeline;
pub mod sampler;
pub mod track;

pub use config::{ExperienceConfig, TrackSpec};
pub use engine::Walkthrough;
pub use error::{Result, SoundwalkError};
pub use graph::{AudioGraph, GraphState};
pub use mapping::{compute_gain, Category, ChannelBinding, VolumeState, ZoneProfile};
pub use pipeline::AudioPipeline;
pub use sampler::{SampledColor, SoundMap};
pub use track::{source_handle, AudioSource, AudioTrack, SourceHandle};
