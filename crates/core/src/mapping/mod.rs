use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sampler::SampledColor;

/// Closed set of sound zones. Club, Street and Home are driven by the
/// sound-map channels; Ambient is a background bed controlled only by the
/// user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Club,
    Street,
    Home,
    Ambient,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Club,
        Category::Street,
        Category::Home,
        Category::Ambient,
    ];

    /// Fixed channel and weight binding for the zone. Weights balance the
    /// perceived loudness of the mixed material; the home bed is mixed hot
    /// and gets pulled down.
    pub fn profile(self) -> ZoneProfile {
        match self {
            Category::Club => ZoneProfile::channel(ChannelBinding::Red, 1.0),
            Category::Street => ZoneProfile::channel(ChannelBinding::Green, 1.0),
            Category::Home => ZoneProfile::channel(ChannelBinding::Blue, 0.7),
            Category::Ambient => ZoneProfile::manual(),
        }
    }
}

/// Which sampled channel drives a zone, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelBinding {
    Red,
    Green,
    Blue,
    /// Not driven by the map; the gain comes from the user volume state.
    Manual,
}

impl ChannelBinding {
    /// The driving channel value of a color, `None` for manual zones.
    pub fn channel_value(self, color: SampledColor) -> Option<u8> {
        match self {
            ChannelBinding::Red => Some(color.r),
            ChannelBinding::Green => Some(color.g),
            ChannelBinding::Blue => Some(color.b),
            ChannelBinding::Manual => None,
        }
    }
}

/// Per-category mapping entry: channel binding plus loudness weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneProfile {
    pub binding: ChannelBinding,
    pub weight: f32,
}

impl ZoneProfile {
    const fn channel(binding: ChannelBinding, weight: f32) -> Self {
        Self { binding, weight }
    }

    const fn manual() -> Self {
        Self {
            binding: ChannelBinding::Manual,
            weight: 1.0,
        }
    }
}

/// User-controlled volume scalars: one master fader plus per-category
/// levels for the manual zones. Mutated only by volume-control input.
#[derive(Debug, Clone)]
pub struct VolumeState {
    master: f32,
    manual: HashMap<Category, f32>,
}

impl VolumeState {
    pub fn new(master: f32) -> Self {
        Self {
            master: master.clamp(0.0, 1.0),
            manual: HashMap::new(),
        }
    }

    pub fn master(&self) -> f32 {
        self.master
    }

    pub fn set_master(&mut self, master: f32) {
        self.master = master.clamp(0.0, 1.0);
    }

    /// Slider input arrives as an integer percentage in [0, 100].
    pub fn set_master_percent(&mut self, percent: u8) {
        self.set_master(f32::from(percent.min(100)) / 100.0);
    }

    /// Level of a manual zone. A zone the user never touched is silent.
    pub fn manual_volume(&self, category: Category) -> f32 {
        self.manual.get(&category).copied().unwrap_or(0.0)
    }

    pub fn set_manual_volume(&mut self, category: Category, volume: f32) {
        self.manual.insert(category, volume.clamp(0.0, 1.0));
    }

    pub fn set_manual_percent(&mut self, category: Category, percent: u8) {
        self.set_manual_volume(category, f32::from(percent.min(100)) / 100.0);
    }
}

impl Default for VolumeState {
    /// Faders start at half, matching the installation's opening state.
    fn default() -> Self {
        Self::new(0.5)
    }
}

/// Translates one sampled color into the gain for a zone.
///
/// Channel-driven zones scale the master volume by the zone weight and the
/// normalized channel value; manual zones scale it by the user level for
/// that zone. Pure and stateless: identical inputs always yield identical
/// output.
pub fn compute_gain(category: Category, color: SampledColor, volumes: &VolumeState) -> f32 {
    let ZoneProfile { binding, weight } = category.profile();
    match binding.channel_value(color) {
        Some(value) => volumes.master() * weight * f32::from(value) / 255.0,
        None => volumes.master() * volumes.manual_volume(category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(r: u8, g: u8, b: u8) -> SampledColor {
        SampledColor::new(r, g, b, 255)
    }

    #[test]
    fn full_channel_at_full_volume_is_unity_gain() {
        let volumes = VolumeState::new(1.0);
        let gain = compute_gain(Category::Club, color(255, 0, 0), &volumes);
        assert!((gain - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_channel_is_silent() {
        let volumes = VolumeState::new(1.0);
        assert_eq!(compute_gain(Category::Club, color(0, 99, 99), &volumes), 0.0);
    }

    #[test]
    fn weight_and_master_scale_the_channel() {
        // channel 128 at master 0.5 with weight 0.7 (home zone).
        let volumes = VolumeState::new(0.5);
        let gain = compute_gain(Category::Home, color(0, 0, 128), &volumes);
        assert!((gain - 0.5 * 0.7 * 128.0 / 255.0).abs() < 1e-6);
        assert!((gain - 0.1765).abs() < 1e-3);
    }

    #[test]
    fn each_zone_reads_its_own_channel() {
        let volumes = VolumeState::new(1.0);
        let sampled = color(10, 20, 30);
        assert!(compute_gain(Category::Club, sampled, &volumes) < 0.05);
        let street = compute_gain(Category::Street, sampled, &volumes);
        assert!((street - 20.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn manual_zone_ignores_the_color() {
        let mut volumes = VolumeState::new(0.5);
        volumes.set_manual_volume(Category::Ambient, 0.8);

        let loud = compute_gain(Category::Ambient, color(255, 255, 255), &volumes);
        let dark = compute_gain(Category::Ambient, color(0, 0, 0), &volumes);
        assert_eq!(loud, dark);
        assert!((loud - 0.4).abs() < 1e-6);
    }

    #[test]
    fn untouched_manual_zone_is_silent() {
        let volumes = VolumeState::new(1.0);
        assert_eq!(
            compute_gain(Category::Ambient, color(255, 255, 255), &volumes),
            0.0
        );
    }

    #[test]
    fn gain_is_monotonic_in_the_driving_channel() {
        let volumes = VolumeState::new(0.7);
        let mut previous = -1.0;
        for value in 0..=255u8 {
            let gain = compute_gain(Category::Street, color(0, value, 0), &volumes);
            assert!(gain >= previous);
            previous = gain;
        }
    }

    #[test]
    fn gain_is_monotonic_in_the_master_volume() {
        let sampled = color(0, 140, 0);
        let mut previous = -1.0;
        for step in 0..=20 {
            let volumes = VolumeState::new(step as f32 / 20.0);
            let gain = compute_gain(Category::Street, sampled, &volumes);
            assert!(gain >= previous);
            previous = gain;
        }
    }

    #[test]
    fn percent_sliders_convert_and_clamp() {
        let mut volumes = VolumeState::new(0.0);
        volumes.set_master_percent(75);
        assert!((volumes.master() - 0.75).abs() < f32::EPSILON);

        volumes.set_master_percent(150);
        assert!((volumes.master() - 1.0).abs() < f32::EPSILON);

        volumes.set_manual_percent(Category::Ambient, 30);
        assert!((volumes.manual_volume(Category::Ambient) - 0.3).abs() < f32::EPSILON);
    }
}
