use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::mapping::Category;
use crate::{Result, SoundwalkError};

/// Top-level description of one walkthrough experience: the sound map
/// raster plus the looping sources it drives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceConfig {
    pub map_path: String,
    pub tracks: Vec<TrackSpec>,
    #[serde(default = "default_percent")]
    pub master_volume_percent: u8,
    #[serde(default = "default_percent")]
    pub ambient_volume_percent: u8,
}

/// One audio source bound to a zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSpec {
    pub category: Category,
    pub path: String,
}

fn default_percent() -> u8 {
    50
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            map_path: "assets/img/soundmap.png".to_string(),
            tracks: vec![
                TrackSpec {
                    category: Category::Club,
                    path: "assets/mp3/club.mp3".to_string(),
                },
                TrackSpec {
                    category: Category::Street,
                    path: "assets/mp3/street.mp3".to_string(),
                },
                TrackSpec {
                    category: Category::Home,
                    path: "assets/mp3/home.mp3".to_string(),
                },
            ],
            master_volume_percent: default_percent(),
            ambient_volume_percent: default_percent(),
        }
    }
}

impl ExperienceConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| SoundwalkError::InvalidConfig(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| SoundwalkError::InvalidConfig(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that cannot describe a playable experience.
    pub fn validate(&self) -> Result<()> {
        if self.map_path.is_empty() {
            return Err(SoundwalkError::InvalidConfig(
                "no sound map configured".to_string(),
            ));
        }
        if self.tracks.is_empty() {
            return Err(SoundwalkError::InvalidConfig(
                "no tracks configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for track in &self.tracks {
            if !seen.insert(track.path.as_str()) {
                return Err(SoundwalkError::InvalidConfig(format!(
                    "track source `{}` listed more than once",
                    track.path
                )));
            }
        }
        Ok(())
    }
}
