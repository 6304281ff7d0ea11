use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Main configuration for swipeshot.
///
/// Read once at startup; never reloaded while the loop runs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Touch device path (e.g. /dev/input/event2). Prompts when unset.
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
    /// Exact number of fingers the swipe must use.
    #[serde(default = "default_fingers")]
    pub fingers: usize,
    /// Minimum summed vertical travel in screen units.
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f64,
    /// Contact slot capacity. Events for slots beyond this are ignored.
    #[serde(default = "default_max_slots")]
    pub max_slots: usize,
}

fn default_screen_width() -> u32 {
    1920
}

fn default_screen_height() -> u32 {
    1080
}

fn default_fingers() -> usize {
    3
}

fn default_distance_threshold() -> f64 {
    200.0
}

fn default_max_slots() -> usize {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: None,
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            fingers: default_fingers(),
            distance_threshold: default_distance_threshold(),
            max_slots: default_max_slots(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/swipeshot/config.toml")
    }

    /// Load config from file, returning defaults if file doesn't exist
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(config) => return config,
                    Err(e) => warn!("failed to parse config: {}", e),
                },
                Err(e) => warn!("failed to read config: {}", e),
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        fs::write(path, contents)
    }
}
