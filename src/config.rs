//! Application-level configuration loading: buzz detection and accepted tossup and bonus values.

use std::{env, fs, io::ErrorKind, path::PathBuf, sync::LazyLock};

use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the tracker looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZBOWL_TRACKER_CONFIG_PATH";
/// Tossup values a reader may award when no configuration overrides them.
const DEFAULT_ACCEPTED_POINTS: [i32; 5] = [-5, 0, 10, 15, 20];
/// Bonus totals a reader may award when no configuration overrides them.
const DEFAULT_BONUS_POINTS: [i32; 4] = [0, 10, 20, 30];
/// Default buffer size of the event broadcast channel.
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Plain-text buzz: "buzz", "bzz", "buuuzzz" and friends, ignoring case and padding.
static BUZZ_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*bu?z+\s*$").expect("buzz pattern is valid"));

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    buzz_emojis: Vec<Regex>,
    accepted_points: Vec<i32>,
    bonus_points: Vec<i32>,
    event_capacity: usize,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json_str(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        emojis = app_config.buzz_emojis.len(),
                        points = ?app_config.accepted_points,
                        "loaded config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document. Missing keys take their default value.
    pub fn from_json_str(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Whether `text` is a buzz, either typed out or as one of the configured custom emojis.
    pub fn is_buzz(&self, text: &str) -> bool {
        BUZZ_TEXT.is_match(text) || self.buzz_emojis.iter().any(|regex| regex.is_match(text))
    }

    /// Whether the reader may award `points` for a tossup.
    pub fn accepts_points(&self, points: i32) -> bool {
        self.accepted_points.contains(&points)
    }

    /// Whether the reader may award `points` for a whole bonus.
    pub fn accepts_bonus_points(&self, points: i32) -> bool {
        self.bonus_points.contains(&points)
    }

    /// Buffer size of the event broadcast channel.
    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    buzz_emojis: Vec<String>,
    accepted_points: Vec<i32>,
    bonus_points: Vec<i32>,
    event_capacity: usize,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            buzz_emojis: Vec::new(),
            accepted_points: DEFAULT_ACCEPTED_POINTS.to_vec(),
            bonus_points: DEFAULT_BONUS_POINTS.to_vec(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let buzz_emojis = value
            .buzz_emojis
            .iter()
            .filter_map(|emoji| {
                // Custom emojis arrive as `<:name:1234567890>`.
                let pattern = format!(r"^<{}\d+>$", regex::escape(emoji));
                match Regex::new(&pattern) {
                    Ok(regex) => Some(regex),
                    Err(err) => {
                        warn!(emoji = %emoji, error = %err, "ignoring unusable buzz emoji");
                        None
                    }
                }
            })
            .collect();

        Self {
            buzz_emojis,
            accepted_points: value.accepted_points,
            bonus_points: value.bonus_points,
            event_capacity: value.event_capacity,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_buzzes_are_recognised() {
        let config = AppConfig::default();
        for text in ["buzz", "BUZZ", "bz", "bzzzz", "  buuz  ", "Buzzzz"] {
            assert!(config.is_buzz(text), "{text:?} should be a buzz");
        }
        for text in ["buzzer", "bu", "I buzz", "buz z", ""] {
            assert!(!config.is_buzz(text), "{text:?} should not be a buzz");
        }
    }

    #[test]
    fn configured_emojis_are_recognised() {
        let config = AppConfig::from_json_str(r#"{ "buzz_emojis": [":buzz:"] }"#).unwrap();
        assert!(config.is_buzz("<:buzz:123456>"));
        assert!(!config.is_buzz("<:other:123456>"));
        assert!(!config.is_buzz("<:buzz:>"));
    }

    #[test]
    fn default_points_are_tossup_values() {
        let config = AppConfig::default();
        for points in DEFAULT_ACCEPTED_POINTS {
            assert!(config.accepts_points(points));
        }
        assert!(!config.accepts_points(5));
        assert_eq!(config.event_capacity(), DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn default_bonus_points_are_multiples_of_ten() {
        let config = AppConfig::default();
        for points in [0, 10, 20, 30] {
            assert!(config.accepts_bonus_points(points));
        }
        assert!(!config.accepts_bonus_points(-5));
        assert!(!config.accepts_bonus_points(15));
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = AppConfig::from_json_str(r#"{ "accepted_points": [-10, 10] }"#).unwrap();
        assert!(config.accepts_points(-10));
        assert!(!config.accepts_points(15));
        assert_eq!(config.event_capacity(), DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(AppConfig::from_json_str("{ not json").is_err());
    }
}
