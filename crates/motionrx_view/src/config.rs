//! Animation defaults, loadable from a `motionrx.toml` file.
//!
//! ```toml
//! duration_ms = 250
//! ease = "linear"
//!
//! [shake]
//! shakes = 3.0
//! ```

use core::time::Duration;
use std::path::Path;

use motionrx_core::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read animation config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid animation config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Values used whenever a [`Tween`](crate::tween::Tween) leaves a
/// field unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDefaults {
    pub duration_ms: u64,
    pub ease: Ease,
    pub shake: ShakeConfig,
    pub press: PressConfig,
    pub text: TextSwapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    pub duration_ms: u64,
    /// Number of oscillations.
    pub shakes: f32,
    /// Amplitude in dp.
    pub translation_dp: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PressConfig {
    /// Scale reached at the bottom of the press.
    pub depth: f32,
    /// Total duration, split between pressing and releasing.
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSwapConfig {
    /// Total duration, split between fading out and fading in.
    pub duration_ms: u64,
    /// Pause between setting the text and fading it back in.
    pub pause_ms: u64,
}

impl AnimationDefaults {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let defaults = Self::from_toml_str(&source)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            "loaded animation defaults"
        );
        Ok(defaults)
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl ShakeConfig {
    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl PressConfig {
    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl TextSwapConfig {
    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    #[inline]
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

impl Default for AnimationDefaults {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            ease: Ease::AccelerateDecelerate,
            shake: ShakeConfig::default(),
            press: PressConfig::default(),
            text: TextSwapConfig::default(),
        }
    }
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            shakes: 2.0,
            translation_dp: 5.0,
        }
    }
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            depth: 0.95,
            duration_ms: 300,
        }
    }
}

impl Default for TextSwapConfig {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            pause_ms: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let defaults = AnimationDefaults::from_toml_str(
            r#"
            duration_ms = 250
            ease = "linear"

            [shake]
            shakes = 3.0
            "#,
        )
        .unwrap();

        assert_eq!(defaults.duration(), Duration::from_millis(250));
        assert!(matches!(defaults.ease, Ease::Linear));
        assert_eq!(defaults.shake.shakes, 3.0);
        assert_eq!(defaults.shake.translation_dp, 5.0);
        assert_eq!(defaults.press.depth, 0.95);
        assert_eq!(defaults.text.pause_ms, 300);
    }

    #[test]
    fn cycle_ease_from_table() {
        let defaults =
            AnimationDefaults::from_toml_str("ease = { cycle = 1.5 }")
                .unwrap();
        assert!(matches!(defaults.ease, Ease::Cycle(c) if c == 1.5));
    }

    #[test]
    fn invalid_config_is_a_parse_error() {
        let error =
            AnimationDefaults::from_toml_str("duration_ms = \"soon\"")
                .unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = "/definitely/not/here/motionrx.toml";
        let error = AnimationDefaults::load(path).unwrap_err();
        assert!(matches!(error, ConfigError::Io(_)));
    }
}
