use crate::error::{ReelError, ReelResult};
use crate::rate::{FpsJitter, DEFAULT_FPS_PRESETS};
use crate::transform::TransformConfig;

/// Viewport width in CSS pixels at or below which the narrow frames play.
pub const DEFAULT_BREAKPOINT_PX: f64 = 490.0;

/// Settings for a [`Player`](crate::Player) and its host.
///
/// All fields have defaults, so a config file only needs to name what it
/// changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub base_fps: f64,
    pub breakpoint_px: f64,
    pub narrow: TransformConfig,
    pub presets: Vec<f64>,
    pub jitter: FpsJitter,
    /// Skip playback entirely (`prefers-reduced-motion`)
    pub reduced_motion: bool,
    pub frames_url: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_fps: 10.0,
            breakpoint_px: DEFAULT_BREAKPOINT_PX,
            narrow: TransformConfig::default(),
            presets: DEFAULT_FPS_PRESETS.to_vec(),
            jitter: FpsJitter::default(),
            reduced_motion: false,
            frames_url: "./public/frames-70-char.json".to_string(),
        }
    }
}

impl PlayerConfig {
    /// Parse a TOML string into a validated `PlayerConfig`.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> ReelResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ReelError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject rates the scheduler cannot pace and jitter bounds the RNG
    /// cannot sample.
    pub fn validate(&self) -> ReelResult<()> {
        fn positive(fps: f64) -> bool {
            fps.is_finite() && fps > 0.0
        }

        if !positive(self.base_fps) {
            return Err(ReelError::config(format!("base_fps must be positive, got {}", self.base_fps)));
        }
        if let Some(bad) = self.presets.iter().find(|&&p| !positive(p)) {
            return Err(ReelError::config(format!("preset fps must be positive, got {bad}")));
        }
        let jitter = &self.jitter;
        if !positive(jitter.min_fps) || !jitter.max_fps.is_finite() || jitter.min_fps > jitter.max_fps {
            return Err(ReelError::config("jitter fps bounds are invalid"));
        }
        if !jitter.spread.is_finite() || jitter.spread < 0.0 {
            return Err(ReelError::config(format!("jitter spread must be non-negative, got {}", jitter.spread)));
        }
        let (min_delay, max_delay) = (jitter.min_delay_ms, jitter.max_delay_ms);
        if !min_delay.is_finite() || !max_delay.is_finite() || min_delay > max_delay {
            return Err(ReelError::config("jitter delay bounds are invalid"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.base_fps, 10.0);
        assert_eq!(config.breakpoint_px, 490.0);
        assert_eq!(config.narrow.target_rows, Some(35));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_fps() {
        let config = PlayerConfig {
            base_fps: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ReelError::Config(_))));

        let config = PlayerConfig {
            presets: vec![10.0, f64::NAN],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    fn with_jitter(jitter: FpsJitter) -> PlayerConfig {
        PlayerConfig {
            jitter,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_rejects_bad_jitter() {
        let bad = [
            FpsJitter {
                max_fps: f64::NAN,
                ..Default::default()
            },
            FpsJitter {
                max_fps: f64::INFINITY,
                ..Default::default()
            },
            FpsJitter {
                spread: f64::INFINITY,
                ..Default::default()
            },
            FpsJitter {
                spread: -1.0,
                ..Default::default()
            },
            FpsJitter {
                min_delay_ms: f64::NAN,
                ..Default::default()
            },
            FpsJitter {
                max_delay_ms: f64::INFINITY,
                ..Default::default()
            },
            FpsJitter {
                min_delay_ms: 9000.0,
                ..Default::default()
            },
        ];
        for jitter in bad {
            let err = with_jitter(jitter.clone()).validate();
            assert!(matches!(err, Err(ReelError::Config(_))), "{jitter:?}");
        }
    }

    #[test]
    fn test_validate_accepts_degenerate_jitter() {
        // Zero spread and equal delays are sampled without a range
        let config = with_jitter(FpsJitter {
            spread: 0.0,
            min_delay_ms: 5000.0,
            max_delay_ms: 5000.0,
            ..Default::default()
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{"base_fps": 24, "narrow": {"target_rows": null}}"#;
        let config: PlayerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.base_fps, 24.0);
        assert_eq!(config.narrow.target_rows, None);
        assert_eq!(config.breakpoint_px, 490.0);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml() {
        let config = PlayerConfig::from_toml_str(
            r#"
            base_fps = 15.0
            reduced_motion = true

            [narrow]
            target_rows = 20

            [jitter]
            spread = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(config.base_fps, 15.0);
        assert!(config.reduced_motion);
        assert_eq!(config.narrow.target_rows, Some(20));
        assert_eq!(config.jitter.spread, 1.0);
        assert_eq!(config.jitter.max_fps, 30.0);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml_rejects_bad_fps() {
        assert!(PlayerConfig::from_toml_str("base_fps = -1.0").is_err());
        assert!(PlayerConfig::from_toml_str("[jitter]\nmax_fps = nan").is_err());
        assert!(PlayerConfig::from_toml_str("[jitter]\nspread = inf").is_err());
    }
}
