//! Frame-rate mutators: click-to-cycle presets and random jitter.

use rand::Rng;

/// Preset rates cycled by a user-facing control.
pub const DEFAULT_FPS_PRESETS: [f64; 6] = [5.0, 10.0, 15.0, 20.0, 24.0, 30.0];

/// Cycles through a fixed list of frame-rate presets.
#[derive(Clone, Debug, PartialEq)]
pub struct RatePresets {
    presets: Vec<f64>,
    index: usize,
}

impl RatePresets {
    /// Start at the preset equal to `current`, or at the first preset.
    ///
    /// An empty list falls back to [`DEFAULT_FPS_PRESETS`].
    pub fn new(presets: Vec<f64>, current: f64) -> Self {
        let presets = if presets.is_empty() {
            DEFAULT_FPS_PRESETS.to_vec()
        } else {
            presets
        };
        let index = presets.iter().position(|&p| p == current).unwrap_or(0);
        Self { presets, index }
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.presets[self.index]
    }

    /// Advance to the next preset, wrapping, and return it.
    pub fn next(&mut self) -> f64 {
        self.index = (self.index + 1) % self.presets.len();
        self.current()
    }
}

impl Default for RatePresets {
    fn default() -> Self {
        Self::new(DEFAULT_FPS_PRESETS.to_vec(), 10.0)
    }
}

/// Periodic random nudges to the base frame rate.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FpsJitter {
    pub min_fps: f64,
    pub max_fps: f64,
    /// Maximum deviation either way, in frames per second
    pub spread: f64,
    pub min_delay_ms: f64,
    pub max_delay_ms: f64,
}

impl Default for FpsJitter {
    fn default() -> Self {
        Self {
            min_fps: 5.0,
            max_fps: 30.0,
            spread: 2.0,
            min_delay_ms: 4000.0,
            max_delay_ms: 8000.0,
        }
    }
}

impl FpsJitter {
    /// Milliseconds until the next jitter, uniform in `[min_delay_ms, max_delay_ms)`.
    pub fn next_delay_ms<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.max_delay_ms <= self.min_delay_ms {
            return self.min_delay_ms;
        }
        rng.gen_range(self.min_delay_ms..self.max_delay_ms)
    }

    /// Nudge `base` by up to `spread` either way, clamped to the fps bounds.
    pub fn jitter<R: Rng>(&self, base: f64, rng: &mut R) -> f64 {
        let offset = if self.spread > 0.0 {
            rng.gen_range(-self.spread..self.spread)
        } else {
            0.0
        };
        (base + offset).clamp(self.min_fps, self.max_fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_presets_cycle() {
        let mut presets = RatePresets::default();
        assert_eq!(presets.current(), 10.0);
        assert_eq!(presets.next(), 15.0);
        assert_eq!(presets.next(), 20.0);
        assert_eq!(presets.next(), 24.0);
        assert_eq!(presets.next(), 30.0);
        assert_eq!(presets.next(), 5.0);
        assert_eq!(presets.next(), 10.0);
    }

    #[test]
    fn test_presets_unknown_start() {
        let mut presets = RatePresets::new(vec![5.0, 10.0], 12.5);
        assert_eq!(presets.current(), 5.0);
        assert_eq!(presets.next(), 10.0);
    }

    #[test]
    fn test_presets_empty_falls_back() {
        let presets = RatePresets::new(Vec::new(), 24.0);
        assert_eq!(presets.current(), 24.0);
    }

    #[test]
    fn test_jitter_bounds() {
        let jitter = FpsJitter::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut fps = 10.0;
        for _ in 0..1000 {
            let next = jitter.jitter(fps, &mut rng);
            assert!((5.0..=30.0).contains(&next));
            assert!((next - fps).abs() <= 2.0);
            fps = next;
        }
    }

    #[test]
    fn test_jitter_clamps_at_edges() {
        let jitter = FpsJitter::default();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(jitter.jitter(5.0, &mut rng) >= 5.0);
            assert!(jitter.jitter(30.0, &mut rng) <= 30.0);
        }
    }

    #[test]
    fn test_next_delay_range() {
        let jitter = FpsJitter::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let delay = jitter.next_delay_ms(&mut rng);
            assert!((4000.0..8000.0).contains(&delay));
        }
    }

    #[test]
    fn test_zero_spread_is_identity() {
        let jitter = FpsJitter {
            spread: 0.0,
            ..FpsJitter::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(jitter.jitter(12.0, &mut rng), 12.0);
    }
}
