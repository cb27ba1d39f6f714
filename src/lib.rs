//! # ascii-reel
//!
//! Looping ASCII-art animation with responsive orientation.
//!
//! This crate provides platform-agnostic logic for:
//! - Pacing a logical frame rate on top of a variable-rate tick source
//! - Deriving a rotated, trimmed and downsampled frame set for narrow viewports
//! - Switching between the two frame sets at a viewport breakpoint
//! - Loading frames JSON and bundling per-frame text files into it
//!
//! ## Features
//!
//! - `toml` - Load [`PlayerConfig`] from TOML
//! - `web` - Browser host built on `requestAnimationFrame` and `fetch`
//!
//! ## Example
//!
//! ```rust
//! use ascii_reel::{parse_frames_json, ManualTickSource, Player, PlayerConfig};
//!
//! let frames = parse_frames_json(r#"[["12345"], ["67890"]]"#)?;
//! let mut player = Player::new(frames, &PlayerConfig::default(), ManualTickSource::default());
//!
//! // A 320px viewport plays the rotated frames
//! let first = player.apply_breakpoint(320.0).unwrap();
//! assert_eq!(first.to_text(), "1\n2\n3\n4\n5");
//!
//! // Forward ticks from the host's timer; draw what comes back
//! player.on_tick(0.0);
//! let next = player.on_tick(100.0).unwrap();
//! assert_eq!(next.lines()[0], "6");
//! # Ok::<(), ascii_reel::ReelError>(())
//! ```

pub mod bundle;
mod config;
mod data;
mod error;
mod loader;
mod player;
pub mod rate;
mod scheduler;
pub mod transform;

#[cfg(feature = "web")]
pub mod web;

pub use config::{PlayerConfig, DEFAULT_BREAKPOINT_PX};
pub use data::{Frame, FrameFile, FrameSequence};
pub use error::{ReelError, ReelResult, LOAD_FAILED_MESSAGE};
pub use loader::{load_frames, parse_frames_json, parse_frames_slice, FileProvider, FrameDataProvider};
pub use player::{FrameCursor, Orientation, Player};
pub use rate::{FpsJitter, RatePresets};
pub use scheduler::{FrameScheduler, ManualTickSource, TickSource};
pub use transform::{LazyTransform, TransformConfig};

#[cfg(feature = "web")]
pub use web::{spawn, RafTickSource, TextSink};
