//! Responsive playback: one lane per orientation, one lane running at a time.

use tracing::debug;

use crate::config::PlayerConfig;
use crate::scheduler::{FrameScheduler, TickSource};
use crate::transform::LazyTransform;
use crate::{Frame, FrameSequence};

/// Which frame set is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Primary frames, as loaded
    Wide,
    /// Rotated, trimmed and downsampled frames
    Narrow,
}

impl Orientation {
    /// Narrow at or below `breakpoint_px`, matching a `max-width` media query.
    pub fn for_width(width_px: f64, breakpoint_px: f64) -> Self {
        if width_px <= breakpoint_px {
            Orientation::Narrow
        } else {
            Orientation::Wide
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Orientation::Wide => Orientation::Narrow,
            Orientation::Narrow => Orientation::Wide,
        }
    }
}

/// Cyclic position within a frame sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameCursor {
    index: usize,
}

impl FrameCursor {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Step to the next frame, wrapping at `len`. No-op for an empty sequence.
    pub fn advance(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = (self.index + 1) % len;
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

struct Lane<S: TickSource> {
    scheduler: FrameScheduler<S>,
    cursor: FrameCursor,
}

/// Plays the primary frames on wide viewports and a derived rotated set on
/// narrow ones.
///
/// The player owns no timer. The host forwards ticks to [`Player::on_tick`]
/// and writes whatever frame it returns to the display.
///
/// ## Example
///
/// ```rust
/// use ascii_reel::{Frame, FrameSequence, ManualTickSource, Orientation, Player, PlayerConfig};
///
/// let frames = FrameSequence::new(vec![
///     Frame::from_lines(["ab"]),
///     Frame::from_lines(["cd"]),
/// ]);
/// let mut player = Player::new(frames, &PlayerConfig::default(), ManualTickSource::default());
///
/// let first = player.apply_breakpoint(1024.0).unwrap();
/// assert_eq!(first.to_text(), "ab");
///
/// player.on_tick(0.0);
/// let next = player.on_tick(100.0).unwrap();
/// assert_eq!(next.to_text(), "cd");
/// assert_eq!(player.active(), Some(Orientation::Wide));
/// ```
pub struct Player<S: TickSource> {
    frames: FrameSequence,
    narrow_frames: LazyTransform,
    wide: Lane<S>,
    narrow: Lane<S>,
    active: Option<Orientation>,
    base_fps: f64,
    breakpoint_px: f64,
    reduced_motion: bool,
}

impl<S: TickSource + Clone> Player<S> {
    /// Create a player whose lanes share copies of one tick source.
    pub fn new(frames: FrameSequence, config: &PlayerConfig, source: S) -> Self {
        Self::with_sources(frames, config, source.clone(), source)
    }
}

impl<S: TickSource> Player<S> {
    pub fn with_sources(frames: FrameSequence, config: &PlayerConfig, wide_source: S, narrow_source: S) -> Self {
        let lane = |source| Lane {
            scheduler: FrameScheduler::new(source, config.base_fps),
            cursor: FrameCursor::default(),
        };
        Self {
            frames,
            narrow_frames: LazyTransform::new(config.narrow.clone()),
            wide: lane(wide_source),
            narrow: lane(narrow_source),
            active: None,
            base_fps: config.base_fps,
            breakpoint_px: config.breakpoint_px,
            reduced_motion: config.reduced_motion,
        }
    }

    /// The orientation most recently shown, if any.
    #[inline]
    pub fn active(&self) -> Option<Orientation> {
        self.active
    }

    #[inline]
    pub fn base_fps(&self) -> f64 {
        self.base_fps
    }

    /// Whether the narrow frames have been derived yet.
    #[inline]
    pub fn narrow_ready(&self) -> bool {
        self.narrow_frames.is_ready()
    }

    /// Frames for `orientation`, deriving the narrow set on first use.
    pub fn frames(&self, orientation: Orientation) -> &FrameSequence {
        match orientation {
            Orientation::Wide => &self.frames,
            Orientation::Narrow => self.narrow_frames.get_or_build(&self.frames),
        }
    }

    pub fn scheduler(&self, orientation: Orientation) -> &FrameScheduler<S> {
        &self.lane(orientation).scheduler
    }

    /// Current frame index of the given lane.
    pub fn position(&self, orientation: Orientation) -> usize {
        self.lane(orientation).cursor.index()
    }

    fn lane(&self, orientation: Orientation) -> &Lane<S> {
        match orientation {
            Orientation::Wide => &self.wide,
            Orientation::Narrow => &self.narrow,
        }
    }

    fn lane_mut(&mut self, orientation: Orientation) -> &mut Lane<S> {
        match orientation {
            Orientation::Wide => &mut self.wide,
            Orientation::Narrow => &mut self.narrow,
        }
    }

    /// Show the lane that fits a viewport `width_px` wide.
    pub fn apply_breakpoint(&mut self, width_px: f64) -> Option<&Frame> {
        self.show(Orientation::for_width(width_px, self.breakpoint_px))
    }

    /// Switch playback to `orientation`.
    ///
    /// Pauses the other lane before starting this one, restarts from frame 0
    /// and returns that frame for the display. Does nothing under reduced
    /// motion.
    pub fn show(&mut self, orientation: Orientation) -> Option<&Frame> {
        if self.reduced_motion {
            return None;
        }
        // Derive before switching so the first tick already has frames
        self.frames(orientation);

        self.lane_mut(orientation.other()).scheduler.pause();

        let fps = self.base_fps;
        let lane = self.lane_mut(orientation);
        lane.cursor.reset();
        lane.scheduler.configure(fps);
        lane.scheduler.start();
        self.active = Some(orientation);
        debug!(?orientation, fps, "lane shown");

        self.frames(orientation).get(0)
    }

    /// Forward a tick to the active lane.
    ///
    /// Returns the frame to display when at least one logical frame elapsed.
    pub fn on_tick(&mut self, time: f64) -> Option<&Frame> {
        let orientation = self.active?;
        let len = self.frames(orientation).len();

        let Lane { scheduler, cursor } = self.lane_mut(orientation);
        let fired = scheduler.on_tick(time, || cursor.advance(len));
        if fired == 0 {
            return None;
        }

        let index = self.position(orientation);
        self.frames(orientation).get(index)
    }

    /// Change the base rate for both lanes without touching their phase.
    pub fn set_fps(&mut self, fps: f64) {
        self.base_fps = fps;
        self.wide.scheduler.configure(fps);
        self.narrow.scheduler.configure(fps);
    }

    /// Stop both lanes.
    pub fn pause_all(&mut self) {
        self.wide.scheduler.pause();
        self.narrow.scheduler.pause();
    }
}
