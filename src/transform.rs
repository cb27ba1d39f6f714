//! Rotation and downsampling of ASCII frames for narrow viewports.

use std::cell::OnceCell;

use crate::{Frame, FrameSequence};

/// Default row budget for the rotated narrow-viewport frames.
pub const NARROW_TARGET_ROWS: usize = 35;

/// Stages applied when deriving the narrow frame set.
///
/// Rotation and blank trimming always run; downsampling only when
/// `target_rows` is set.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub target_rows: Option<usize>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            target_rows: Some(NARROW_TARGET_ROWS),
        }
    }
}

impl TransformConfig {
    /// Rotate and trim only.
    pub fn rotate_only() -> Self {
        Self { target_rows: None }
    }

    pub fn with_target_rows(target_rows: usize) -> Self {
        Self {
            target_rows: Some(target_rows),
        }
    }
}

/// Rotate a frame 90° clockwise.
///
/// Ragged lines are right-padded with spaces to the widest line first. Output
/// row `x` is input column `x` read from the bottom row up, so an `R`-row,
/// `W`-column frame becomes `W` rows of `R` chars.
///
/// ## Example
///
/// ```rust
/// use ascii_reel::{transform::rotate_clockwise, Frame};
///
/// let rotated = rotate_clockwise(&Frame::from_lines(["AB", "CD"]));
/// assert_eq!(rotated.lines(), ["CA", "DB"]);
/// ```
pub fn rotate_clockwise(frame: &Frame) -> Frame {
    let (width, height) = frame.dimensions();
    let grid: Vec<Vec<char>> = frame
        .lines()
        .iter()
        .map(|line| {
            let mut row: Vec<char> = line.chars().collect();
            row.resize(width, ' ');
            row
        })
        .collect();

    let rotated = (0..width)
        .map(|x| (0..height).rev().map(|y| grid[y][x]).collect::<String>())
        .collect();
    Frame::new(rotated)
}

#[inline]
fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Drop whitespace-only rows from both ends of a frame.
///
/// Interior blank rows are kept. A frame of only blank rows becomes empty.
pub fn trim_blank_rows(frame: Frame) -> Frame {
    let mut lines = frame.into_lines();
    let Some(start) = lines.iter().position(|l| !is_blank(l)) else {
        return Frame::default();
    };
    // `start` found a non-blank row, so `rposition` does too
    let end = lines.iter().rposition(|l| !is_blank(l)).unwrap_or(start);
    lines.truncate(end + 1);
    lines.drain(..start);
    Frame::new(lines)
}

/// Source-row indices picked when reducing `len` rows to `target`.
///
/// Indices approximate an even stride, include `0` and `len - 1`, and are
/// strictly increasing. Returns `0..len` when no reduction is needed.
pub fn downsample_indices(len: usize, target: usize) -> Vec<usize> {
    if len <= target {
        return (0..len).collect();
    }
    match target {
        0 => return Vec::new(),
        1 => return vec![len - 1],
        _ => {}
    }

    let step = (len - 1) as f64 / (target - 1) as f64;
    let mut indices = Vec::with_capacity(target);
    let mut prev: Option<usize> = None;
    for i in 0..target {
        let mut idx = (i as f64 * step).round() as usize;
        if let Some(p) = prev {
            if idx <= p {
                idx = p + 1;
            }
        }
        idx = idx.min(len - 1);
        indices.push(idx);
        prev = Some(idx);
    }

    // Endpoints are exact regardless of rounding
    indices[0] = 0;
    indices[target - 1] = len - 1;
    indices
}

/// Reduce a frame to `target` rows, keeping the first and last rows.
///
/// Frames with `target` rows or fewer are returned unchanged.
///
/// ## Example
///
/// ```rust
/// use ascii_reel::{transform::downsample_rows, Frame};
///
/// let frame = Frame::from_lines(["1", "2", "3", "4", "5"]);
/// assert_eq!(downsample_rows(frame, 3).lines(), ["1", "3", "5"]);
/// ```
pub fn downsample_rows(frame: Frame, target: usize) -> Frame {
    if frame.rows() <= target {
        return frame;
    }
    let indices = downsample_indices(frame.rows(), target);
    let lines = frame.lines();
    Frame::new(indices.into_iter().map(|i| lines[i].clone()).collect())
}

/// Rotate, trim, then optionally downsample a single frame.
pub fn transform_frame(frame: &Frame, config: &TransformConfig) -> Frame {
    let trimmed = trim_blank_rows(rotate_clockwise(frame));
    match config.target_rows {
        Some(target) => downsample_rows(trimmed, target),
        None => trimmed,
    }
}

/// Derive the narrow frame set from the primary one, frame by frame.
#[tracing::instrument(skip_all, fields(frames = frames.len(), target_rows = ?config.target_rows))]
pub fn transform_sequence(frames: &FrameSequence, config: &TransformConfig) -> FrameSequence {
    frames.map_frames(|frame| transform_frame(frame, config))
}

/// A derived frame set computed on first access and cached afterwards.
#[derive(Debug, Default)]
pub struct LazyTransform {
    config: TransformConfig,
    cached: OnceCell<FrameSequence>,
}

impl LazyTransform {
    pub fn new(config: TransformConfig) -> Self {
        Self {
            config,
            cached: OnceCell::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Whether the derived set has been built yet.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.cached.get().is_some()
    }

    /// Get the derived set, building it from `source` on the first call.
    ///
    /// `source` is assumed immutable; later calls ignore it.
    pub fn get_or_build(&self, source: &FrameSequence) -> &FrameSequence {
        self.cached
            .get_or_init(|| transform_sequence(source, &self.config))
    }

    /// The derived set, if already built.
    pub fn get(&self) -> Option<&FrameSequence> {
        self.cached.get()
    }
}
