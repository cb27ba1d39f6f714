//! Flatten a directory of per-frame text files into a frames JSON array.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{ReelError, ReelResult};
use crate::{Frame, FrameFile, FrameSequence};

/// Split a frame file into lines.
///
/// Splits on `\n` and drops only a final empty element, so a file ending
/// in a newline does not gain a blank last row.
///
/// ## Example
///
/// ```rust
/// let frame = ascii_reel::bundle::split_frame_text("ab\n\ncd\n");
/// assert_eq!(frame.lines(), ["ab", "", "cd"]);
/// ```
pub fn split_frame_text(content: &str) -> Frame {
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    Frame::new(lines)
}

/// List `.txt` frame files in `dir`, ordered by their frame index.
///
/// Files without digits in their name keep directory order after the
/// numbered ones.
pub fn collect_frame_files(dir: &Path) -> ReelResult<Vec<FrameFile>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let (Some(name), Some(stem)) = (
            path.file_name().and_then(|n| n.to_str()),
            path.file_stem().and_then(|s| s.to_str()),
        ) else {
            continue;
        };
        let index = FrameFile::extract_index(stem, u32::MAX);
        files.push(FrameFile::new(path.to_string_lossy().into_owned(), name.to_string(), index));
    }
    files.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(&b.name)));
    Ok(files)
}

/// Outcome of bundling a directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BundleReport {
    /// Frames read successfully
    pub processed: usize,
    /// Files that could not be read and were skipped
    pub errors: usize,
}

/// Frames read from a directory plus a summary of the run.
#[derive(Clone, Debug)]
pub struct Bundle {
    pub frames: FrameSequence,
    pub report: BundleReport,
}

impl Bundle {
    /// Compact JSON in the shape [`parse_frames_json`](crate::parse_frames_json) reads.
    pub fn to_json(&self) -> ReelResult<String> {
        Ok(serde_json::to_string(&self.frames)?)
    }

    pub fn write_json(&self, out: &Path) -> ReelResult<u64> {
        let json = self.to_json()?;
        fs::write(out, &json)?;
        Ok(json.len() as u64)
    }
}

/// Read every frame file in `dir` in index order.
///
/// Unreadable files are logged and counted rather than aborting the run.
/// A directory with no readable frames is an error.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn bundle_directory(dir: &Path) -> ReelResult<Bundle> {
    let files = collect_frame_files(dir)?;
    let total = files.len();

    let mut frames = Vec::with_capacity(total);
    let mut report = BundleReport::default();
    for file in &files {
        match fs::read_to_string(&file.path) {
            Ok(content) => {
                frames.push(split_frame_text(&content));
                report.processed += 1;
                if report.processed % 100 == 0 {
                    info!(processed = report.processed, total, "bundling frames");
                }
            }
            Err(err) => {
                warn!(file = %file.name, error = %err, "skipping unreadable frame");
                report.errors += 1;
            }
        }
    }

    if frames.is_empty() {
        return Err(ReelError::NoFrames);
    }
    info!(processed = report.processed, errors = report.errors, "bundle complete");
    Ok(Bundle {
        frames: FrameSequence::new(frames),
        report,
    })
}
