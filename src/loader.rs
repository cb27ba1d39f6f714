//! Frame data loading.
//!
//! Frame data is a JSON array of frames, each an array of lines:
//! `[["line", "line"], ["line", "line"]]`. Nothing beyond that shape is
//! validated.

use crate::error::{ReelError, ReelResult};
use crate::FrameSequence;

/// Decode a frames JSON document.
///
/// ## Example
///
/// ```rust
/// let frames = ascii_reel::parse_frames_json(r#"[["ab", "cd"], ["ef"]]"#).unwrap();
/// assert_eq!(frames.len(), 2);
/// assert_eq!(frames.get(1).unwrap().to_text(), "ef");
/// ```
pub fn parse_frames_json(json: &str) -> ReelResult<FrameSequence> {
    let frames: FrameSequence = serde_json::from_str(json)?;
    if frames.is_empty() {
        return Err(ReelError::NoFrames);
    }
    Ok(frames)
}

/// Decode a frames JSON document from raw bytes.
pub fn parse_frames_slice(bytes: &[u8]) -> ReelResult<FrameSequence> {
    let frames: FrameSequence = serde_json::from_slice(bytes)?;
    if frames.is_empty() {
        return Err(ReelError::NoFrames);
    }
    Ok(frames)
}

/// Trait for async frame data providers.
///
/// Implement this trait to fetch frames through your I/O mechanism
/// (browser fetch, filesystem, embedded bytes, etc.).
///
/// No `Send` bounds, so it works in single-threaded WASM contexts.
pub trait FrameDataProvider {
    /// Fetch and decode the frame sequence at `url`.
    fn fetch_frames(&self, url: &str) -> impl std::future::Future<Output = ReelResult<FrameSequence>>;
}

/// Provider that reads frames JSON from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileProvider;

impl FrameDataProvider for FileProvider {
    async fn fetch_frames(&self, url: &str) -> ReelResult<FrameSequence> {
        let bytes = std::fs::read(url)?;
        parse_frames_slice(&bytes)
    }
}

/// Load the frame sequence through `provider`, logging failures.
///
/// Hosts show [`LOAD_FAILED_MESSAGE`](crate::LOAD_FAILED_MESSAGE) when this
/// returns an error.
pub async fn load_frames<P: FrameDataProvider>(provider: &P, url: &str) -> ReelResult<FrameSequence> {
    match provider.fetch_frames(url).await {
        Ok(frames) => {
            tracing::debug!(url, frames = frames.len(), "frames loaded");
            Ok(frames)
        }
        Err(err) => {
            tracing::error!(url, error = %err, "frame loading failed");
            Err(err)
        }
    }
}
