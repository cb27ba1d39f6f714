pub type ReelResult<T> = Result<T, ReelError>;

/// Text shown in place of the animation when loading fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load animation. Please refresh the page.";

#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame data error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("no frames found")]
    NoFrames,

    #[error("failed to load frames: {0}")]
    Load(String),

    #[error("web error: {0}")]
    Web(String),
}

impl ReelError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn web(msg: impl Into<String>) -> Self {
        Self::Web(msg.into())
    }
}
