//! Core data structures for ASCII frames.

/// Metadata about a frame file on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameFile {
    /// Full path to the frame file
    pub path: String,
    /// Filename (e.g., "frame_0001.txt")
    pub name: String,
    /// Frame index for ordering (extracted from filename)
    pub index: u32,
}

impl FrameFile {
    /// Create a new FrameFile
    pub fn new(path: String, name: String, index: u32) -> Self {
        Self { path, name, index }
    }

    /// Extract frame index from a filename stem.
    ///
    /// Handles patterns like:
    /// - "frame_0001" -> 1
    /// - "0042" -> 42
    /// - "my_frame_3" -> 3
    pub fn extract_index(stem: &str, fallback: u32) -> u32 {
        if let Some(suffix) = stem.strip_prefix("frame_") {
            suffix.parse::<u32>().unwrap_or(fallback)
        } else {
            let num_str: String = stem.chars().filter(|c| c.is_ascii_digit()).collect();
            num_str.parse::<u32>().unwrap_or(fallback)
        }
    }
}

/// One still image of the animation: ordered text lines, row-major.
///
/// Lines are not required to share a length.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    /// Create a frame from its lines.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Build a frame from anything that yields string-like lines.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[inline]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the frame dimensions (columns, rows).
    ///
    /// Columns is the widest line measured in chars.
    pub fn dimensions(&self) -> (usize, usize) {
        let cols = self
            .lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        (cols, self.lines.len())
    }

    /// Text for display: lines joined with `\n`, no trailing newline.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Ordered, immutable, cyclic list of frames.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FrameSequence {
    frames: Vec<Frame>,
}

impl FrameSequence {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Get a frame with the index wrapped modulo the sequence length.
    ///
    /// Returns None only for an empty sequence.
    pub fn get_wrapped(&self, index: usize) -> Option<&Frame> {
        if self.frames.is_empty() {
            return None;
        }
        self.frames.get(index % self.frames.len())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Derive a new sequence by mapping every frame, preserving order and count.
    pub fn map_frames<F>(&self, f: F) -> FrameSequence
    where
        F: FnMut(&Frame) -> Frame,
    {
        FrameSequence {
            frames: self.frames.iter().map(f).collect(),
        }
    }
}

impl From<Vec<Frame>> for FrameSequence {
    fn from(frames: Vec<Frame>) -> Self {
        Self::new(frames)
    }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_index() {
        assert_eq!(FrameFile::extract_index("frame_0001", 0), 1);
        assert_eq!(FrameFile::extract_index("frame_42", 0), 42);
        assert_eq!(FrameFile::extract_index("0042", 0), 42);
        assert_eq!(FrameFile::extract_index("my_frame_3", 0), 3);
        assert_eq!(FrameFile::extract_index("no_digits", 99), 99);
        assert_eq!(FrameFile::extract_index("frame_x", 7), 7);
    }

    #[test]
    fn test_frame_dimensions() {
        let frame = Frame::from_lines(["ABC", "DEF", "GHI"]);
        assert_eq!(frame.dimensions(), (3, 3));

        let ragged = Frame::from_lines(["ABCD", "EF"]);
        assert_eq!(ragged.dimensions(), (4, 2));

        assert_eq!(Frame::default().dimensions(), (0, 0));
    }

    #[test]
    fn test_frame_to_text() {
        let frame = Frame::from_lines(["ab", "cd"]);
        assert_eq!(frame.to_text(), "ab\ncd");
        assert_eq!(Frame::default().to_text(), "");
    }

    #[test]
    fn test_sequence_wraps() {
        let seq = FrameSequence::new(vec![
            Frame::from_lines(["0"]),
            Frame::from_lines(["1"]),
            Frame::from_lines(["2"]),
        ]);
        assert_eq!(seq.get_wrapped(4).map(Frame::to_text).as_deref(), Some("1"));
        assert_eq!(seq.get(3), None);
        assert_eq!(FrameSequence::default().get_wrapped(0), None);
    }

    #[test]
    fn test_sequence_json_shape() {
        let seq: FrameSequence = serde_json::from_str(r#"[["ab","c"],["de"]]"#).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get(0).unwrap().lines(), ["ab", "c"]);
        assert_eq!(serde_json::to_string(&seq).unwrap(), r#"[["ab","c"],["de"]]"#);
    }
}
