pub mod parse;

pub use parse::{parse, to_lrc};

/// A single timed lyric line
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    pub time_seconds: f64,
    pub text: String,
}

impl LyricLine {
    pub fn new(time_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            time_seconds,
            text: text.into(),
        }
    }
}

/// Lyric lines ordered ascending by timestamp
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricTrack {
    lines: Vec<LyricLine>,
}

impl LyricTrack {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a track from lines in any order. Equal timestamps keep their
    /// relative order.
    pub fn from_lines(mut lines: Vec<LyricLine>) -> Self {
        lines.sort_by(|a, b| a.time_seconds.total_cmp(&b.time_seconds));
        Self { lines }
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LyricLine> {
        self.lines.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LyricLine> {
        self.lines.iter()
    }

    /// Index of the last line whose timestamp is not after `position_seconds`.
    ///
    /// Returns `None` for an empty track, for positions before the first
    /// line and for NaN positions.
    pub fn active_index(&self, position_seconds: f64) -> Option<usize> {
        let passed = self
            .lines
            .partition_point(|line| line.time_seconds <= position_seconds);
        passed.checked_sub(1)
    }

    pub fn active_line(&self, position_seconds: f64) -> Option<&LyricLine> {
        self.active_index(position_seconds)
            .and_then(|idx| self.lines.get(idx))
    }
}

impl<'a> IntoIterator for &'a LyricTrack {
    type Item = &'a LyricLine;
    type IntoIter = std::slice::Iter<'a, LyricLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Free-function form of [`LyricTrack::active_index`]
pub fn active_index(track: &LyricTrack, position_seconds: f64) -> Option<usize> {
    track.active_index(position_seconds)
}
