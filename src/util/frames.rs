/// An ordered sequence of glyphs cycled by the spinner.
///
/// ```rust,ignore
/// let frames = FrameSet::dots();            // ⠋ ⠙ ⠹ ...
/// let frames = FrameSet::new(["-", "=", "≡"]);
/// let frames = FrameSet::from(number_sequence(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameSet(Vec<String>);

impl FrameSet {
    /// Custom frames.
    pub fn new<I, S>(frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(frames.into_iter().map(Into::into).collect())
    }

    /// Braille dot spinner (the default).
    pub fn dots() -> Self {
        Self::new(["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }

    /// Classic line spinner.
    pub fn line() -> Self {
        Self::new(["|", "/", "-", "\\"])
    }

    /// Arrow spinner.
    pub fn arrow() -> Self {
        Self::new(["←", "↖", "↑", "↗", "→", "↘", "↓", "↙"])
    }

    /// Box-drawing corner spinner.
    pub fn pipe() -> Self {
        Self::new(["┤", "┘", "┴", "└", "├", "┌", "┬", "┐"])
    }

    /// A single dot bouncing down and up.
    pub fn bounce() -> Self {
        Self::new(["⠁", "⠂", "⠄", "⠂"])
    }

    /// Quarter-filled circle.
    pub fn circle() -> Self {
        Self::new(["◐", "◓", "◑", "◒"])
    }

    /// Moon phases.
    pub fn moon() -> Self {
        Self::new(["🌑", "🌒", "🌓", "🌔", "🌕", "🌖", "🌗", "🌘"])
    }

    /// Bar growing and shrinking left to right.
    pub fn grow_horizontal() -> Self {
        Self::new(["▏", "▎", "▍", "▌", "▋", "▊", "▉", "▊", "▋", "▌", "▍", "▎"])
    }

    /// Bar growing and shrinking bottom to top.
    pub fn grow_vertical() -> Self {
        Self::new(["▁", "▃", "▄", "▅", "▆", "▇", "▆", "▅", "▄", "▃"])
    }

    /// Clock faces, one per hour.
    pub fn clock() -> Self {
        Self::new([
            "🕐", "🕑", "🕒", "🕓", "🕔", "🕕", "🕖", "🕗", "🕘", "🕙", "🕚", "🕛",
        ])
    }

    /// Two-state toggle.
    pub fn toggle() -> Self {
        Self::new(["⊶", "⊷"])
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Glyph at `index`, wrapping past the end. `None` only for an empty set.
    pub fn get(&self, index: usize) -> Option<&str> {
        if self.0.is_empty() {
            return None;
        }
        Some(&self.0[index % self.0.len()])
    }

    /// Reverses the frame order in place.
    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    /// Frames in display order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for FrameSet {
    fn from(frames: Vec<String>) -> Self {
        Self(frames)
    }
}

impl From<&[&str]> for FrameSet {
    fn from(frames: &[&str]) -> Self {
        Self::new(frames.iter().copied())
    }
}

/// Generates `["0", "1", ..., "n-1"]`.
pub fn number_sequence(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}

/// Glyphs used by [`crate::Spinner::succeed`] and [`crate::Spinner::fail`].
pub mod symbols {
    pub const SUCCESS: &str = "✔";
    pub const FAILURE: &str = "✖";
}
