use std::io::{IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};

pub(crate) const HIDE_CURSOR: &str = "\x1b[?25l";
pub(crate) const SHOW_CURSOR: &str = "\x1b[?25h";
pub(crate) const ERASE_LINE: &str = "\r\x1b[K";

/// Where spinner frames are written.
///
/// Implemented for [`std::io::Stdout`] and [`std::io::Stderr`]. Implement it
/// for any other writer to animate there; [`MemorySink`] captures output
/// in memory.
pub trait Sink: Write + Send {
    /// Whether the sink is an interactive terminal. Checked on every
    /// [`crate::Spinner::start`]; a non-interactive sink never animates.
    fn is_interactive(&self) -> bool;

    /// Whether glyphs may carry style escapes on this sink.
    fn colorize(&self) -> bool {
        true
    }
}

impl Sink for std::io::Stdout {
    fn is_interactive(&self) -> bool {
        self.is_terminal()
    }
}

impl Sink for std::io::Stderr {
    fn is_interactive(&self) -> bool {
        self.is_terminal()
    }

    // Legacy Windows consoles print raw escapes on stderr.
    fn colorize(&self) -> bool {
        !cfg!(windows)
    }
}

/// Terminal quirks of the host, resolved once per spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    windows: bool,
    windows_terminal: bool,
}

impl Platform {
    /// Inspects the OS and the `WT_SESSION` environment variable.
    pub fn detect() -> Self {
        let windows = cfg!(windows);
        let windows_terminal =
            windows && std::env::var_os("WT_SESSION").is_some_and(|session| !session.is_empty());
        Self {
            windows,
            windows_terminal,
        }
    }

    /// Any terminal that understands ANSI line erase and cursor control.
    pub const fn ansi() -> Self {
        Self {
            windows: false,
            windows_terminal: false,
        }
    }

    /// A Windows console outside Windows Terminal.
    pub const fn legacy_console() -> Self {
        Self {
            windows: true,
            windows_terminal: false,
        }
    }

    /// Windows Terminal on Windows.
    pub const fn windows_terminal() -> Self {
        Self {
            windows: true,
            windows_terminal: true,
        }
    }

    pub(crate) fn cursor_control(&self) -> bool {
        !self.windows_terminal
    }

    pub(crate) fn space_erase(&self) -> bool {
        self.windows && !self.windows_terminal
    }

    /// Bytes that blank a line currently showing `shown`.
    pub(crate) fn erase_sequence(&self, shown: &str) -> String {
        if self.space_erase() {
            let width = shown.chars().count();
            format!("\r{:width$}\r", "")
        } else {
            ERASE_LINE.to_string()
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::detect()
    }
}

/// An in-memory [`Sink`]. Clones share the same buffer.
///
/// ```rust,ignore
/// let sink = MemorySink::interactive();
/// let spinner = Spinner::new(Options::default().writer(sink.clone()))?;
/// spinner.succeed("done");
/// assert!(sink.contents().ends_with("✔ done\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
    interactive: bool,
}

impl MemorySink {
    /// A sink that reports itself as a pipe.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that reports itself as a terminal.
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            ..Self::default()
        }
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Discards everything written so far.
    pub fn clear(&self) {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Sink for MemorySink {
    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_erase_uses_line_clear() {
        assert_eq!(Platform::ansi().erase_sequence("⠋ working"), "\r\x1b[K");
        assert_eq!(Platform::windows_terminal().erase_sequence("abc"), "\r\x1b[K");
    }

    #[test]
    fn legacy_erase_counts_chars_not_bytes() {
        let shown = "⠋ héllo";
        assert_ne!(shown.len(), 7);
        assert_eq!(
            Platform::legacy_console().erase_sequence(shown),
            format!("\r{}\r", " ".repeat(7))
        );
        assert_eq!(Platform::legacy_console().erase_sequence(""), "\r\r");
    }

    #[test]
    fn cursor_control_is_skipped_in_windows_terminal() {
        assert!(Platform::ansi().cursor_control());
        assert!(Platform::legacy_console().cursor_control());
        assert!(!Platform::windows_terminal().cursor_control());
    }

    #[test]
    fn detect_matches_host() {
        let platform = Platform::detect();
        if !cfg!(windows) {
            assert_eq!(platform, Platform::ansi());
        }
    }

    #[test]
    fn memory_sink_clones_share_buffer() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        write!(writer, "abc").unwrap();
        assert_eq!(sink.contents(), "abc");
        assert!(!sink.is_interactive());
        assert!(MemorySink::interactive().is_interactive());
        sink.clear();
        assert!(sink.bytes().is_empty());
    }
}
