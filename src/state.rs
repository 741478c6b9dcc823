use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::sync::mpsc::SyncSender;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::Result;
use crate::sink::{HIDE_CURSOR, Platform, SHOW_CURSOR, Sink};
use crate::style::Style;
use crate::util::FrameSet;

/// Callback run inside a tick, before or after the frame is written.
///
/// Hooks run while the spinner's lock is held and get direct access to the
/// state. Calling back into [`crate::Spinner`] from a hook deadlocks.
pub type Hook = Arc<dyn Fn(&mut SpinnerState) + Send + Sync>;

/// The mutable state shared by a [`crate::Spinner`] and its animation thread.
///
/// Only reachable through the spinner's lock: via [`crate::Spinner::lock`]
/// or as the argument of a [`Hook`].
pub struct SpinnerState {
    pub(crate) active: bool,
    /// Bumped by every start; a worker only draws for its own run.
    pub(crate) generation: u64,
    pub(crate) frames: FrameSet,
    pub(crate) delay: Duration,
    pub(crate) text: String,
    pub(crate) prefix_text: String,
    pub(crate) symbol: String,
    pub(crate) style: Style,
    pub(crate) last_rendered: String,
    pub(crate) hide_cursor: bool,
    pub(crate) sink: Box<dyn Sink>,
    pub(crate) platform: Platform,
    pub(crate) pre_update: Option<Hook>,
    pub(crate) post_update: Option<Hook>,
    pub(crate) stop_tx: Option<SyncSender<()>>,
    pub(crate) worker: Option<JoinHandle<()>>,
}

impl fmt::Debug for SpinnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinnerState")
            .field("active", &self.active)
            .field("frames", &self.frames)
            .field("delay", &self.delay)
            .field("text", &self.text)
            .field("prefix_text", &self.prefix_text)
            .field("symbol", &self.symbol)
            .field("style", &self.style)
            .field("last_rendered", &self.last_rendered)
            .field("hide_cursor", &self.hide_cursor)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl SpinnerState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn prefix_text(&self) -> &str {
        &self.prefix_text
    }

    pub fn set_prefix_text(&mut self, prefix: impl Into<String>) {
        self.prefix_text = prefix.into();
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        self.symbol = symbol.into();
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    /// Replaces the frame set. An empty set is ignored while animating.
    pub fn set_frames(&mut self, frames: FrameSet) {
        if frames.is_empty() && self.active {
            tracing::warn!(
                target: crate::TARGET,
                "ignoring empty frame set while the spinner is running"
            );
            return;
        }
        self.frames = frames;
    }

    pub fn reverse(&mut self) {
        self.frames.reverse();
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Parses style names and applies them. On error the current style is kept.
    pub fn set_color<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.style = Style::parse(names)?;
        Ok(())
    }

    /// The undecorated text of the frame currently on screen, or `""`.
    pub fn last_rendered(&self) -> &str {
        &self.last_rendered
    }

    pub(crate) fn write(&mut self, bytes: &str) {
        if let Err(error) = self
            .sink
            .write_all(bytes.as_bytes())
            .and_then(|()| self.sink.flush())
        {
            tracing::trace!(target: crate::TARGET, %error, "dropped spinner output");
        }
    }

    pub(crate) fn conceal_cursor(&mut self) {
        if self.hide_cursor && self.platform.cursor_control() {
            self.write(HIDE_CURSOR);
        }
    }

    pub(crate) fn reveal_cursor(&mut self) {
        if self.hide_cursor && self.platform.cursor_control() {
            self.write(SHOW_CURSOR);
        }
    }

    /// Blanks the current line and forgets what was on it.
    pub(crate) fn erase(&mut self) {
        let sequence = self.platform.erase_sequence(&self.last_rendered);
        self.write(&sequence);
        self.last_rendered.clear();
    }

    /// One animation tick: erase, compose, write, record.
    pub(crate) fn render_frame(&mut self, index: usize) {
        self.erase();

        if let Some(hook) = self.pre_update.clone() {
            hook(self);
        }

        let glyph = self.frames.get(index).unwrap_or_default().to_string();
        let styled = match self.sink.colorize() {
            true => self.style.paint(&glyph),
            false => glyph.clone(),
        };
        let frame = compose(&[&self.symbol, &self.prefix_text, &styled, &self.text]);
        let plain = compose(&[&self.symbol, &self.prefix_text, &glyph, &self.text]);

        self.write(&format!("\r{frame}"));
        tracing::trace!(
            target: crate::TARGET,
            index,
            frame = %plain,
            "rendered spinner frame"
        );
        self.last_rendered = plain;

        if let Some(hook) = self.post_update.clone() {
            hook(self);
        }
    }

    /// Writes the final status line left behind by a persist.
    pub(crate) fn persist(&mut self, final_symbol: &str, message: &str) {
        let line = compose(&[&self.symbol, final_symbol, message]);
        self.write(&format!("\r{line}\n"));
    }
}

/// Joins the non-empty parts with single spaces.
pub(crate) fn compose(parts: &[&str]) -> String {
    let mut out = String::new();
    for part in parts.iter().filter(|part| !part.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}
