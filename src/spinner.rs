use std::ops::{Deref, DerefMut};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::runner::FrameLoop;
use crate::sink::{Platform, Sink};
use crate::state::{Hook, SpinnerState};
use crate::style::Style;
use crate::util::{FrameSet, symbols};

/// Construction options for a [`Spinner`].
///
/// ```rust,ignore
/// let spinner = Spinner::new(
///     Options::default()
///         .text("fetching index")
///         .color(["bold", "fgHiCyan"])
///         .delay(Duration::from_millis(80))
///         .writer(std::io::stderr()),
/// )?;
/// ```
pub struct Options {
    color: Option<Vec<String>>,
    text: String,
    prefix_text: String,
    symbol: String,
    hide_cursor: bool,
    char_set: FrameSet,
    writer: Box<dyn Sink>,
    delay: Duration,
    platform: Option<Platform>,
    pre_update: Option<Hook>,
    post_update: Option<Hook>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            color: None,
            text: String::new(),
            prefix_text: String::new(),
            symbol: String::new(),
            hide_cursor: true,
            char_set: FrameSet::dots(),
            writer: Box::new(std::io::stdout()),
            delay: Duration::from_millis(100),
            platform: None,
            pre_update: None,
            post_update: None,
        }
    }
}

impl Options {
    /// Style names for the glyph. Validated by [`Spinner::new`].
    pub fn color<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.color = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Text shown after the glyph.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Text shown before the glyph, after the symbol.
    pub fn prefix_text(mut self, prefix: impl Into<String>) -> Self {
        self.prefix_text = prefix.into();
        self
    }

    /// Leading symbol, also repeated on persisted lines.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Whether to hide the terminal cursor while animating. Enabled by default.
    pub fn hide_cursor(mut self, yes: bool) -> Self {
        self.hide_cursor = yes;
        self
    }

    pub fn char_set(mut self, frames: FrameSet) -> Self {
        self.char_set = frames;
        self
    }

    /// Output sink. Defaults to stdout.
    pub fn writer(mut self, writer: impl Sink + 'static) -> Self {
        self.writer = Box::new(writer);
        self
    }

    /// Interval between frames. Defaults to 100 ms.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Overrides terminal quirk detection.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Runs before every frame is composed. See [`Hook`].
    pub fn pre_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut SpinnerState) + Send + Sync + 'static,
    {
        self.pre_update = Some(Arc::new(hook));
        self
    }

    /// Runs after every frame is written. See [`Hook`].
    pub fn post_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut SpinnerState) + Send + Sync + 'static,
    {
        self.post_update = Some(Arc::new(hook));
        self
    }

    pub(crate) fn into_state(mut self) -> Result<SpinnerState> {
        let style = match self.color.take() {
            Some(names) => Style::parse(names)?,
            None => Style::default(),
        };
        Ok(self.assemble(style))
    }

    fn assemble(self, style: Style) -> SpinnerState {
        SpinnerState {
            active: false,
            generation: 0,
            frames: self.char_set,
            delay: self.delay,
            text: self.text,
            prefix_text: self.prefix_text,
            symbol: self.symbol,
            style,
            last_rendered: String::new(),
            hide_cursor: self.hide_cursor,
            sink: self.writer,
            platform: self.platform.unwrap_or_else(Platform::detect),
            pre_update: self.pre_update,
            post_update: self.post_update,
            stop_tx: None,
            worker: None,
        }
    }
}

/// A terminal spinner animated by a background thread.
///
/// Cloning yields another handle to the same spinner. Dropping the last
/// handle stops it.
///
/// ```rust,ignore
/// let spinner = Spinner::new(Options::default().text("compiling"))?;
/// spinner.start();
/// // ... work ...
/// spinner.set_text("linking");
/// // ... work ...
/// spinner.succeed("built in 3.2s");
/// ```
#[derive(Clone)]
pub struct Spinner {
    shared: Arc<Shared>,
}

/// The state as owned by the user-facing handles.
///
/// The worker thread only holds the state weakly, so once every [`Spinner`]
/// is gone this is dropped and stops the animation.
struct Shared {
    state: Arc<Mutex<SpinnerState>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SpinnerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stop(&self) {
        let worker = {
            let mut state = self.lock();
            if !state.active {
                return;
            }
            state.active = false;
            state.reveal_cursor();
            state.erase();
            if let Some(stop_tx) = state.stop_tx.take() {
                let _ = stop_tx.try_send(());
            }
            state.worker.take()
        };

        // join outside the lock: the worker needs it to observe the stop
        if let Some(worker) = worker
            && worker.thread().id() != thread::current().id()
        {
            let _ = worker.join();
        }
        tracing::debug!(target: crate::TARGET, "spinner stopped");
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Spinner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.shared.state.try_lock() {
            Ok(state) => f.debug_tuple("Spinner").field(&*state).finish(),
            Err(_) => f.debug_tuple("Spinner").field(&"<locked>").finish(),
        }
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::from_state(Options::default().assemble(Style::default()))
    }
}

impl Spinner {
    /// Creates an idle spinner. Fails if `options` name an unknown style.
    pub fn new(options: Options) -> Result<Self> {
        options.into_state().map(Self::from_state)
    }

    fn from_state(state: SpinnerState) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Arc::new(Mutex::new(state)),
            }),
        }
    }

    /// Starts animating on a background thread.
    ///
    /// Does nothing if already running, if the sink is not an interactive
    /// terminal or if the frame set is empty.
    pub fn start(&self) {
        let mut state = self.lock();
        if state.active {
            return;
        }
        if !state.sink.is_interactive() {
            tracing::debug!(
                target: crate::TARGET,
                "sink is not a terminal, spinner stays idle"
            );
            return;
        }
        if state.frames.is_empty() {
            tracing::warn!(
                target: crate::TARGET,
                "refusing to start a spinner with no frames"
            );
            return;
        }

        state.conceal_cursor();
        state.active = true;
        state.generation = state.generation.wrapping_add(1);

        let (stop_tx, stop_rx) = mpsc::sync_channel(1);
        let frames = FrameLoop::new(
            Arc::downgrade(&self.shared.state),
            stop_rx,
            state.generation,
        );
        match thread::Builder::new()
            .name("spinner".into())
            .spawn(move || frames.run())
        {
            Ok(worker) => {
                state.stop_tx = Some(stop_tx);
                state.worker = Some(worker);
                tracing::debug!(
                    target: crate::TARGET,
                    delay = ?state.delay,
                    "spinner started"
                );
            }
            Err(error) => {
                state.active = false;
                state.reveal_cursor();
                tracing::warn!(
                    target: crate::TARGET,
                    %error,
                    "failed to spawn spinner thread"
                );
            }
        }
    }

    /// Stops animating, restores the cursor and erases the spinner line.
    ///
    /// Blocks until the worker thread has exited, so no frame is written
    /// after this returns. Does nothing when idle.
    pub fn stop(&self) {
        self.shared.stop();
    }

    /// Stops, then leaves a final `symbol final_symbol message` line.
    ///
    /// Always writes the line, even when the spinner was already idle.
    pub fn stop_and_persist(&self, final_symbol: &str, message: &str) {
        self.stop();
        self.lock().persist(final_symbol, message);
    }

    /// Stops and leaves a `✔ message` line.
    pub fn succeed(&self, message: &str) {
        self.stop_and_persist(symbols::SUCCESS, message);
    }

    /// Stops and leaves a `✖ message` line.
    pub fn fail(&self, message: &str) {
        self.stop_and_persist(symbols::FAILURE, message);
    }

    pub fn restart(&self) {
        self.stop();
        self.start();
    }

    /// Reverses the frame order. Takes effect on the next frame.
    pub fn reverse(&self) {
        self.lock().reverse();
    }

    pub fn update_speed(&self, delay: Duration) {
        self.lock().set_delay(delay);
    }

    /// Replaces the frame set. An empty set is ignored while running.
    pub fn update_char_set(&self, frames: FrameSet) {
        self.lock().set_frames(frames);
    }

    /// Replaces the glyph style. On error the current style is kept.
    pub fn color<I, S>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let style = Style::parse(names)?;
        self.lock().set_style(style);
        Ok(())
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.lock().set_text(text);
    }

    pub fn set_prefix_text(&self, prefix: impl Into<String>) {
        self.lock().set_prefix_text(prefix);
    }

    pub fn set_symbol(&self, symbol: impl Into<String>) {
        self.lock().set_symbol(symbol);
    }

    pub fn set_pre_update<F>(&self, hook: F)
    where
        F: Fn(&mut SpinnerState) + Send + Sync + 'static,
    {
        self.lock().pre_update = Some(Arc::new(hook));
    }

    pub fn set_post_update<F>(&self, hook: F)
    where
        F: Fn(&mut SpinnerState) + Send + Sync + 'static,
    {
        self.lock().post_update = Some(Arc::new(hook));
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    pub fn delay(&self) -> Duration {
        self.lock().delay
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    /// Acquires the spinner's lock for a multi-field atomic update.
    ///
    /// The animation thread is held off until the guard is dropped. Calling
    /// any other `Spinner` method on the same thread while holding the guard
    /// deadlocks.
    ///
    /// ```rust,ignore
    /// let mut state = spinner.lock();
    /// state.set_prefix_text("[2/3]");
    /// state.set_text("linking");
    /// state.set_frames(FrameSet::arrow());
    /// drop(state);
    /// ```
    pub fn lock(&self) -> SpinnerGuard<'_> {
        SpinnerGuard(self.shared.lock())
    }
}

/// Exclusive access to a [`Spinner`]'s state; released on drop.
pub struct SpinnerGuard<'a>(MutexGuard<'a, SpinnerState>);

impl Deref for SpinnerGuard<'_> {
    type Target = SpinnerState;

    fn deref(&self) -> &SpinnerState {
        &self.0
    }
}

impl DerefMut for SpinnerGuard<'_> {
    fn deref_mut(&mut self) -> &mut SpinnerState {
        &mut self.0
    }
}
