use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::{Mutex, PoisonError, Weak};
use std::time::Duration;

use crate::state::SpinnerState;

/// The animation loop run on a spinner's worker thread.
///
/// Each tick takes the lock, renders one frame and releases the lock before
/// waiting out the delay on the stop channel, so a stop signal wakes the
/// loop immediately instead of after a full frame interval.
///
/// The loop holds the state weakly and only draws while the state's
/// generation matches the one it was started with.
pub(crate) struct FrameLoop {
    state: Weak<Mutex<SpinnerState>>,
    stop: Receiver<()>,
    generation: u64,
    index: usize,
}

impl FrameLoop {
    pub(crate) fn new(
        state: Weak<Mutex<SpinnerState>>,
        stop: Receiver<()>,
        generation: u64,
    ) -> Self {
        Self {
            state,
            stop,
            generation,
            index: 0,
        }
    }

    /// Run until the spinner is stopped, restarted or dropped.
    pub(crate) fn run(mut self) {
        while let Some(delay) = self.tick() {
            match self.stop.recv_timeout(delay) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!(
            target: crate::TARGET,
            generation = self.generation,
            "spinner worker exited"
        );
    }

    /// Renders the next frame and returns the delay before the following one.
    /// Returns `None` once this run is over.
    fn tick(&mut self) -> Option<Duration> {
        match self.stop.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => return None,
            Err(TryRecvError::Empty) => {}
        }

        let state = self.state.upgrade()?;
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        // stop, or stop then start from another thread, may have run between
        // the signal check and the lock
        if !state.active || state.generation != self.generation {
            return None;
        }
        state.render_frame(self.index);
        self.index = (self.index + 1) % state.frames.len().max(1);
        Some(state.delay)
    }
}
