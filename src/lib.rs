#![doc = include_str!("../README.md")]

pub(crate) mod error;
#[cfg(feature = "layer")]
pub(crate) mod layer;
pub(crate) mod runner;
pub(crate) mod sink;
pub(crate) mod spinner;
pub(crate) mod state;
pub mod style;
pub mod util;

#[cfg(test)]
mod test;

/// `tracing` target of every diagnostic this crate emits.
pub(crate) const TARGET: &str = "term_spinner";

/// Re-exports of all public types and traits.
pub mod prelude {
    pub use crate::error::{Error, Result};
    #[cfg(feature = "layer")]
    pub use crate::layer::{SpinnerLayer, spinner_layer};
    pub use crate::sink::{MemorySink, Platform, Sink};
    pub use crate::spinner::{Options, Spinner, SpinnerGuard};
    pub use crate::state::{Hook, SpinnerState};
    pub use crate::style::Style;
    pub use crate::util::{FrameSet, number_sequence, symbols};
}

pub use crate::prelude::*;
