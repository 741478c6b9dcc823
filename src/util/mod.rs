//! Frame-set helpers.
//!
//! # Presets
//!
//! [`FrameSet`] ships the common glyph cycles:
//!
//! ```rust,ignore
//! let s = FrameSet::dots();  // ⠋ ⠙ ⠹ ...
//! let s = FrameSet::line();  // | / - \
//! let s = FrameSet::arrow(); // ← ↖ ↑ ↗ → ↘ ↓ ↙
//!
//! // Custom frames:
//! let s = FrameSet::new(["🌑", "🌒", "🌓", "🌔", "🌕"]);
//! ```
//!
//! # Number sequences
//!
//! [`number_sequence`] builds a counting frame set:
//!
//! ```rust,ignore
//! let s = FrameSet::from(number_sequence(10)); // 0 1 2 ... 9
//! ```

mod frames;

pub use frames::*;
