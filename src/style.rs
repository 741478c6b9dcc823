//! Named terminal styles.
//!
//! Style names form a closed set. Unknown names are rejected with
//! [`Error::InvalidStyle`]; known names are folded left to right into a
//! single [`Style`]:
//!
//! ```rust,ignore
//! let style = Style::parse(["bold", "fgHiCyan", "bgBlack"])?;
//! print!("{}", style.paint("⠋"));
//! ```

use std::sync::LazyLock;

use indexmap::IndexMap;
use owo_colors::Style as Ansi;

use crate::error::{Error, Result};

type Apply = fn(Ansi) -> Ansi;

fn reset(_: Ansi) -> Ansi {
    Ansi::new()
}

const TABLE: &[(&str, Apply)] = &[
    // base colors
    ("black", Ansi::black),
    ("red", Ansi::red),
    ("green", Ansi::green),
    ("yellow", Ansi::yellow),
    ("blue", Ansi::blue),
    ("magenta", Ansi::magenta),
    ("cyan", Ansi::cyan),
    ("white", Ansi::white),
    // attributes
    ("reset", reset),
    ("bold", Ansi::bold),
    ("faint", Ansi::dimmed),
    ("italic", Ansi::italic),
    ("underline", Ansi::underline),
    ("blinkslow", Ansi::blink),
    ("blinkrapid", Ansi::blink_fast),
    ("reversevideo", Ansi::reversed),
    ("concealed", Ansi::hidden),
    ("crossedout", Ansi::strikethrough),
    // foreground
    ("fgBlack", Ansi::black),
    ("fgRed", Ansi::red),
    ("fgGreen", Ansi::green),
    ("fgYellow", Ansi::yellow),
    ("fgBlue", Ansi::blue),
    ("fgMagenta", Ansi::magenta),
    ("fgCyan", Ansi::cyan),
    ("fgWhite", Ansi::white),
    // foreground, high intensity
    ("fgHiBlack", Ansi::bright_black),
    ("fgHiRed", Ansi::bright_red),
    ("fgHiGreen", Ansi::bright_green),
    ("fgHiYellow", Ansi::bright_yellow),
    ("fgHiBlue", Ansi::bright_blue),
    ("fgHiMagenta", Ansi::bright_magenta),
    ("fgHiCyan", Ansi::bright_cyan),
    ("fgHiWhite", Ansi::bright_white),
    // background
    ("bgBlack", Ansi::on_black),
    ("bgRed", Ansi::on_red),
    ("bgGreen", Ansi::on_green),
    ("bgYellow", Ansi::on_yellow),
    ("bgBlue", Ansi::on_blue),
    ("bgMagenta", Ansi::on_magenta),
    ("bgCyan", Ansi::on_cyan),
    ("bgWhite", Ansi::on_white),
    // background, high intensity
    ("bgHiBlack", Ansi::on_bright_black),
    ("bgHiRed", Ansi::on_bright_red),
    ("bgHiGreen", Ansi::on_bright_green),
    ("bgHiYellow", Ansi::on_bright_yellow),
    ("bgHiBlue", Ansi::on_bright_blue),
    ("bgHiMagenta", Ansi::on_bright_magenta),
    ("bgHiCyan", Ansi::on_bright_cyan),
    ("bgHiWhite", Ansi::on_bright_white),
];

static STYLES: LazyLock<IndexMap<&'static str, Apply>> =
    LazyLock::new(|| TABLE.iter().copied().collect());

/// Returns every recognized style name, in declaration order.
pub fn names() -> impl ExactSizeIterator<Item = &'static str> {
    STYLES.keys().copied()
}

/// Returns `true` if `name` is a recognized style name.
pub fn is_valid(name: &str) -> bool {
    STYLES.contains_key(name)
}

/// A combined set of colors and text attributes.
#[derive(Clone, Copy)]
pub struct Style(Ansi);

/// White glyphs, the spinner default.
impl Default for Style {
    fn default() -> Self {
        Self(Ansi::new().white())
    }
}

impl std::fmt::Debug for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Style").field(&self.paint("Aa")).finish()
    }
}

impl Style {
    /// A style that leaves text untouched.
    pub fn plain() -> Self {
        Self(Ansi::new())
    }

    /// Validates and combines style names.
    ///
    /// Fails on the first unrecognized name; nothing is applied in that case.
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut style = Ansi::new();
        for name in names {
            let name = name.as_ref();
            let apply = STYLES
                .get(name)
                .ok_or_else(|| Error::InvalidStyle(name.to_string()))?;
            style = apply(style);
        }
        Ok(Self(style))
    }

    /// Wraps `text` in this style's escape sequences.
    pub fn paint(&self, text: &str) -> String {
        self.0.style(text).to_string()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn every_listed_name_parses() {
        assert_eq!(names().len(), 50);
        for name in names() {
            assert!(Style::parse([name]).is_ok(), "{name} should be accepted");
        }
    }

    #[rstest]
    #[case("purple")]
    #[case("Red")]
    #[case("fgbrightred")]
    #[case("")]
    fn unknown_names_are_rejected(#[case] name: &str) {
        assert_eq!(
            Style::parse(["bold", name]).unwrap_err(),
            Error::InvalidStyle(name.to_string())
        );
        assert!(!is_valid(name));
    }

    #[rstest]
    #[case(&["red"], "\x1b[31m")]
    #[case(&["fgHiGreen"], "\x1b[92m")]
    #[case(&["bgBlue"], "\x1b[44m")]
    #[case(&["bold"], "\x1b[1m")]
    fn paint_emits_sgr_codes(#[case] names: &[&str], #[case] code: &str) {
        let painted = Style::parse(names).unwrap().paint("x");
        assert!(painted.starts_with(code), "{painted:?}");
        assert!(painted.contains('x'));
        assert!(painted.ends_with("\x1b[0m"));
    }

    #[test]
    fn reset_discards_earlier_styles() {
        let style = Style::parse(["bold", "red", "reset"]).unwrap();
        assert_eq!(style.paint("x"), "x");
    }

    #[test]
    fn plain_style_leaves_text_untouched() {
        assert_eq!(Style::plain().paint("⠋"), "⠋");
        assert_eq!(Style::parse(Vec::<String>::new()).unwrap().paint("⠋"), "⠋");
    }
}
