//! Driving the spinner from `tracing`.
//!
//! `spinner_layer` copies each event's message into the spinner text and,
//! with `with_span_prefix`, shows the current span's name in front of the glyph.

use std::time::Duration;

use term_spinner::*;
use tracing::{info, info_span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    let spinner = Spinner::new(Options::default().color(["fgHiYellow"]))?;

    tracing_subscriber::registry()
        .with(spinner_layer(spinner.clone()).with_span_prefix(true))
        .init();

    spinner.start();

    for span in [info_span!("fetch"), info_span!("compile"), info_span!("link")] {
        let stage = span.metadata().map(|meta| meta.name()).unwrap_or_default();
        span.in_scope(|| {
            for step in 1..=3 {
                info!("{stage}: step {step}/3");
                sleep(500);
            }
        });
    }

    spinner.succeed("pipeline finished");
    Ok(())
}

fn sleep(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}
