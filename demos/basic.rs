//! The smallest useful spinner: start, update the text, finish with a status line.
//!
//! Run in a terminal; when piped, only the final line is printed.

use std::time::Duration;

use term_spinner::*;

fn main() -> Result<()> {
    let spinner = Spinner::new(
        Options::default()
            .text("resolving dependencies")
            .color(["fgHiCyan"]),
    )?;

    spinner.start();
    sleep(1200);

    spinner.set_text("compiling");
    sleep(1500);

    spinner.stop_and_persist("•", "compiled 14 crates");

    spinner.restart();
    spinner.set_text("running tests");
    sleep(1000);

    spinner.fail("2 tests failed");
    Ok(())
}

fn sleep(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}
