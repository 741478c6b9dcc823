//! Live updates while animating: frame sets, speed, colors, reversal,
//! a multi-field update through the lock, and a per-frame hook.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use term_spinner::*;

fn main() -> Result<()> {
    let frames_drawn = Arc::new(AtomicUsize::new(0));
    let counter = frames_drawn.clone();

    let spinner = Spinner::new(
        Options::default()
            .symbol("»")
            .text("presets")
            .writer(std::io::stderr())
            .post_update(move |_| {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
    )?;
    spinner.start();

    let presets = [
        ("dots", FrameSet::dots()),
        ("line", FrameSet::line()),
        ("arrow", FrameSet::arrow()),
        ("moon", FrameSet::moon()),
        ("clock", FrameSet::clock()),
        ("numbers", FrameSet::from(number_sequence(10))),
    ];
    for (name, frames) in presets {
        let mut state = spinner.lock();
        state.set_frames(frames);
        state.set_text(format!("preset: {name}"));
        drop(state);
        sleep(1200);
    }

    spinner.update_char_set(FrameSet::arrow());
    let palettes: [&[&str]; 3] = [&["red"], &["bold", "green"], &["fgHiMagenta", "bgBlack"]];
    for colors in palettes {
        spinner.color(colors)?;
        spinner.set_text(format!("color: {}", colors.join(" + ")));
        sleep(900);
    }

    if let Err(error) = spinner.color(["chartreuse"]) {
        spinner.set_text(format!("{error}, keeping the previous style"));
        sleep(1200);
    }

    spinner.set_text("reversed, faster");
    spinner.reverse();
    spinner.update_speed(Duration::from_millis(40));
    sleep(1500);

    spinner.succeed(&format!(
        "{} frames drawn",
        frames_drawn.load(Ordering::Relaxed)
    ));
    Ok(())
}

fn sleep(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}
