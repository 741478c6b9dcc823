//! Using the spinner from async code.
//!
//! The spinner animates on its own thread, so async tasks only send it
//! updates. Progress arrives over a tokio `mpsc` channel; the spinner
//! methods are cheap and never await.

use std::time::Duration;

use term_spinner::*;
use tokio::sync::mpsc;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<()> {
    let spinner = Spinner::new(Options::default().prefix_text("[0/4]"))?;
    spinner.start();

    let (tx, mut rx) = mpsc::channel::<String>(8);

    for (i, name) in ["serde", "tokio", "tracing", "indexmap"].into_iter().enumerate() {
        let tx = tx.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(400 * (i as u64 + 1))).await;
            let _ = tx.send(name.to_string()).await;
        });
    }
    drop(tx);

    let mut done = 0;
    while let Some(name) = rx.recv().await {
        done += 1;
        let mut state = spinner.lock();
        state.set_prefix_text(format!("[{done}/4]"));
        state.set_text(format!("downloaded {name}"));
    }

    spinner.succeed("all crates downloaded");
    Ok(())
}
