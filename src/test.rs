use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::{FrameSet, MemorySink, Options, Platform, Spinner, SpinnerState, number_sequence};

/// Interprets the subset of terminal output a spinner produces.
pub struct VirtualTerm {
    pub lines: Vec<Vec<char>>,
    pub cursor_visible: bool,
    row: usize,
    col: usize,
}

impl VirtualTerm {
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
            cursor_visible: true,
            row: 0,
            col: 0,
        }
    }

    pub fn from_output(output: &str) -> Self {
        let mut term = Self::new();
        term.feed(output);
        term
    }

    /// Visible text, trailing blanks trimmed from each line.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn feed(&mut self, s: &str) {
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            match c {
                '\x1b' => {
                    if chars.next() != Some('[') {
                        continue;
                    }
                    let mut params = String::new();
                    let mut command = None;
                    for c in chars.by_ref() {
                        if c.is_ascii_alphabetic() {
                            command = Some(c);
                            break;
                        }
                        params.push(c);
                    }
                    match (params.as_str(), command) {
                        ("?25", Some('l')) => self.cursor_visible = false,
                        ("?25", Some('h')) => self.cursor_visible = true,
                        ("" | "0", Some('K')) => self.lines[self.row].truncate(self.col),
                        // styling
                        _ => {}
                    }
                }
                '\r' => self.col = 0,
                '\n' => {
                    self.row += 1;
                    self.col = 0;
                    if self.lines.len() <= self.row {
                        self.lines.push(Vec::new());
                    }
                }
                c => {
                    let line = &mut self.lines[self.row];
                    if self.col < line.len() {
                        line[self.col] = c;
                    } else {
                        line.resize(self.col, ' ');
                        line.push(c);
                    }
                    self.col += 1;
                }
            }
        }
    }
}

fn wait_for(sink: &MemorySink, pred: impl Fn(&str) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if pred(&sink.contents()) {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

fn options(sink: &MemorySink) -> Options {
    Options::default()
        .writer(sink.clone())
        .platform(Platform::ansi())
        .delay(Duration::from_millis(2))
}

fn running(sink: &MemorySink, options: Options) -> Spinner {
    let spinner = Spinner::new(options).unwrap();
    spinner.start();
    assert!(spinner.is_active());
    assert!(wait_for(sink, |out| out.contains('⠋')), "no frame rendered");
    spinner
}

#[test]
fn test_virtual_term() {
    let term = VirtualTerm::from_output("\x1b[?25l\rabc\r\x1b[K\rde\x1b[31mf\x1b[0m\n");
    assert_eq!(term.render(), "def\n");
    assert!(!term.cursor_visible);
}

#[test]
fn test_start_on_pipe_writes_nothing() {
    let sink = MemorySink::new();
    let spinner = Spinner::new(options(&sink)).unwrap();

    spinner.start();
    assert!(!spinner.is_active());
    thread::sleep(Duration::from_millis(10));
    spinner.stop();

    assert!(sink.bytes().is_empty());
}

#[test]
fn test_stop_erases_line_and_shows_cursor() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink).text("working"));

    spinner.stop();

    let out = sink.contents();
    assert!(!spinner.is_active());
    assert!(out.starts_with("\x1b[?25l"));
    assert!(out.ends_with("\x1b[?25h\r\x1b[K"));
    let term = VirtualTerm::from_output(&out);
    assert_eq!(term.render(), "");
    assert!(term.cursor_visible);
}

#[test]
fn test_stop_is_final_and_idempotent() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink));

    spinner.stop();
    let after_stop = sink.contents();
    thread::sleep(Duration::from_millis(20));
    spinner.stop();

    assert_eq!(sink.contents(), after_stop);
}

#[test]
fn test_cursor_sequences_are_optional() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink).hide_cursor(false));
    spinner.stop();
    assert!(!sink.contents().contains("\x1b[?25"));

    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink).platform(Platform::windows_terminal()));
    spinner.stop();
    assert!(!sink.contents().contains("\x1b[?25"));
}

#[test]
fn test_frames_compose_symbol_prefix_and_text() {
    let sink = MemorySink::interactive();
    let spinner = running(
        &sink,
        options(&sink)
            .symbol("»")
            .prefix_text("[1/3]")
            .text("fetching")
            .color(["reset"]),
    );
    spinner.stop();

    assert!(sink.contents().contains("\r» [1/3] ⠋ fetching"));
}

#[test]
fn test_start_twice_runs_one_worker() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink));
    spinner.start();
    spinner.clone().start();
    spinner.stop();

    assert_eq!(sink.contents().matches("\x1b[?25l").count(), 1);
    assert_eq!(sink.contents().matches("\x1b[?25h").count(), 1);
}

#[test]
fn test_restart_runs_again() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink));

    spinner.restart();
    assert!(spinner.is_active());
    spinner.stop();

    assert_eq!(sink.contents().matches("\x1b[?25l").count(), 2);
    assert_eq!(sink.contents().matches("\x1b[?25h").count(), 2);
}

#[test]
fn test_persist_while_running() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink).text("building"));

    spinner.stop_and_persist("✔", "done");

    let out = sink.contents();
    assert!(!spinner.is_active());
    assert_eq!(out.matches('\n').count(), 1);
    assert!(out.ends_with("\r✔ done\n"));
    assert_eq!(VirtualTerm::from_output(&out).render(), "✔ done\n");
}

#[test]
fn test_persist_while_idle() {
    let sink = MemorySink::interactive();
    let spinner = Spinner::new(options(&sink).symbol("»")).unwrap();

    spinner.stop_and_persist("✔", "done");
    spinner.stop_and_persist("✔", "done");

    assert_eq!(sink.contents(), "\r» ✔ done\n\r» ✔ done\n");
}

#[test]
fn test_persist_on_pipe_still_writes() {
    let sink = MemorySink::new();
    let spinner = Spinner::new(options(&sink)).unwrap();
    spinner.start();
    spinner.succeed("ok");
    assert_eq!(sink.contents(), "\r✔ ok\n");
}

#[test]
fn test_succeed_and_fail_symbols() {
    let sink = MemorySink::interactive();
    let spinner = Spinner::new(options(&sink)).unwrap();

    spinner.succeed("built");
    spinner.fail("tests failed");

    assert_eq!(sink.contents(), "\r✔ built\n\r✖ tests failed\n");
}

#[test]
fn test_invalid_color_keeps_decorator() {
    let sink = MemorySink::interactive();
    let spinner = Spinner::new(options(&sink).color(["fgHiMagenta"])).unwrap();
    let before = spinner.lock().style().paint("⠋");

    assert!(spinner.color(["bold", "sparkly"]).is_err());
    assert_eq!(spinner.lock().style().paint("⠋"), before);

    spinner.color(["green"]).unwrap();
    assert_eq!(spinner.lock().style().paint("⠋"), "\x1b[32m⠋\x1b[0m");
}

#[test]
fn test_invalid_color_rejected_at_construction() {
    let result = Spinner::new(Options::default().color(["teal"]));
    assert_eq!(
        result.map(|_| ()).unwrap_err(),
        crate::Error::InvalidStyle("teal".to_string())
    );
}

#[test]
fn test_color_applies_to_next_frames() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink).color(["reset"]));

    spinner.color(["red"]).unwrap();
    assert!(wait_for(&sink, |out| out.contains("\x1b[31m")));
    spinner.stop();
}

#[test]
fn test_empty_frame_set_is_refused() {
    let sink = MemorySink::interactive();
    let spinner = Spinner::new(options(&sink).char_set(FrameSet::default())).unwrap();

    spinner.start();

    assert!(!spinner.is_active());
    assert!(sink.bytes().is_empty());
}

#[test]
fn test_empty_frame_set_ignored_while_running() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink));

    spinner.update_char_set(FrameSet::default());
    assert_eq!(spinner.lock().frames(), &FrameSet::dots());
    spinner.stop();
}

#[test]
fn test_update_char_set_while_running() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink).color(["reset"]));

    spinner.update_char_set(FrameSet::new(["◆"]));
    assert!(wait_for(&sink, |out| out.contains("\r◆")));
    spinner.stop();
}

#[test]
fn test_reverse_while_running_and_idle() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink));

    spinner.reverse();
    spinner.stop();
    spinner.reverse();

    assert_eq!(spinner.lock().frames(), &FrameSet::dots());
}

#[test]
fn test_lock_updates_fields_together() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink).color(["reset"]));

    {
        let mut state = spinner.lock();
        state.set_prefix_text("[2/3]");
        state.set_frames(FrameSet::new(["+"]));
        state.set_text("linking");
    }

    assert!(wait_for(&sink, |out| out.contains("\r[2/3] + linking")));
    spinner.stop();
    assert!(!sink.contents().contains("[2/3] ⠋"));
}

#[test]
fn test_hooks_run_every_frame() {
    let sink = MemorySink::interactive();
    let pre = Arc::new(AtomicUsize::new(0));
    let post = Arc::new(AtomicUsize::new(0));
    let options = options(&sink)
        .pre_update({
            let pre = pre.clone();
            move |state: &mut SpinnerState| {
                let n = pre.fetch_add(1, Ordering::SeqCst);
                state.set_text(format!("tick {n}"));
            }
        })
        .post_update({
            let post = post.clone();
            move |_: &mut SpinnerState| {
                post.fetch_add(1, Ordering::SeqCst);
            }
        });
    let spinner = running(&sink, options);

    assert!(wait_for(&sink, |out| out.contains("tick 3")));
    spinner.stop();

    assert!(pre.load(Ordering::SeqCst) >= 4);
    assert_eq!(pre.load(Ordering::SeqCst), post.load(Ordering::SeqCst));
}

#[test]
fn test_legacy_console_erases_by_char_count() {
    let sink = MemorySink::interactive();
    let options = options(&sink)
        .platform(Platform::legacy_console())
        .char_set(FrameSet::new(["🌑"]))
        .color(["reset"])
        .text("é");
    let spinner = Spinner::new(options).unwrap();
    spinner.start();
    assert!(wait_for(&sink, |out| out.contains("🌑 é")));

    spinner.stop();

    let out = sink.contents();
    assert!(!out.contains("\x1b[K"));
    assert!(out.ends_with("\x1b[?25h\r   \r"), "{out:?}");
    assert_eq!(VirtualTerm::from_output(&out).render(), "");
}

#[test]
fn test_concurrent_setters_while_running() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink).delay(Duration::from_millis(1)));
    let delays: Vec<_> = (1..=5).map(Duration::from_millis).collect();

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let spinner = spinner.clone();
            let delays = delays.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    let n = worker + i;
                    spinner.update_speed(delays[n % delays.len()]);
                    spinner.update_char_set(FrameSet::from(number_sequence(n % 4 + 1)));
                    let color = if n % 2 == 0 { "cyan" } else { "bold" };
                    spinner.color([color]).unwrap();
                    if n % 7 == 0 {
                        spinner.reverse();
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert!(spinner.is_active());
    spinner.stop();

    let state = spinner.lock();
    assert!(!state.frames().is_empty());
    assert!(delays.contains(&state.delay()));
    assert!(!state.is_active());
}

#[test]
fn test_default_spinner_is_idle() {
    let spinner = Spinner::default();
    let state = spinner.lock();
    assert!(!state.is_active());
    assert_eq!(state.delay(), Duration::from_millis(100));
    assert_eq!(state.frames(), &FrameSet::dots());
    assert_eq!(state.style().paint("x"), "\x1b[37mx\x1b[0m");
}

#[test]
fn test_dropping_last_handle_stops_spinner() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink).text("working"));

    drop(spinner);

    let after_drop = sink.contents();
    assert!(after_drop.ends_with("\x1b[?25h\r\x1b[K"), "{after_drop:?}");
    thread::sleep(Duration::from_millis(20));
    assert_eq!(sink.contents(), after_drop);

    let term = VirtualTerm::from_output(&after_drop);
    assert_eq!(term.render(), "");
    assert!(term.cursor_visible);
}

#[test]
fn test_dropping_a_clone_keeps_spinner_running() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink));

    drop(spinner.clone());

    assert!(spinner.is_active());
    let before = sink.bytes().len();
    assert!(wait_for(&sink, |out| out.len() > before), "no frame after drop");
    spinner.stop();
}

#[test]
fn test_restarts_from_many_threads_leave_one_run() {
    let sink = MemorySink::interactive();
    let spinner = running(&sink, options(&sink).delay(Duration::from_millis(1)));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let spinner = spinner.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    spinner.restart();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    spinner.stop();

    let after_stop = sink.contents();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(sink.contents(), after_stop);
    assert_eq!(
        after_stop.matches("\x1b[?25l").count(),
        after_stop.matches("\x1b[?25h").count()
    );
    let term = VirtualTerm::from_output(&after_stop);
    assert_eq!(term.render(), "");
    assert!(term.cursor_visible);
}
