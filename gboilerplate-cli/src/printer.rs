use std::{
    io::{self, Write},
    sync::Mutex,
    time::Duration,
};

use colored::Colorize;
use gboilerplate_core::progress::{Phase, Progress, Reporter};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::debug;

const FRAMES: [&str; 9] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷", " "];
const TICK: Duration = Duration::from_millis(80);

/// Renders scaffold progress as a terminal spinner.
///
/// Step lines and diagnostics are written to `out` while the spinner is
/// suspended, so they still show up when the spinner itself is hidden
/// (stderr not a terminal).
pub struct Printer {
    spinner: ProgressBar,
    out: Mutex<Box<dyn Write + Send>>,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self::with_output(ProgressDrawTarget::stderr(), Box::new(io::stdout()))
    }

    pub fn with_output(target: ProgressDrawTarget, out: Box<dyn Write + Send>) -> Self {
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&FRAMES);

        let spinner = ProgressBar::with_draw_target(None, target);
        spinner.set_style(style);

        Self {
            spinner,
            out: Mutex::new(out),
        }
    }

    fn line(&self, text: String) {
        self.spinner.suspend(|| {
            let mut out = match self.out.lock() {
                Ok(out) => out,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
                debug!("Could not write progress line: {}", e);
            }
        });
    }
}

impl Reporter for Printer {
    fn transition(&self, progress: &Progress) {
        match progress.phase {
            Phase::Idle | Phase::CheckingTarget => {}
            Phase::Cloning => {
                self.spinner.enable_steady_tick(TICK);
                self.spinner.set_message(progress.message.clone());
            }
            Phase::Done => {
                self.spinner.finish_and_clear();
                self.line(progress.message.green().to_string());
            }
            Phase::Aborted => self.spinner.finish_and_clear(),
            _ => self.spinner.set_message(progress.message.clone()),
        }
    }

    fn completed(&self, _phase: Phase, message: &str) {
        self.line(message.green().to_string());
    }

    fn diagnostic(&self, text: &str) {
        self.line(format!("STDERR {}", text.yellow()));
    }
}
