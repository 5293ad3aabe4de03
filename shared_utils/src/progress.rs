//! Progress Tracking Module
//!
//! One notification per completed task, in real time, safe to call from
//! concurrent workers. Tracks a monotonically increasing completed count and
//! the most recently finished filename; both are readable at any moment
//! without blocking producers. Rendering goes through an indicatif bar on
//! stderr; a hidden variant exists for tests and quiet output.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const BAR_TEMPLATE: &str =
    "{spinner:.green} {prefix:.cyan.bold} ▕{bar:35.green/black}▏ {percent:>3}% • {pos}/{len} • ⏱️ {elapsed_precise} • {msg}";
const PROGRESS_CHARS: &str = "█▓░";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

pub struct BatchProgress {
    bar: ProgressBar,
    completed: AtomicUsize,
    last_completed: Mutex<Option<String>>,
}

impl BatchProgress {
    pub fn new(total: u64) -> Arc<Self> {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .expect("Invalid template")
                .progress_chars(PROGRESS_CHARS)
                .tick_chars(SPINNER_CHARS),
        );
        bar.set_prefix("Converting");
        bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(20));
        Arc::new(Self {
            bar,
            completed: AtomicUsize::new(0),
            last_completed: Mutex::new(None),
        })
    }

    /// Progress tracker without terminal rendering.
    pub fn hidden(total: u64) -> Arc<Self> {
        let bar = ProgressBar::new(total);
        bar.set_draw_target(ProgressDrawTarget::hidden());
        Arc::new(Self {
            bar,
            completed: AtomicUsize::new(0),
            last_completed: Mutex::new(None),
        })
    }

    /// Record one finished task (success or failure alike).
    pub fn task_completed(&self, file_name: &str) {
        let done = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        {
            let mut last = self.last_completed.lock().unwrap_or_else(|e| e.into_inner());
            *last = Some(file_name.to_string());
        }
        self.bar.set_position(done as u64);
        self.bar.set_message(file_name.to_string());
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn last_completed(&self) -> Option<String> {
        self.last_completed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Complete!");
    }

    /// Print a line above the live bar without corrupting it.
    pub fn println(&self, msg: &str) {
        self.bar.suspend(|| eprintln!("{}", msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_starts_empty() {
        let progress = BatchProgress::hidden(5);
        assert_eq!(progress.completed(), 0);
        assert_eq!(progress.last_completed(), None);
    }

    #[test]
    fn test_task_completed_updates_count_and_last() {
        let progress = BatchProgress::hidden(3);
        progress.task_completed("a.heic");
        progress.task_completed("b.heic");

        assert_eq!(progress.completed(), 2);
        assert_eq!(progress.last_completed().as_deref(), Some("b.heic"));
    }

    #[test]
    fn test_concurrent_updates_lose_nothing() {
        let progress = BatchProgress::hidden(64);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let progress = Arc::clone(&progress);
                thread::spawn(move || {
                    for i in 0..8 {
                        progress.task_completed(&format!("file_{}_{}.heic", t, i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(progress.completed(), 64);
        assert!(progress.last_completed().is_some());
    }
}
