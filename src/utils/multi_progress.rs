use crate::utils::ProgressStyleTemplate;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use std::time::Duration;

pub trait MultiProgressNew {
    fn add_spinner(&self, prefix: &str, message: &str) -> ProgressBar;
}

impl MultiProgressNew for MultiProgress {
    fn add_spinner(&self, prefix: &str, message: &str) -> ProgressBar {
        let pb = self.add(ProgressBar::new_spinner());
        pb.set_style(ProgressStyleTemplate::spinner());
        pb.set_prefix(prefix.to_string());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Progress bars are hidden when stderr is not a terminal.
pub fn multi_progress(visible: bool) -> MultiProgress {
    if visible {
        MultiProgress::new()
    } else {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }
}

pub trait ProgressBarExt {
    fn show_count(&self, message: &str, done: usize, total: usize);
}

impl ProgressBarExt for ProgressBar {
    fn show_count(&self, message: &str, done: usize, total: usize) {
        if self.length() != Some(total as u64) {
            self.set_style(ProgressStyleTemplate::counter());
            self.set_length(total as u64);
        }
        self.set_message(message.to_string());
        self.set_position(done as u64);
    }
}
