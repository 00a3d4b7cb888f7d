use crate::utils::ProgressStyleTemplate;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use std::time::Duration;

pub trait MultiProgressNew {
    /// A message-only spinner ticking until it is finished.
    fn add_spinner(&self, message: &str) -> ProgressBar;
}

impl MultiProgressNew for MultiProgress {
    fn add_spinner(&self, message: &str) -> ProgressBar {
        let pb = self.add(ProgressBar::new_spinner());
        pb.set_style(ProgressStyleTemplate::only_message());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Spinners go to stderr so a report on stdout stays clean.
pub fn stderr_multi_progress(quiet: bool) -> MultiProgress {
    let target = if quiet {
        ProgressDrawTarget::hidden()
    } else {
        ProgressDrawTarget::stderr()
    };
    MultiProgress::with_draw_target(target)
}
