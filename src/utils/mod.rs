mod multi_progress;
mod progress_style;

pub use multi_progress::{stderr_multi_progress, MultiProgressNew};
pub use progress_style::ProgressStyleTemplate;
