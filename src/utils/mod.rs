mod multi_progress;
mod progress_style;

pub use multi_progress::{multi_progress, MultiProgressNew, ProgressBarExt};
pub use progress_style::ProgressStyleTemplate;
