//! Terminal interaction: progress bars and prompts

mod progress;
mod prompt;

pub use progress::{ProgressBarReporter, UploadProgress};
pub use prompt::{confirm_production, CONFIRMATION_WORD};
