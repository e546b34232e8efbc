pub mod delay;
pub mod error;
pub mod format;
pub mod interactive;
pub mod output;
pub mod time_format;

pub use error::{AppError, AppResult};
pub use interactive::*;
pub use output::{print_success, print_warning, OutputStyle};
