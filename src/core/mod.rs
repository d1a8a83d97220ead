pub mod error;
pub mod month;

pub use error::{AppError, Result};
pub use month::{is_valid_month, Month};
