pub mod error;
pub mod types;

pub use error::StreakError;
pub use types::{Extraction, LedgerReport, LedgerRow, Platform};
