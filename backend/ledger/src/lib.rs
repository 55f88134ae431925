pub mod auth;
pub mod sheets;

pub use sheets::{SheetsLedger, HEADER_ROW};
