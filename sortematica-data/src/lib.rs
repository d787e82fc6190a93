pub mod error;
pub mod extract;
pub mod loader;
pub mod models;
pub mod sniff;
pub mod table;

pub use error::DataError;
pub use models::{normalize_lottery, Lottery};
