//! Shared domain models.

mod business;
mod ware;

pub use business::{Business, WareSummary};
pub use ware::Ware;
