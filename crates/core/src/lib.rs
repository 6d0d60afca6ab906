#![warn(clippy::all, missing_docs)]

//! Core domain logic for shopledger.
//!
//! This crate hosts the ware/business models, the catalog and its
//! on-disk store, the action parser, configuration handling, and the
//! session type used by the terminal UI and any future frontends.

pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod store;

pub use catalog::Catalog;
pub use command::{Action, BusinessChoice};
pub use crate::config::AppConfig;
pub use error::{EntityKind, LedgerError, LedgerResult};
pub use models::{Business, Ware, WareSummary};
pub use session::{Outcome, Request, Session};
pub use store::CatalogStore;
