#![forbid(unsafe_code)]

//! Core domain model and business logic for the muscu workout log.
//!
//! This crate provides:
//! - Domain types (strength and cardio sessions, difficulty)
//! - Category catalog management
//! - Session store, filtering and form defaults
//! - Validation of new entries
//! - Workbook import/export (xlsx)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod filter;
pub mod defaults;
pub mod appender;
pub mod workbook;
pub mod state;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError};
pub use types::*;
pub use catalog::{starter_catalog, Catalog, CatalogEntry};
pub use config::{Config, DefaultsConfig};
pub use store::SessionStore;
pub use filter::{filter, Selector};
pub use defaults::{CardioDefaults, StrengthDefaults};
pub use appender::{parse_entry_date, parse_entry_difficulty, CardioEntry, StrengthEntry};
pub use workbook::{export_file_name, Document};
pub use state::{Change, View, WorkoutState};
