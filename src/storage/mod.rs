//! `SQLite` storage layer for `dayflags`.
//!
//! This module provides the persistence layer using `SQLite` with:
//! - WAL mode so pooled reader connections run alongside the writer
//! - Conflict-ignore inserts keyed on the unique `date` column
//! - Change notification and backup signalling after each insert
//!
//! # Submodules
//!
//! - [`cursor`] - Query result rows
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main `SQLite` storage implementation

pub mod cursor;
pub mod schema;
pub mod sqlite;

pub use cursor::Cursor;
pub use sqlite::{DayFlagStore, StoreOptions};
