//! `dayflags` - date-keyed holiday/workday flag store
//!
//! Two independent namespaces of `(date, state)` records behind a small
//! content-access surface, backed by `SQLite`.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Namespace, DayFlag, result rows)
//! - [`uri`] - `content://` addressing and target resolution
//! - [`storage`] - `SQLite` database layer
//! - [`notify`] - Change observers
//! - [`backup`] - Backup-dirty signalling
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling
//! - [`logging`] - tracing setup

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod notify;
pub mod storage;
pub mod uri;

pub use error::{DayFlagError, Result};
pub use model::{DayFlag, DayFlagValues, Namespace};
pub use storage::{Cursor, DayFlagStore, StoreOptions};
pub use uri::{ResourceUri, Target};
