//! Configuration for the sync subsystem.
//!
//! All tunables are centralized here and loaded from a TOML file if present.
//! Any missing or invalid entries fall back to sensible defaults so the host
//! application can always start. These are embedded-subsystem constants, not
//! CLI flags.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, parse_config, serialize_config};
pub use models::{LogLevel, SyncConfig};
