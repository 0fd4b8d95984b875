//! daisy - Personal Task Planner Library
//!
//! This library provides the core functionality for the daisy CLI, a
//! client for the daisy planner backend.
//!
//! # Core Concepts
//!
//! - **Slot tags**: Tasks carry their calendar position in the title as
//!   machine-readable tags like `[2024-06-01][2PM]`
//! - **Views**: Daily, weekly, and monthly cursors over the slot space
//! - **Planners**: Named task collections, each with a view granularity
//! - **Session**: A bearer token stored on disk between invocations
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `tag`: The slot-tag codec (encode, decode, strip, match)
//! - `slot`: Day/week/month cursors and slot resolution
//! - `model`: Wire types shared with the backend
//! - `api`: Authenticated HTTP client for the planner backend
//! - `weather`: Best-effort OpenWeatherMap client
//! - `session`: Stored login token
//! - `prefs`: Persisted per-view display preferences
//! - `output`: Shared human/JSON output envelopes

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod prefs;
pub mod session;
pub mod slot;
pub mod tag;
pub mod weather;

pub use error::{Error, Result};
