//! # Guild Stats
//!
//! Territory Battle statistics for a guild, computed from dated snapshot
//! exports.
//!
//! ## Architecture
//!
//! - **models**: Snapshot documents, name/zone mappings and derived views
//! - **storage**: Snapshot discovery, signature cache and CSV export
//! - **calculate**: Stat tables, derived totals, mission status and history
//! - **pipeline**: Latest-snapshot dashboard assembly
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod storage;

pub use models::*;
