//! Core data models for the guild dashboard.

mod history;
mod metrics;
mod names;
mod snapshot;
mod status;
mod summary;
mod table;
mod zones;

pub use history::*;
pub use metrics::*;
pub use names::*;
pub use snapshot::*;
pub use status::*;
pub use summary::*;
pub use table::*;
pub use zones::*;
