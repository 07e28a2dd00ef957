//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend only on this crate, never on each other's internals.
//!
//! ## Time Model
//! - Canonical clock is milliseconds since the Unix epoch, UTC (`i64`)
//! - Source-specific representations are converted by the ingestion adapters

mod blueprint;
mod error;
mod record;
mod report;
mod sensor_id;
mod sink;

pub use blueprint::*;
pub use error::*;
pub use record::*;
pub use report::*;
pub use sensor_id::SensorId;
pub use sink::*;
