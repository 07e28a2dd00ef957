//! RecordSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for sinks.

use crate::{ContractError, Record, RunReport};

/// Data output trait
///
/// All sink implementations must implement this trait. A run writes exactly
/// once, so `write` receives the whole merged sequence.
pub trait RecordSink {
    /// Sink name (used for logging/errors)
    fn name(&self) -> &str;

    /// Write the merged, time-ordered records
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write(&mut self, records: &[Record], report: &RunReport) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    fn flush(&mut self) -> Result<(), ContractError>;
}
