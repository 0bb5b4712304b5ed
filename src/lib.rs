//! Point-in-time process table snapshots with one cross-platform record
//! model.
//!
//! Acquisition is platform-native: a two-phase sysctl query decoding packed
//! kernel records on macOS, and `/proc` text parsing on Linux. Every call to
//! [`snapshot`] re-reads the live table; nothing is cached between calls, so
//! each result is a genuine point-in-time view. Processes that exit while
//! the table is being read are simply absent from the result, never present
//! as partial records.

pub mod error;
pub mod record;
pub mod source;

pub use error::ProbeError;
pub use record::ProcessRecord;
pub use source::{ProcessSource, find_by_id, snapshot};
