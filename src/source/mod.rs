//! Platform process sources.
//!
//! Each platform implements [`ProcessSource`]; the crate-level wrappers pick
//! the native one at compile time so call sites never branch on the OS.

pub mod detail;
pub mod kinfo;
pub mod proc_dir;
pub mod stat;
#[cfg(target_os = "macos")]
mod sysctl;

pub use proc_dir::ProcDirectorySource;
#[cfg(target_os = "macos")]
pub use sysctl::KernelQuerySource;

use crate::error::ProbeError;
use crate::record::ProcessRecord;

/// Outcome of probing a single candidate pid.
///
/// `Gone` is the transient-absence case: the process was listed but exited
/// before its details could be read. It is never an error; the caller simply
/// omits the pid. `Faulted` carries everything else.
#[derive(Debug)]
pub enum Probe<T> {
    Found(T),
    Gone,
    Faulted(ProbeError),
}

/// A platform-specific acquirer of process table snapshots.
pub trait ProcessSource {
    /// Acquire a fresh point-in-time process table. Nothing is cached: each
    /// call re-reads the live table.
    fn snapshot(&self) -> Result<Vec<ProcessRecord>, ProbeError>;

    /// Look up a single process. A pid with no live process is `Ok(None)`,
    /// not an error.
    fn find_by_id(&self, pid: u32) -> Result<Option<ProcessRecord>, ProbeError>;
}

#[cfg(target_os = "macos")]
fn platform_source() -> impl ProcessSource {
    KernelQuerySource
}

#[cfg(not(target_os = "macos"))]
fn platform_source() -> impl ProcessSource {
    ProcDirectorySource::new()
}

/// Snapshot the process table using the platform's native source.
pub fn snapshot() -> Result<Vec<ProcessRecord>, ProbeError> {
    platform_source().snapshot()
}

/// Look up one process by pid using the platform's native source.
pub fn find_by_id(pid: u32) -> Result<Option<ProcessRecord>, ProbeError> {
    platform_source().find_by_id(pid)
}
