//! Error taxonomy for process table acquisition.

use std::path::PathBuf;

/// Errors surfaced by process table acquisition.
///
/// A process that vanished between discovery and read is not an error; that
/// outcome is [`Probe::Gone`](crate::source::Probe).
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The kernel query or the directory enumeration itself failed.
    #[error("process table query failed: {0}")]
    Query(std::io::Error),

    /// The process table grew between the size probe and the fetch. A
    /// truncated buffer would leave a partial trailing record, so this is
    /// surfaced instead of decoding what fit.
    #[error("process table grew past the probed size of {probed} bytes")]
    TableGrew { probed: usize },

    /// The fetched buffer cannot be a whole number of kernel records.
    #[error(
        "process table buffer of {len} bytes is not a multiple of the {record_len}-byte record size"
    )]
    MalformedTable { len: usize, record_len: usize },

    /// A stat line that does not match the documented schema.
    #[error("malformed stat record: {0}")]
    MalformedStat(String),

    /// An unexpected per-process read failure, distinct from "process gone".
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
