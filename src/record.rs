use serde::Serialize;

/// One process as observed at snapshot time.
///
/// Records are plain values: built once per acquisition, never updated, and
/// carrying no link back to the snapshot they came from.
#[derive(Clone, Debug, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub ppid: u32,
    pub pgrp: u32,
    pub session: u32,
    /// Scheduler state character (`R`, `S`, `Z`, ...), or `?` where the
    /// platform does not report one.
    pub state: char,
    /// Executable short name, verbatim; may contain spaces.
    pub name: String,
    /// Ordered argument vector. NUL-split from the cmdline file on Linux;
    /// the BSD kernel record only carries the short name, so there it is a
    /// single element.
    pub cmdline: Vec<String>,
    /// User-mode CPU time in scheduler ticks.
    pub utime: u64,
    /// Kernel-mode CPU time in scheduler ticks.
    pub stime: u64,
    /// Start time in each platform's native unit: ticks since boot on Linux,
    /// seconds since the epoch on macOS.
    pub starttime: u64,
    /// Virtual memory size in bytes.
    pub vsize: u64,
    /// Resident set size, in pages on Linux. The BSD record does not carry
    /// it.
    pub rss: u64,
    /// cgroup membership text, verbatim including embedded newlines. Empty
    /// on platforms without cgroups.
    pub cgroup: String,
}

impl ProcessRecord {
    /// Space-joined display form of the argument vector.
    pub fn command_line(&self) -> String {
        self.cmdline.join(" ")
    }
}
