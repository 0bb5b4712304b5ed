//! Process acquisition from a proc-style pseudo-filesystem.

use std::io;
use std::path::PathBuf;

use crate::error::ProbeError;
use crate::record::ProcessRecord;
use crate::source::{Probe, ProcessSource, detail, stat};

/// Process source backed by a `/proc`-style directory tree.
///
/// Per-pid failures never abort the snapshot: a pid whose files vanished is
/// omitted silently, any other per-pid fault is logged and omitted. Only the
/// root directory enumeration itself is fatal.
pub struct ProcDirectorySource {
    root: PathBuf,
}

impl ProcDirectorySource {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Source rooted at an arbitrary directory whose layout matches the real
    /// pseudo-filesystem. Tests point this at fake trees.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// List candidate pids: numeric directory entries under the root.
    ///
    /// Entries that do not parse are dropped, not errors: the listing races
    /// with process churn, and the root also carries non-process entries
    /// such as `self`.
    pub fn list_candidate_ids(&self) -> Result<Vec<u32>, ProbeError> {
        let entries = std::fs::read_dir(&self.root).map_err(ProbeError::Query)?;
        let mut pids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(ProbeError::Query)?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            // Cheap pre-filter before the numeric parse.
            if !name.as_bytes().first().is_some_and(u8::is_ascii_digit) {
                continue;
            }
            if let Ok(pid) = name.parse::<u32>() {
                pids.push(pid);
            }
        }
        Ok(pids)
    }

    /// Probe one candidate pid for a full record: stat line, argument
    /// vector, cgroup membership. Any of the three vanishing turns the whole
    /// pid into `Gone`.
    pub fn probe(&self, pid: u32) -> Probe<ProcessRecord> {
        let stat_path = self.root.join(pid.to_string()).join("stat");
        let line = match std::fs::read_to_string(&stat_path) {
            Ok(line) => line,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Probe::Gone,
            Err(err) => {
                return Probe::Faulted(ProbeError::Read {
                    path: stat_path,
                    source: err,
                });
            }
        };
        let fields = match stat::parse(&line) {
            Ok(fields) => fields,
            Err(err) => return Probe::Faulted(err),
        };
        let cmdline = match detail::load_cmdline(&self.root, pid) {
            Probe::Found(cmdline) => cmdline,
            Probe::Gone => return Probe::Gone,
            Probe::Faulted(err) => return Probe::Faulted(err),
        };
        let cgroup = match detail::load_cgroup(&self.root, pid) {
            Probe::Found(cgroup) => cgroup,
            Probe::Gone => return Probe::Gone,
            Probe::Faulted(err) => return Probe::Faulted(err),
        };
        Probe::Found(ProcessRecord {
            pid,
            ppid: fields.ppid,
            pgrp: fields.pgrp,
            session: fields.session,
            state: fields.state,
            name: fields.name,
            cmdline,
            utime: fields.utime,
            stime: fields.stime,
            starttime: fields.starttime,
            vsize: fields.vsize,
            rss: fields.rss,
            cgroup,
        })
    }
}

impl Default for ProcDirectorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSource for ProcDirectorySource {
    fn snapshot(&self) -> Result<Vec<ProcessRecord>, ProbeError> {
        let mut records = Vec::new();
        for pid in self.list_candidate_ids()? {
            match self.probe(pid) {
                Probe::Found(record) => records.push(record),
                // Exited between the listing and the read.
                Probe::Gone => {}
                Probe::Faulted(err) => {
                    tracing::warn!(pid, error = %err, "skipping unreadable process");
                }
            }
        }
        Ok(records)
    }

    fn find_by_id(&self, pid: u32) -> Result<Option<ProcessRecord>, ProbeError> {
        let dir = self.root.join(pid.to_string());
        match std::fs::metadata(&dir) {
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(ProbeError::Read {
                    path: dir,
                    source: err,
                });
            }
        }
        // The directory can still vanish between the existence check and the
        // reads; that is the same "no such process" answer.
        match self.probe(pid) {
            Probe::Found(record) => Ok(Some(record)),
            Probe::Gone => Ok(None),
            Probe::Faulted(err) => Err(err),
        }
    }
}
