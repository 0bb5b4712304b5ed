//! Kernel process-table query for the BSD sysctl path.

use std::io;

use crate::error::ProbeError;
use crate::record::ProcessRecord;
use crate::source::{ProcessSource, kinfo};

const CTL_KERN: libc::c_int = 1;
const KERN_PROC: libc::c_int = 14;
const KERN_PROC_ALL: libc::c_int = 0;

/// Process source backed by the two-phase sysctl "all processes" query.
///
/// The fetched buffer is all-or-nothing: unlike the proc-directory path
/// there is no per-pid isolation, so any query or decode failure aborts the
/// whole snapshot.
pub struct KernelQuerySource;

impl ProcessSource for KernelQuerySource {
    fn snapshot(&self) -> Result<Vec<ProcessRecord>, ProbeError> {
        let buf = fetch_process_table_buffer()?;
        kinfo::decode_table(&buf)
    }

    fn find_by_id(&self, pid: u32) -> Result<Option<ProcessRecord>, ProbeError> {
        // The kernel query has no single-pid form here; lookup filters the
        // batch. Absence is a normal answer, not an error.
        let records = self.snapshot()?;
        Ok(records.into_iter().find(|record| record.pid == pid))
    }
}

/// Two-phase fetch: size probe with a null destination, then an exact-size
/// read.
///
/// If the table grew between the calls the kernel reports ENOMEM; that is
/// surfaced as [`ProbeError::TableGrew`] rather than decoding a truncated
/// buffer whose trailing record would be partial.
fn fetch_process_table_buffer() -> Result<Vec<u8>, ProbeError> {
    let mut mib = [CTL_KERN, KERN_PROC, KERN_PROC_ALL, 0];
    let mut size: libc::size_t = 0;

    let rc = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            mib.len() as libc::c_uint,
            std::ptr::null_mut(),
            &mut size,
            std::ptr::null_mut(),
            0,
        )
    };
    if rc != 0 {
        return Err(ProbeError::Query(io::Error::last_os_error()));
    }

    let probed = size;
    let mut buf = vec![0u8; probed];
    let rc = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            mib.len() as libc::c_uint,
            buf.as_mut_ptr().cast(),
            &mut size,
            std::ptr::null_mut(),
            0,
        )
    };
    if rc != 0 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ENOMEM) {
            return Err(ProbeError::TableGrew { probed });
        }
        return Err(ProbeError::Query(err));
    }

    // Processes may have exited since the probe; the kernel reports how much
    // of the buffer it actually filled.
    buf.truncate(size);
    Ok(buf)
}
