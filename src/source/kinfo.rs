//! Decoder for the kernel's packed process-control records.
//!
//! The sysctl process table is a packed array of fixed 648-byte records.
//! Rather than overlaying a `#[repr(C)]` struct, the layout is an explicit
//! offset table: padding regions stay visible as gaps, endianness is spelled
//! out, and the decoder compiles and tests on every platform.

use crate::error::ProbeError;
use crate::record::ProcessRecord;

/// Byte length of one kernel record.
pub const RECORD_LEN: usize = 648;

/// One field of the record layout: byte offset and length within a record.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub offset: usize,
    pub len: usize,
}

impl Field {
    const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    fn bytes<'a>(&self, record: &'a [u8]) -> &'a [u8] {
        &record[self.offset..self.offset + self.len]
    }
}

/// Little-endian field layout of the 648-byte record. Gaps between fields
/// are kernel-internal bookkeeping, skipped on purpose.
pub mod layout {
    use super::Field;

    pub const START_SEC: Field = Field::new(8, 8);
    pub const START_USEC: Field = Field::new(16, 4);
    pub const PID: Field = Field::new(40, 4);
    pub const UTICKS: Field = Field::new(204, 4);
    pub const STICKS: Field = Field::new(208, 4);
    pub const COMM: Field = Field::new(243, 16);
    pub const PPID: Field = Field::new(560, 4);

    pub const ALL: [(&str, Field); 7] = [
        ("start_sec", START_SEC),
        ("start_usec", START_USEC),
        ("pid", PID),
        ("uticks", UTICKS),
        ("sticks", STICKS),
        ("comm", COMM),
        ("ppid", PPID),
    ];
}

/// A decoded kernel record, before projection into [`ProcessRecord`].
#[derive(Debug, PartialEq, Eq)]
pub struct RawKernelRecord {
    pub start_sec: i64,
    pub start_usec: i32,
    pub pid: i32,
    pub uticks: u32,
    pub sticks: u32,
    pub comm: String,
    pub ppid: i32,
}

/// Decode a full table buffer into records.
///
/// The first record-sized region is a header/sentinel and is skipped. A
/// buffer that is not a whole number of records aborts the batch with no
/// partial results, since every offset past the misalignment would be
/// meaningless.
pub fn decode_table(buf: &[u8]) -> Result<Vec<ProcessRecord>, ProbeError> {
    if buf.len() % RECORD_LEN != 0 {
        return Err(ProbeError::MalformedTable {
            len: buf.len(),
            record_len: RECORD_LEN,
        });
    }
    let count = (buf.len() / RECORD_LEN).saturating_sub(1);
    let mut records = Vec::with_capacity(count);
    for chunk in buf.chunks_exact(RECORD_LEN).skip(1) {
        records.push(decode_record(chunk).into());
    }
    Ok(records)
}

/// Decode one record-sized chunk.
pub fn decode_record(chunk: &[u8]) -> RawKernelRecord {
    debug_assert_eq!(chunk.len(), RECORD_LEN);
    RawKernelRecord {
        start_sec: read_i64(chunk, layout::START_SEC),
        start_usec: read_i32(chunk, layout::START_USEC),
        pid: read_i32(chunk, layout::PID),
        uticks: read_u32(chunk, layout::UTICKS),
        sticks: read_u32(chunk, layout::STICKS),
        comm: read_name(chunk, layout::COMM),
        ppid: read_i32(chunk, layout::PPID),
    }
}

impl From<RawKernelRecord> for ProcessRecord {
    fn from(raw: RawKernelRecord) -> Self {
        ProcessRecord {
            pid: raw.pid.max(0) as u32,
            ppid: raw.ppid.max(0) as u32,
            pgrp: 0,
            session: 0,
            state: '?',
            name: raw.comm.clone(),
            cmdline: vec![raw.comm],
            utime: u64::from(raw.uticks),
            stime: u64::from(raw.sticks),
            starttime: raw.start_sec.max(0) as u64,
            vsize: 0,
            rss: 0,
            cgroup: String::new(),
        }
    }
}

fn read_u32(record: &[u8], field: Field) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(field.bytes(record));
    u32::from_le_bytes(buf)
}

fn read_i32(record: &[u8], field: Field) -> i32 {
    read_u32(record, field) as i32
}

fn read_i64(record: &[u8], field: Field) -> i64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(field.bytes(record));
    i64::from_le_bytes(buf)
}

/// Fixed-width NUL-padded name field: everything up to the first NUL, the
/// padding never leaks into the string.
fn read_name(record: &[u8], field: Field) -> String {
    let bytes = field.bytes(record);
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
