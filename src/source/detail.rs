//! Loaders for the per-process auxiliary files: argument vector and cgroup
//! membership.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::ProbeError;
use crate::source::Probe;

/// Read `<root>/<pid>/cmdline` into the ordered argument vector.
///
/// The file is NUL-separated with no guaranteed trailing delimiter; one
/// trailing NUL is stripped so the last argument does not grow an empty
/// sibling. Kernel threads have an empty file, which yields an empty vector.
pub fn load_cmdline(root: &Path, pid: u32) -> Probe<Vec<String>> {
    let path = root.join(pid.to_string()).join("cmdline");
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => return vanished_or_fault(path, err),
    };
    let trimmed = bytes.strip_suffix(&[0]).unwrap_or(&bytes);
    if trimmed.is_empty() {
        return Probe::Found(Vec::new());
    }
    let args = trimmed
        .split(|&b| b == 0)
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect();
    Probe::Found(args)
}

/// Read `<root>/<pid>/cgroup` verbatim, embedded newlines included.
pub fn load_cgroup(root: &Path, pid: u32) -> Probe<String> {
    let path = root.join(pid.to_string()).join("cgroup");
    match std::fs::read_to_string(&path) {
        Ok(text) => Probe::Found(text),
        Err(err) => vanished_or_fault(path, err),
    }
}

/// Classify a read failure: a missing file means the process exited between
/// discovery and this read, anything else is a real fault.
fn vanished_or_fault<T>(path: PathBuf, err: io::Error) -> Probe<T> {
    if err.kind() == io::ErrorKind::NotFound {
        Probe::Gone
    } else {
        Probe::Faulted(ProbeError::Read { path, source: err })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn fake_root(test: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("procsnap_detail_{test}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        root
    }

    fn write_file(root: &Path, pid: u32, name: &str, bytes: &[u8]) {
        let dir = root.join(pid.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), bytes).unwrap();
    }

    #[test]
    fn cmdline_splits_on_nul_without_trailing_empty() {
        let root = fake_root("cmdline_nul");
        write_file(&root, 42, "cmdline", b"/bin/ls\0-la\0");
        match load_cmdline(&root, 42) {
            Probe::Found(args) => assert_eq!(args, vec!["/bin/ls", "-la"]),
            other => panic!("unexpected outcome: {other:?}"),
        }
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn cmdline_without_trailing_nul_still_splits() {
        let root = fake_root("cmdline_no_trailer");
        write_file(&root, 42, "cmdline", b"/bin/cat\0file");
        match load_cmdline(&root, 42) {
            Probe::Found(args) => assert_eq!(args, vec!["/bin/cat", "file"]),
            other => panic!("unexpected outcome: {other:?}"),
        }
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn empty_cmdline_yields_empty_vector() {
        let root = fake_root("cmdline_empty");
        write_file(&root, 7, "cmdline", b"");
        match load_cmdline(&root, 7) {
            Probe::Found(args) => assert!(args.is_empty()),
            other => panic!("unexpected outcome: {other:?}"),
        }
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_file_is_gone_not_fault() {
        let root = fake_root("gone");
        assert!(matches!(load_cmdline(&root, 9999), Probe::Gone));
        assert!(matches!(load_cgroup(&root, 9999), Probe::Gone));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn cgroup_is_verbatim_with_newlines() {
        let root = fake_root("cgroup");
        let text = "12:pids:/user.slice\n1:name=systemd:/user.slice/user-1000.slice\n";
        write_file(&root, 42, "cgroup", text.as_bytes());
        match load_cgroup(&root, 42) {
            Probe::Found(got) => assert_eq!(got, text),
            other => panic!("unexpected outcome: {other:?}"),
        }
        let _ = fs::remove_dir_all(&root);
    }
}
