//! Smoke tests against the real process table. Linux-only: the test runner
//! itself must appear in `/proc`.

#![cfg(target_os = "linux")]

use procsnap::{find_by_id, snapshot};

#[test]
fn snapshot_contains_the_current_process() {
    let pid = std::process::id();
    let records = snapshot().unwrap();
    let me = records
        .iter()
        .find(|record| record.pid == pid)
        .expect("current process missing from snapshot");
    assert!(!me.name.is_empty());
    assert!(!me.cmdline.is_empty());
}

#[test]
fn find_by_id_locates_the_current_process() {
    let pid = std::process::id();
    let me = find_by_id(pid).unwrap().expect("current process not found");
    assert_eq!(me.pid, pid);
    assert!(!me.cgroup.is_empty());
}

#[test]
fn find_by_id_for_pid_zero_is_none() {
    // The pseudo-filesystem never has an entry for pid 0.
    assert!(find_by_id(0).unwrap().is_none());
}
