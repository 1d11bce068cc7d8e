//! Deterministic host with canned process and disk tables
//!
//! File operations still go to the real filesystem (point the session at a
//! temporary directory), so only the machine-dependent capabilities are faked.

use crate::core::error::Result;
use crate::host::{fs, DirEntryInfo, DiskInfo, Host, ProcessInfo, ResourceSnapshot};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct FakeHost {
    /// Rows owned by the current user
    pub own_processes: Vec<ProcessInfo>,
    /// Rows owned by everyone else, shown only with `ps -a`
    pub other_processes: Vec<ProcessInfo>,
    pub cpu_percent: f32,
    pub memory: (u64, u64),
    pub swap: (u64, u64),
    pub disks: Vec<DiskInfo>,
}

fn process(pid: u32, owner: &str, cpu_percent: f32, command: &str) -> ProcessInfo {
    ProcessInfo {
        pid,
        owner: owner.into(),
        state: "Sleeping".into(),
        cpu_percent,
        memory_bytes: u64::from(pid) * 1024,
        command: command.into(),
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        const GIB: u64 = 1024 * 1024 * 1024;
        Self {
            own_processes: vec![
                process(1200, "user", 2.5, "bash"),
                process(1201, "user", 12.0, "nlterm"),
            ],
            other_processes: vec![
                process(1, "root", 0.1, "init"),
                process(640, "root", 4.0, "sshd"),
            ],
            cpu_percent: 18.5,
            memory: (3 * GIB, 8 * GIB),
            swap: (0, 2 * GIB),
            disks: vec![DiskInfo {
                filesystem: "/dev/sda1".into(),
                size: 100 * GIB,
                used: 40 * GIB,
                available: 60 * GIB,
                mount_point: PathBuf::from("/"),
            }],
        }
    }
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Host for FakeHost {
    fn list_directory(
        &self,
        path: &Path,
        show_hidden: bool,
        long: bool,
    ) -> Result<Vec<DirEntryInfo>> {
        fs::list_directory(path, show_hidden, long)
    }

    fn change_directory(&self, path: &Path) -> Result<PathBuf> {
        fs::change_directory(path)
    }

    fn make_directory(&self, path: &Path, parents: bool) -> Result<()> {
        fs::make_directory(path, parents)
    }

    fn remove_entry(&self, path: &Path, recursive: bool, force: bool) -> Result<()> {
        fs::remove_entry(path, recursive, force)
    }

    fn touch_file(&self, path: &Path) -> Result<()> {
        fs::touch_file(path)
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_file(path)
    }

    fn move_entry(&self, from: &Path, to: &Path) -> Result<PathBuf> {
        fs::move_entry(from, to)
    }

    fn copy_entry(&self, from: &Path, to: &Path, recursive: bool) -> Result<PathBuf> {
        fs::copy_entry(from, to, recursive)
    }

    fn list_processes(&self, all_users: bool) -> Result<Vec<ProcessInfo>> {
        let mut rows = self.own_processes.clone();
        if all_users {
            rows.extend(self.other_processes.iter().cloned());
        }
        rows.sort_by_key(|row| row.pid);
        Ok(rows)
    }

    fn resource_snapshot(&self, max_processes: usize) -> Result<ResourceSnapshot> {
        let mut processes: Vec<ProcessInfo> = self
            .own_processes
            .iter()
            .chain(&self.other_processes)
            .cloned()
            .collect();
        processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
        processes.truncate(max_processes);
        Ok(ResourceSnapshot {
            cpu_percent: self.cpu_percent,
            memory_used: self.memory.0,
            memory_total: self.memory.1,
            swap_used: self.swap.0,
            swap_total: self.swap.1,
            processes,
        })
    }

    fn disk_usage(&self) -> Result<Vec<DiskInfo>> {
        Ok(self.disks.clone())
    }
}
