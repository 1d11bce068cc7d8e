//! Host capabilities - the operations commands perform on the real machine
//!
//! Handlers never touch `std::fs` or `sysinfo` directly; they go through
//! [`Host`] with paths already resolved against the session's working
//! directory. Every method returns a defined error kind instead of panicking.

pub mod fake;
pub mod fs;
pub mod system;

use crate::core::error::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub use fake::FakeHost;
pub use system::SystemHost;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
    /// Present only for long-format listings
    pub details: Option<EntryDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDetails {
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    /// `drwxr-xr-x` style string
    pub permissions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub owner: String,
    pub state: String,
    pub cpu_percent: f32,
    pub memory_bytes: u64,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSnapshot {
    pub cpu_percent: f32,
    pub memory_used: u64,
    pub memory_total: u64,
    pub swap_used: u64,
    pub swap_total: u64,
    /// Sorted by CPU usage, highest first
    pub processes: Vec<ProcessInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskInfo {
    pub filesystem: String,
    pub size: u64,
    pub used: u64,
    pub available: u64,
    pub mount_point: PathBuf,
}

impl DiskInfo {
    pub fn use_percent(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            let size = u128::from(self.size);
            let percent = (u128::from(self.used) * 100 + size - 1) / size;
            u64::try_from(percent).unwrap_or(u64::MAX)
        }
    }
}

/// Capability interface the command handlers consume
pub trait Host {
    fn list_directory(&self, path: &Path, show_hidden: bool, long: bool)
        -> Result<Vec<DirEntryInfo>>;

    /// Returns the canonical absolute path on success
    fn change_directory(&self, path: &Path) -> Result<PathBuf>;

    fn make_directory(&self, path: &Path, parents: bool) -> Result<()>;

    fn remove_entry(&self, path: &Path, recursive: bool, force: bool) -> Result<()>;

    /// Create if absent, otherwise bump the modified time; content is untouched
    fn touch_file(&self, path: &Path) -> Result<()>;

    fn read_file(&self, path: &Path) -> Result<String>;

    /// Move `from` to `to`, or into `to` when it is an existing directory
    fn move_entry(&self, from: &Path, to: &Path) -> Result<PathBuf>;

    /// Copy `from` to `to`, or into `to` when it is an existing directory
    fn copy_entry(&self, from: &Path, to: &Path, recursive: bool) -> Result<PathBuf>;

    fn list_processes(&self, all_users: bool) -> Result<Vec<ProcessInfo>>;

    fn resource_snapshot(&self, max_processes: usize) -> Result<ResourceSnapshot>;

    fn disk_usage(&self) -> Result<Vec<DiskInfo>>;
}

/// Format a byte count with K/M/G/T/P units and one decimal
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "K", "M", "G", "T", "P"];
    let mut size = bytes as f64;
    for unit in UNITS.iter().take(UNITS.len() - 1) {
        if size < 1024.0 {
            return format!("{:.1}{}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1}{}", size, UNITS[UNITS.len() - 1])
}
