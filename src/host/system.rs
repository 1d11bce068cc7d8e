//! The real host: `std::fs` for files, `sysinfo` for processes and disks

use crate::core::error::Result;
use crate::host::{fs, DirEntryInfo, DiskInfo, Host, ProcessInfo, ResourceSnapshot};
use std::path::{Path, PathBuf};
use sysinfo::{Disks, Pid, Process, System, Users, MINIMUM_CPU_UPDATE_INTERVAL};

/// Host implementation backed by the running operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl SystemHost {
    pub fn new() -> Self {
        Self
    }

    /// Machine name for the prompt
    pub fn host_name() -> String {
        System::host_name().unwrap_or_else(|| "localhost".into())
    }
}

fn process_row(pid: &Pid, process: &Process, users: &Users) -> ProcessInfo {
    let owner = process
        .user_id()
        .and_then(|uid| users.get_user_by_id(uid))
        .map(|user| user.name().to_string())
        .unwrap_or_else(|| "?".into());
    ProcessInfo {
        pid: pid.as_u32(),
        owner,
        state: process.status().to_string(),
        cpu_percent: process.cpu_usage(),
        memory_bytes: process.memory(),
        command: process.name().to_string(),
    }
}

impl Host for SystemHost {
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
        let mut sys = System::new();
        sys.refresh_processes();
        let users = Users::new_with_refreshed_list();

        // Without -a only the caller's own processes are listed
        let own_uid = sysinfo::get_current_pid()
            .ok()
            .and_then(|pid| sys.process(pid))
            .and_then(|p| p.user_id().cloned());

        let mut rows: Vec<ProcessInfo> = sys
            .processes()
            .iter()
            .filter(|(_, p)| all_users || own_uid.is_none() || p.user_id() == own_uid.as_ref())
            .map(|(pid, p)| process_row(pid, p, &users))
            .collect();
        rows.sort_by_key(|row| row.pid);
        Ok(rows)
    }

    fn resource_snapshot(&self, max_processes: usize) -> Result<ResourceSnapshot> {
        let mut sys = System::new();
        // CPU usage is a delta between two refreshes
        sys.refresh_cpu();
        sys.refresh_processes();
        std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu();
        sys.refresh_processes();
        sys.refresh_memory();
        let users = Users::new_with_refreshed_list();

        let mut processes: Vec<ProcessInfo> = sys
            .processes()
            .iter()
            .map(|(pid, p)| process_row(pid, p, &users))
            .collect();
        processes.sort_by(|a, b| {
            b.cpu_percent
                .partial_cmp(&a.cpu_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        processes.truncate(max_processes);

        Ok(ResourceSnapshot {
            cpu_percent: sys.global_cpu_info().cpu_usage(),
            memory_used: sys.used_memory(),
            memory_total: sys.total_memory(),
            swap_used: sys.used_swap(),
            swap_total: sys.total_swap(),
            processes,
        })
    }

    fn disk_usage(&self) -> Result<Vec<DiskInfo>> {
        let disks = Disks::new_with_refreshed_list();
        let rows: Vec<DiskInfo> = disks
            .list()
            .iter()
            .map(|disk| {
                let size = disk.total_space();
                let available = disk.available_space();
                DiskInfo {
                    filesystem: disk.name().to_string_lossy().into_owned(),
                    size,
                    used: size.saturating_sub(available),
                    available,
                    mount_point: disk.mount_point().to_path_buf(),
                }
            })
            .collect();
        if rows.is_empty() {
            tracing::debug!("sysinfo reported no mounted disks");
        }
        Ok(rows)
    }
}
