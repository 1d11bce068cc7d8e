//! Filesystem capabilities backed by `std::fs`

use crate::core::error::{ExecErrorKind, Result, TerminalError};
use crate::host::{DirEntryInfo, EntryDetails};
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

fn exec_err(kind: ExecErrorKind, path: &Path) -> TerminalError {
    TerminalError::Execution {
        kind,
        path: path.to_path_buf(),
    }
}

fn io_err(err: std::io::Error, path: &Path) -> TerminalError {
    TerminalError::execution(&err, path)
}

/// Directories first, then files, each group sorted by name
pub fn list_directory(path: &Path, show_hidden: bool, long: bool) -> Result<Vec<DirEntryInfo>> {
    let meta = fs::metadata(path).map_err(|e| io_err(e, path))?;
    if !meta.is_dir() {
        return Err(exec_err(ExecErrorKind::NotADirectory, path));
    }

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(path).map_err(|e| io_err(e, path))? {
        let entry = entry.map_err(|e| io_err(e, path))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }

        // Follow symlinks so a link to a directory lists as a directory
        let meta = match fs::metadata(entry.path()) {
            Ok(meta) => meta,
            Err(_) => entry.metadata().map_err(|e| io_err(e, &entry.path()))?,
        };
        let info = DirEntryInfo {
            name,
            is_dir: meta.is_dir(),
            details: long.then(|| details_for(&meta)),
        };
        if info.is_dir {
            dirs.push(info);
        } else {
            files.push(info);
        }
    }

    dirs.sort_by(|a, b| a.name.cmp(&b.name));
    files.sort_by(|a, b| a.name.cmp(&b.name));
    dirs.extend(files);
    Ok(dirs)
}

fn details_for(meta: &fs::Metadata) -> EntryDetails {
    EntryDetails {
        size: meta.len(),
        modified: meta.modified().ok().map(DateTime::<Local>::from),
        permissions: permission_string(meta),
    }
}

#[cfg(unix)]
fn permission_string(meta: &fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = meta.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(if meta.is_dir() { 'd' } else { '-' });
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn permission_string(meta: &fs::Metadata) -> String {
    let kind = if meta.is_dir() { 'd' } else { '-' };
    let write = if meta.permissions().readonly() { '-' } else { 'w' };
    format!("{}r{}-r{}-r{}-", kind, write, write, write)
}

pub fn change_directory(path: &Path) -> Result<PathBuf> {
    let meta = fs::metadata(path).map_err(|e| io_err(e, path))?;
    if !meta.is_dir() {
        return Err(exec_err(ExecErrorKind::NotADirectory, path));
    }
    // Reading the directory surfaces permission problems the way `cd` would
    fs::read_dir(path).map_err(|e| io_err(e, path))?;
    fs::canonicalize(path).map_err(|e| io_err(e, path))
}

pub fn make_directory(path: &Path, parents: bool) -> Result<()> {
    if parents {
        if path.exists() && !path.is_dir() {
            return Err(exec_err(ExecErrorKind::AlreadyExists, path));
        }
        fs::create_dir_all(path).map_err(|e| io_err(e, path))
    } else {
        fs::create_dir(path).map_err(|e| io_err(e, path))
    }
}

pub fn remove_entry(path: &Path, recursive: bool, force: bool) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && force => return Ok(()),
        Err(e) => return Err(io_err(e, path)),
    };

    if !meta.is_dir() {
        return fs::remove_file(path).map_err(|e| io_err(e, path));
    }

    if recursive {
        return fs::remove_dir_all(path).map_err(|e| io_err(e, path));
    }

    let has_children = fs::read_dir(path)
        .map_err(|e| io_err(e, path))?
        .next()
        .is_some();
    if has_children {
        return Err(exec_err(ExecErrorKind::NotEmpty, path));
    }
    fs::remove_dir(path).map_err(|e| io_err(e, path))
}

pub fn touch_file(path: &Path) -> Result<()> {
    // Directories cannot be opened for append, only read
    let file = match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => fs::File::open(path),
        _ => OpenOptions::new().create(true).append(true).open(path),
    }
    .map_err(|e| io_err(e, path))?;
    file.set_modified(SystemTime::now())
        .map_err(|e| io_err(e, path))
}

pub fn read_file(path: &Path) -> Result<String> {
    let meta = fs::metadata(path).map_err(|e| io_err(e, path))?;
    if meta.is_dir() {
        return Err(exec_err(ExecErrorKind::IsADirectory, path));
    }
    let bytes = fs::read(path).map_err(|e| io_err(e, path))?;
    String::from_utf8(bytes).map_err(|_| exec_err(ExecErrorKind::InvalidData, path))
}

/// `to` itself, or `to/<file name of from>` when `to` is an existing directory
fn destination_for(from: &Path, to: &Path) -> PathBuf {
    match from.file_name() {
        Some(name) if to.is_dir() => to.join(name),
        _ => to.to_path_buf(),
    }
}

pub fn move_entry(from: &Path, to: &Path) -> Result<PathBuf> {
    if fs::symlink_metadata(from).is_err() {
        return Err(exec_err(ExecErrorKind::NotFound, from));
    }
    let dest = destination_for(from, to);
    fs::rename(from, &dest).map_err(|e| io_err(e, &dest))?;
    Ok(dest)
}

pub fn copy_entry(from: &Path, to: &Path, recursive: bool) -> Result<PathBuf> {
    let meta = fs::metadata(from).map_err(|e| io_err(e, from))?;
    let dest = destination_for(from, to);
    if meta.is_dir() {
        if !recursive {
            return Err(exec_err(ExecErrorKind::IsADirectory, from));
        }
        // Copying a directory into itself would never terminate
        if dest.starts_with(from) {
            return Err(exec_err(ExecErrorKind::Other, &dest));
        }
        copy_tree(from, &dest)?;
    } else {
        // fs::copy truncates the destination before reading the source
        if same_file(from, &dest) {
            return Err(exec_err(ExecErrorKind::SameFile, &dest));
        }
        fs::copy(from, &dest).map_err(|e| io_err(e, &dest))?;
    }
    Ok(dest)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to).map_err(|e| io_err(e, to))?;
    for entry in fs::read_dir(from).map_err(|e| io_err(e, from))? {
        let entry = entry.map_err(|e| io_err(e, from))?;
        let source = entry.path();
        let target = to.join(entry.file_name());
        if source.is_dir() {
            copy_tree(&source, &target)?;
        } else {
            fs::copy(&source, &target).map_err(|e| io_err(e, &target))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_list_directory_orders_dirs_first() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(tmp.path().join("zeta")).unwrap();
        fs::write(tmp.path().join(".hidden"), "").unwrap();

        let entries = list_directory(tmp.path(), false, false).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "a.txt", "b.txt"]);
        assert!(entries[0].is_dir);
        assert!(entries[0].details.is_none());

        let all = list_directory(tmp.path(), true, true).unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|e| e.details.is_some()));
    }

    #[test]
    fn test_list_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let err = list_directory(&tmp.path().join("nope"), false, false).unwrap_err();
        assert!(matches!(
            err,
            TerminalError::Execution { kind: ExecErrorKind::NotFound, .. }
        ));
    }

    #[test]
    fn test_change_directory_to_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            change_directory(&file),
            Err(TerminalError::Execution { kind: ExecErrorKind::NotADirectory, .. })
        ));
    }

    #[test]
    fn test_make_directory_variants() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a/b/c");

        assert!(matches!(
            make_directory(&nested, false),
            Err(TerminalError::Execution { kind: ExecErrorKind::NotFound, .. })
        ));
        make_directory(&nested, true).unwrap();
        assert!(nested.is_dir());

        make_directory(&nested, true).unwrap();
        assert!(matches!(
            make_directory(&nested, false),
            Err(TerminalError::Execution { kind: ExecErrorKind::AlreadyExists, .. })
        ));
    }

    #[test]
    fn test_remove_non_empty_requires_recursive() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("full");
        fs::create_dir_all(dir.join("inner")).unwrap();
        fs::write(dir.join("inner/file.txt"), "data").unwrap();

        assert!(matches!(
            remove_entry(&dir, false, false),
            Err(TerminalError::Execution { kind: ExecErrorKind::NotEmpty, .. })
        ));
        assert!(dir.exists());

        remove_entry(&dir, true, false).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_remove_empty_directory_without_recursive() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("empty");
        fs::create_dir(&dir).unwrap();
        remove_entry(&dir, false, false).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_remove_missing_with_force() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("ghost");
        assert!(remove_entry(&missing, false, true).is_ok());
        assert!(remove_entry(&missing, false, false).is_err());
    }

    #[test]
    fn test_touch_preserves_content() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("notes.txt");
        fs::write(&file, "keep me").unwrap();

        touch_file(&file).unwrap();
        touch_file(&file).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "keep me");

        let fresh = tmp.path().join("fresh.txt");
        touch_file(&fresh).unwrap();
        assert_eq!(fs::read_to_string(&fresh).unwrap(), "");
    }

    #[test]
    fn test_touch_directory_updates_mtime() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        let past = SystemTime::now() - Duration::from_secs(3600);
        fs::File::open(&dir).unwrap().set_modified(past).unwrap();

        touch_file(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(fs::metadata(&dir).unwrap().modified().unwrap() > past);
    }

    #[test]
    fn test_read_file_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            read_file(tmp.path()),
            Err(TerminalError::Execution { kind: ExecErrorKind::IsADirectory, .. })
        ));

        let binary = tmp.path().join("blob.bin");
        fs::write(&binary, [0xff, 0xfe, 0x00, 0x81]).unwrap();
        assert!(matches!(
            read_file(&binary),
            Err(TerminalError::Execution { kind: ExecErrorKind::InvalidData, .. })
        ));
    }

    #[test]
    fn test_move_into_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("report.pdf");
        let docs = tmp.path().join("Documents");
        fs::write(&file, "pdf").unwrap();
        fs::create_dir(&docs).unwrap();

        let dest = move_entry(&file, &docs).unwrap();
        assert_eq!(dest, docs.join("report.pdf"));
        assert!(!file.exists());
        assert!(dest.exists());
    }

    #[test]
    fn test_copy_directory_needs_recursive() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("sub/a.txt"), "a").unwrap();
        let dst = tmp.path().join("backup");

        assert!(copy_entry(&src, &dst, false).is_err());
        copy_entry(&src, &dst, true).unwrap();
        assert_eq!(fs::read_to_string(dst.join("sub/a.txt")).unwrap(), "a");
        assert!(src.join("sub/a.txt").exists());
    }

    #[test]
    fn test_copy_file_onto_itself() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, "precious").unwrap();

        for to in [file.clone(), tmp.path().to_path_buf()] {
            let err = copy_entry(&file, &to, false).unwrap_err();
            assert!(matches!(
                err,
                TerminalError::Execution { kind: ExecErrorKind::SameFile, .. }
            ));
        }
        assert_eq!(fs::read_to_string(&file).unwrap(), "precious");
    }
}
