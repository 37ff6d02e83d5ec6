//! Backup naming for replaced saves.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix appended to a target save, followed by the backup number.
pub const BACKUP_SUFFIX: &str = ".facebak";

/// Backup path with number `n`: `<target>.facebak<n>`.
pub fn numbered_backup(target: &Path, n: u32) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(format!("{}{}", BACKUP_SUFFIX, n));
    PathBuf::from(name)
}

/// First `<target>.facebak<N>` that does not exist yet, N counting from 0.
pub fn next_backup_path(target: &Path) -> io::Result<PathBuf> {
    free_number(target).map(|n| numbered_backup(target, n))
}

fn free_number(target: &Path) -> io::Result<u32> {
    let mut n = 0u32;
    while numbered_backup(target, n).try_exists()? {
        n = next_number(n)?;
    }
    Ok(n)
}

fn next_number(n: u32) -> io::Result<u32> {
    n.checked_add(1)
        .ok_or_else(|| io::Error::new(io::ErrorKind::AlreadyExists, "no free backup number"))
}

/// Give the current `target` file a free backup name and return it.
///
/// The backup is a hard link, so `target` stays in place until the caller
/// replaces it. A name taken since it was found free is skipped, never
/// replaced. Filesystems without hard links fall back to a rename.
pub fn link_backup(target: &Path) -> io::Result<PathBuf> {
    link_from(target, free_number(target)?)
}

fn link_from(target: &Path, mut n: u32) -> io::Result<PathBuf> {
    loop {
        let backup = numbered_backup(target, n);
        match fs::hard_link(target, &backup) {
            Ok(()) => return Ok(backup),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n = next_number(n)?,
            Err(e) => {
                tracing::debug!(error = %e, "hard link failed, renaming target to backup");
                fs::rename(target, &backup)?;
                return Ok(backup);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_fills_from_zero() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Save 3.ess");

        assert_eq!(
            next_backup_path(&target).unwrap(),
            dir.path().join("Save 3.ess.facebak0")
        );

        std::fs::write(dir.path().join("Save 3.ess.facebak0"), b"").unwrap();
        std::fs::write(dir.path().join("Save 3.ess.facebak2"), b"").unwrap();
        assert_eq!(
            next_backup_path(&target).unwrap(),
            dir.path().join("Save 3.ess.facebak1")
        );
    }

    #[test]
    fn test_link_keeps_target_and_existing_backups() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("quick.ess");
        std::fs::write(&target, b"current").unwrap();
        std::fs::write(dir.path().join("quick.ess.facebak0"), b"older").unwrap();

        let backup = link_backup(&target).unwrap();
        assert_eq!(backup, dir.path().join("quick.ess.facebak1"));
        assert_eq!(std::fs::read(&backup).unwrap(), b"current");
        assert_eq!(std::fs::read(&target).unwrap(), b"current");
        assert_eq!(std::fs::read(dir.path().join("quick.ess.facebak0")).unwrap(), b"older");
    }

    #[test]
    fn test_name_taken_after_lookup_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("quick.ess");
        std::fs::write(&target, b"current").unwrap();

        let free = next_backup_path(&target).unwrap();
        std::fs::write(&free, b"appeared meanwhile").unwrap();

        let backup = link_from(&target, 0).unwrap();
        assert_eq!(backup, dir.path().join("quick.ess.facebak1"));
        assert_eq!(std::fs::read(&free).unwrap(), b"appeared meanwhile");
        assert_eq!(std::fs::read(&backup).unwrap(), b"current");
    }
}
