use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use crate::checksum;
use crate::messages;

/// What happened to the previous version of a regenerated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// No previous file.
    Fresh,
    /// Previous file was identical; backup removed.
    Unchanged,
    /// Previous file differed and was kept at this path.
    Kept(PathBuf),
}

/// `<path>.<unix-seconds>`
pub fn backup_path(path: &Path, unix_secs: u64) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{unix_secs}"));
    PathBuf::from(name)
}

/// Writes `contents` to `path`, moving any existing file aside first.
pub fn write_with_backup(path: &Path, contents: &str) -> Result<BackupOutcome> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    write_with_backup_at(path, contents, now)
}

fn write_with_backup_at(path: &Path, contents: &str, unix_secs: u64) -> Result<BackupOutcome> {
    let backup = backup_path(path, unix_secs);
    let had_previous = path.exists();
    if had_previous {
        fs::rename(path, &backup)
            .with_context(|| format!("rename {} to {}", path.display(), backup.display()))?;
    }

    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;

    if !had_previous {
        return Ok(BackupOutcome::Fresh);
    }
    if checksum::same_contents(path, &backup)? {
        fs::remove_file(&backup).with_context(|| format!("remove {}", backup.display()))?;
        return Ok(BackupOutcome::Unchanged);
    }
    tracing::info!(
        "{} {} - Backup of current {}",
        messages::info(161),
        backup.display(),
        path.display()
    );
    Ok(BackupOutcome::Kept(backup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_name_appends_seconds() {
        assert_eq!(
            backup_path(Path::new("/etc/odbc.ini"), 1700000000),
            PathBuf::from("/etc/odbc.ini.1700000000")
        );
    }

    #[test]
    fn fresh_unchanged_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db2dsdriver.cfg");

        assert_eq!(
            write_with_backup_at(&path, "one", 1).unwrap(),
            BackupOutcome::Fresh
        );
        assert_eq!(
            write_with_backup_at(&path, "one", 2).unwrap(),
            BackupOutcome::Unchanged
        );
        assert!(!backup_path(&path, 2).exists());

        let outcome = write_with_backup_at(&path, "two", 3).unwrap();
        assert_eq!(outcome, BackupOutcome::Kept(backup_path(&path, 3)));
        assert_eq!(fs::read_to_string(backup_path(&path, 3)).unwrap(), "one");
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }
}
