use std::fs;
use std::os::unix::fs::{chown, MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::InitConfig;
use crate::messages;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRule {
    pub path: PathBuf,
    pub mode: u32,
}

/// Directories whose whole tree is handed to `uid:gid`.
pub fn ownership_roots(cfg: &InitConfig) -> Vec<PathBuf> {
    vec![
        cfg.etc_dir.clone(),
        cfg.var_dir.clone(),
        cfg.driver_paths.odbc_dir.clone(),
        cfg.driver_paths.db2_cfg_dir.clone(),
    ]
}

pub fn permission_plan(cfg: &InitConfig) -> Vec<PermissionRule> {
    let sqlite = cfg.var_dir.join("sqlite");
    let rule = |path: PathBuf, mode: u32| PermissionRule { path, mode };
    vec![
        rule(cfg.etc_dir.join("G2Module.ini"), 0o750),
        rule(cfg.etc_dir.join("G2Project.ini"), 0o750),
        rule(sqlite.clone(), 0o750),
        rule(sqlite.join("G2C.db"), 0o750),
        rule(sqlite.join("G2C_LIBFEAT.db"), 0o750),
        rule(sqlite.join("G2C_RES.db"), 0o750),
        rule(sqlite.join("G2C.db.template"), 0o440),
        rule(cfg.driver_paths.odbc_ini(), 0o750),
        rule(cfg.driver_paths.db2_cfg(), 0o755),
    ]
}

fn chown_if_needed(path: &Path, meta: &fs::Metadata, uid: u32, gid: u32) -> Result<bool> {
    if (meta.uid(), meta.gid()) == (uid, gid) {
        return Ok(false);
    }
    tracing::info!(
        "{} {} - Changing owner from {}:{} to {}:{}",
        messages::info(152),
        path.display(),
        meta.uid(),
        meta.gid(),
        uid,
        gid
    );
    chown(path, Some(uid), Some(gid)).with_context(|| format!("chown {}", path.display()))?;
    Ok(true)
}

fn chown_tree(path: &Path, uid: u32, gid: u32, changed: &mut usize) -> Result<()> {
    let meta = fs::symlink_metadata(path).with_context(|| format!("stat {}", path.display()))?;
    if meta.file_type().is_symlink() {
        return Ok(());
    }
    if chown_if_needed(path, &meta, uid, gid)? {
        *changed += 1;
    }
    if meta.is_dir() {
        for entry in fs::read_dir(path).with_context(|| format!("list {}", path.display()))? {
            let entry = entry.with_context(|| format!("list {}", path.display()))?;
            chown_tree(&entry.path(), uid, gid, changed)?;
        }
    }
    Ok(())
}

/// Recursively chowns each existing root. Returns the number of entries changed.
pub fn change_directory_ownership(cfg: &InitConfig) -> Result<usize> {
    let mut changed = 0;
    for root in ownership_roots(cfg) {
        if root.is_dir() {
            chown_tree(&root, cfg.uid, cfg.gid, &mut changed)?;
        }
    }
    Ok(changed)
}

/// Applies [`permission_plan`] modes and `uid:gid` to the files that exist.
pub fn change_file_permissions(cfg: &InitConfig) -> Result<()> {
    for rule in permission_plan(cfg) {
        let Ok(meta) = fs::metadata(&rule.path) else {
            continue;
        };
        let actual = meta.permissions().mode() & 0o777;
        if actual != rule.mode {
            tracing::info!(
                "{} {} - Changing permissions from {:o} to {:o}",
                messages::info(151),
                rule.path.display(),
                actual,
                rule.mode
            );
            fs::set_permissions(&rule.path, fs::Permissions::from_mode(rule.mode))
                .with_context(|| format!("chmod {}", rule.path.display()))?;
        }
        if meta.gid() != cfg.gid {
            tracing::info!(
                "{} {} - Changing group from {} to {}",
                messages::info(153),
                rule.path.display(),
                meta.gid(),
                cfg.gid
            );
        }
        chown_if_needed(&rule.path, &meta, cfg.uid, cfg.gid)?;
    }
    Ok(())
}
