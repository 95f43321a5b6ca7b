use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::InitConfig;
use crate::messages;

/// Engine configuration files shipped as templates.
pub const TEMPLATE_FILES: [&str; 9] = [
    "cfgVariant.json",
    "customOn.txt",
    "defaultGNRCP.config",
    "g2config.json",
    "G2Project.ini",
    "customGn.txt",
    "customSn.txt",
    "G2Module.ini",
    "stb.config",
];

const SQLITE_DATABASES: [&str; 3] = ["G2C.db", "G2C_LIBFEAT.db", "G2C_RES.db"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStep {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl CopyStep {
    fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

/// Candidate copies in priority order; the first existing source for a target wins.
pub fn copy_plan(cfg: &InitConfig) -> Vec<CopyStep> {
    let sqlite = cfg.var_dir.join("sqlite");
    let templates = cfg.g2_dir.join("resources").join("templates");
    let mut plan = vec![CopyStep::new(
        sqlite.join("G2C.db"),
        sqlite.join("G2C.db.template"),
    )];

    for source_name in ["G2C.db", "G2C.db.template"] {
        for db in SQLITE_DATABASES {
            plan.push(CopyStep::new(templates.join(source_name), sqlite.join(db)));
        }
    }

    for name in TEMPLATE_FILES {
        plan.push(CopyStep::new(templates.join(name), cfg.etc_dir.join(name)));
    }

    // Older layouts ship `<name>.template`, either in etc or in templates.
    for name in TEMPLATE_FILES {
        let template_name = format!("{name}.template");
        plan.push(CopyStep::new(
            cfg.etc_dir.join(&template_name),
            cfg.etc_dir.join(name),
        ));
        plan.push(CopyStep::new(
            templates.join(&template_name),
            cfg.etc_dir.join(name),
        ));
    }

    plan
}

/// Copies each planned source whose target is missing. Returns the number copied.
pub fn copy_files(cfg: &InitConfig) -> Result<usize> {
    let mut copied = 0;
    for step in copy_plan(cfg) {
        if !step.source.exists() {
            tracing::debug!(
                "{} {} - Was not created because there is no {}",
                messages::debug(902),
                step.target.display(),
                step.source.display()
            );
            continue;
        }
        if step.target.exists() {
            continue;
        }
        tracing::info!(
            "{} {} - Creating file by copying {}",
            messages::info(154),
            step.target.display(),
            step.source.display()
        );
        if let Some(parent) = step.target.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::copy(&step.source, &step.target).with_context(|| {
            format!(
                "copy {} to {}",
                step.source.display(),
                step.target.display()
            )
        })?;
        copied += 1;
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn cfg_under(root: &Path) -> InitConfig {
        let mut cfg = InitConfig::default();
        cfg.etc_dir = root.join("etc");
        cfg.g2_dir = root.join("g2");
        cfg.var_dir = root.join("var");
        cfg
    }

    #[test]
    fn plan_starts_with_sqlite_template_backup() {
        let cfg = cfg_under(Path::new("/r"));
        let plan = copy_plan(&cfg);
        assert_eq!(
            plan[0],
            CopyStep::new(
                PathBuf::from("/r/var/sqlite/G2C.db"),
                PathBuf::from("/r/var/sqlite/G2C.db.template")
            )
        );
        assert_eq!(plan.len(), 1 + 6 + 9 + 18);
        assert!(plan.contains(&CopyStep::new(
            PathBuf::from("/r/etc/G2Module.ini.template"),
            PathBuf::from("/r/etc/G2Module.ini")
        )));
    }

    #[test]
    fn copies_only_missing_targets() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = cfg_under(dir.path());
        let templates = cfg.g2_dir.join("resources/templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("G2C.db"), "db").unwrap();
        fs::write(templates.join("G2Module.ini"), "[SQL]\n").unwrap();
        fs::write(templates.join("stb.config"), "new").unwrap();
        fs::create_dir_all(&cfg.etc_dir).unwrap();
        fs::write(cfg.etc_dir.join("stb.config"), "existing").unwrap();

        let copied = copy_files(&cfg).unwrap();

        // Three sqlite databases plus G2Module.ini.
        assert_eq!(copied, 4);
        for db in SQLITE_DATABASES {
            assert_eq!(fs::read_to_string(cfg.var_dir.join("sqlite").join(db)).unwrap(), "db");
        }
        assert!(cfg.etc_dir.join("G2Module.ini").exists());
        assert_eq!(
            fs::read_to_string(cfg.etc_dir.join("stb.config")).unwrap(),
            "existing"
        );
        assert!(!cfg.var_dir.join("sqlite/G2C.db.template").exists());

        // Second run: var/sqlite/G2C.db now seeds the template copy.
        assert_eq!(copy_files(&cfg).unwrap(), 1);
        assert!(cfg.var_dir.join("sqlite/G2C.db.template").exists());
    }
}
