//! Throwaway Senzing install layout for integration tests.
//!
//! Mirrors the container volumes under one temp dir: templates shipped in
//! `g2/resources/templates`, empty `etc` and `var`, and driver directories.

use std::fs;
use std::path::Path;

use szinit_core::config::InitConfig;
use tempfile::TempDir;

pub const MODULE_INI_TEMPLATE: &str = "\
[PIPELINE]
SUPPORTPATH = /opt/senzing/g2/data
CONFIGPATH = /opt/senzing/g2/python
RESOURCEPATH = /opt/senzing/g2/resources

[SQL]
CONNECTION = sqlite3://na:na@/opt/senzing/g2/sqldb/G2C.db
G2CONFIGFILE = /opt/senzing/g2/python/g2config.json
";

pub struct InstallTree {
    pub _dir: TempDir,
    pub cfg: InitConfig,
}

/// Creates the tree and a config pointing every path into it.
pub fn create(database_url: &str) -> InstallTree {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    let mut cfg = InitConfig::default();
    cfg.etc_dir = root.join("etc");
    cfg.g2_dir = root.join("g2");
    cfg.var_dir = root.join("var");
    cfg.data_dir = root.join("data");
    cfg.driver_paths.db2_cfg_dir = root.join("db2/cfg");
    cfg.driver_paths.odbc_dir = root.join("mssql/etc");
    cfg.driver_paths.odbc_template = root.join("mssql/odbc.ini.mssql-template");
    cfg.driver_paths.scratch_dir = root.to_path_buf();
    cfg.database_url = Some(database_url.to_string());

    write_templates(&cfg.g2_dir.join("resources/templates"));
    InstallTree { _dir: dir, cfg }
}

fn write_templates(templates: &Path) {
    fs::create_dir_all(templates).expect("create templates");
    fs::write(templates.join("G2C.db"), b"sqlite-template").expect("G2C.db");
    fs::write(templates.join("G2Module.ini"), MODULE_INI_TEMPLATE).expect("G2Module.ini");
    fs::write(templates.join("g2config.json"), "{}").expect("g2config.json");
    fs::write(templates.join("stb.config"), "stb").expect("stb.config");
}
