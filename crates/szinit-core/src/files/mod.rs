//! Filesystem preparation under the Senzing volumes: template copies, ownership
//! and permissions, decoded secrets, and backed-up driver files.

mod artifacts;
mod backup;
mod copy;
mod ownership;

pub use artifacts::{
    delete_obsolete_files, write_g2config_gtc, write_secret_artifacts, CLIENT_KEYSTORE_FILE,
    G2CONFIG_GTC_FILE, LICENSE_FILE, OBSOLETE_FILES, SERVER_KEYSTORE_FILE,
};
pub use backup::{backup_path, write_with_backup, BackupOutcome};
pub use copy::{copy_files, copy_plan, CopyStep, TEMPLATE_FILES};
pub use ownership::{
    change_directory_ownership, change_file_permissions, ownership_roots, permission_plan,
    PermissionRule,
};
