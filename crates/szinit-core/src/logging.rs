//! Logging init: stderr by default, or an append-only file from `SENZING_LOG_FILE`.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_ENV: &str = "SENZING_LOG_LEVEL";
pub const LOG_FILE_ENV: &str = "SENZING_LOG_FILE";

/// Writer that is either a file or stderr (used when file clone fails).
enum FileOrStderr {
    File(std::fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(std::fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

/// Maps a `SENZING_LOG_LEVEL` value to a filter directive. Unknown values mean `info`.
pub fn level_directive(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "notset" => "trace",
        "debug" => "debug",
        "warning" => "warn",
        "error" | "fatal" | "critical" => "error",
        _ => "info",
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_default();
        EnvFilter::new(level_directive(&level))
    })
}

/// Initialize logging. Writes to `$SENZING_LOG_FILE` when set, otherwise stderr.
/// On failure to open the file, returns Err so the caller can fall back to stderr.
pub fn init_logging() -> Result<()> {
    match std::env::var_os(LOG_FILE_ENV).filter(|v| !v.is_empty()) {
        Some(path) => init_logging_file(Path::new(&path)),
        None => {
            init_logging_stderr();
            Ok(())
        }
    }
}

fn init_logging_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(FileMakeWriter(file)))
        .with_ansi(false)
        .init();

    tracing::debug!("szinit logging to {}", path.display());
    Ok(())
}

/// Initialize logging to stderr only (no file). Use when init_logging() fails so the CLI doesn't crash.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn senzing_levels_map_to_tracing_levels() {
        assert_eq!(level_directive("debug"), "debug");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("critical"), "error");
        assert_eq!(level_directive("fatal"), "error");
        assert_eq!(level_directive("notset"), "trace");
        assert_eq!(level_directive(""), "info");
        assert_eq!(level_directive("verbose"), "info");
    }
}
