//! Stable message identifiers prefixed to log lines.
//!
//! Index ranges: 1xx info, 3xx warning, 5xx/7xx error, 9xx debug. Operators grep
//! container logs for these, so indices are never reused.

/// Product id embedded in every message identifier.
pub const PRODUCT_ID: &str = "5007";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Debug,
}

impl Severity {
    fn suffix(self) -> char {
        match self {
            Severity::Info => 'I',
            Severity::Warning => 'W',
            Severity::Error => 'E',
            Severity::Debug => 'D',
        }
    }
}

/// `senzing-5007{index:04}{I|W|E|D}`
pub fn id(severity: Severity, index: u16) -> String {
    format!("senzing-{}{:04}{}", PRODUCT_ID, index, severity.suffix())
}

pub fn info(index: u16) -> String {
    id(Severity::Info, index)
}

pub fn warning(index: u16) -> String {
    id(Severity::Warning, index)
}

pub fn error(index: u16) -> String {
    id(Severity::Error, index)
}

pub fn debug(index: u16) -> String {
    id(Severity::Debug, index)
}
