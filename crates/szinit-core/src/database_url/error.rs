//! Error and warning types for database URL translation.

use std::fmt;

/// Failure to translate a generic database URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseUrlError {
    /// More distinct unsafe characters than free safe stand-ins.
    #[error(
        "not enough safe characters to translate the database URL \
         (unsafe: {unsafe_characters:?}, available: {safe_characters:?})"
    )]
    Translation {
        unsafe_characters: Vec<char>,
        safe_characters: Vec<char>,
    },
    /// Scheme has no driver-specific rendering. `url` has credentials masked.
    #[error("unknown database scheme '{scheme}' in database url '{url}'")]
    UnknownScheme { scheme: String, url: String },
}

/// Recomposed URL differs from the input; the parsed values are best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripWarning {
    pub original: String,
    pub reconstructed: String,
}

impl fmt::Display for RoundTripWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Original and new database URLs do not match. Original URL: {}; Reconstructed URL: {}",
            self.original, self.reconstructed
        )
    }
}
