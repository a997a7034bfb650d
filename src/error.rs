//! Application-level error type returned by all command handlers.
//!
//! `AppError` is serialized to `{ kind, message }` JSON payloads so a
//! frontend can pattern-match on a stable `kind` string.

use crate::config::ConfigError;
use crate::resolver::ResolveError;

/// Top-level error returned by command handlers.
///
/// Serialized with serde's adjacently-tagged representation:
/// `{ "kind": "<variant>", "message": "<human-readable text>" }`
#[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AppError {
    /// The uploaded file is neither G-code nor a project archive.
    #[error("{0}")]
    UnsupportedFormat(String),

    /// The project archive holds no entry worth scanning.
    #[error("{0}")]
    NoMetadataFiles(String),

    /// The file was scanned but states no filament mass.
    #[error("{0}")]
    MetadataNotFound(String),

    /// The project archive itself could not be decoded.
    #[error("{0}")]
    ArchiveRead(String),

    /// A generic I/O error, stringified so it stays serializable.
    #[error("{0}")]
    Io(String),

    /// The engine configuration could not be loaded.
    #[error("{0}")]
    Config(String),

    /// A requested resource (plate, etc.) was not found.
    #[error("{0}")]
    NotFound(String),

    /// The request is well-formed but not allowed in the current state.
    #[error("{0}")]
    InvalidInput(String),
}

impl AppError {
    /// The same error with its message shortened to `max_chars` for display.
    pub fn truncated(self, max_chars: usize) -> Self {
        let cut = |m: String| truncate_message(&m, max_chars);
        match self {
            Self::UnsupportedFormat(m) => Self::UnsupportedFormat(cut(m)),
            Self::NoMetadataFiles(m) => Self::NoMetadataFiles(cut(m)),
            Self::MetadataNotFound(m) => Self::MetadataNotFound(cut(m)),
            Self::ArchiveRead(m) => Self::ArchiveRead(cut(m)),
            Self::Io(m) => Self::Io(cut(m)),
            Self::Config(m) => Self::Config(cut(m)),
            Self::NotFound(m) => Self::NotFound(cut(m)),
            Self::InvalidInput(m) => Self::InvalidInput(cut(m)),
        }
    }

    /// Display text shortened to `max_chars`.
    pub fn display_message(&self, max_chars: usize) -> String {
        truncate_message(&self.to_string(), max_chars)
    }
}

/// Shorten `message` to at most `max_chars` characters, ending in `...` when
/// anything was cut. Counts `char`s, so multi-byte text is never split.
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    if max_chars < 3 {
        return message.chars().take(max_chars).collect();
    }
    let mut out: String = message.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}

impl From<ResolveError> for AppError {
    /// Map each resolver failure onto its own `kind`, keeping the
    /// resolver's wording as the message.
    fn from(e: ResolveError) -> Self {
        let message = e.to_string();
        match e {
            ResolveError::UnsupportedFormat(_) => Self::UnsupportedFormat(message),
            ResolveError::NoMetadataFiles => Self::NoMetadataFiles(message),
            ResolveError::MetadataNotFound { .. } => Self::MetadataNotFound(message),
            ResolveError::ArchiveRead(_) | ResolveError::EntryRead { .. } => {
                Self::ArchiveRead(message)
            }
            ResolveError::Io(_) => Self::Io(message),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    /// Convert an [`std::io::Error`] into an [`AppError::Io`].
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
