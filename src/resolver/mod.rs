//! Project file resolver. Turns an uploaded slicer file into a filament mass.
//!
//! # Module structure
//!
//! ```text
//! resolver/
//! ├── archive.rs    — ArchiveReader seam and the zip-backed implementation
//! └── candidates.rs — which archive entries to scan, in priority order
//! ```
//!
//! Single G-code files are scanned whole. Project archives are opened, their
//! entries ranked by [`candidates::select_candidates`], and scanned in order
//! until one yields a positive mass. An entry that cannot be read is logged
//! and skipped; it never aborts the scan.
//!
//! Scanning is CPU-bound (a sliced G-code file can run to hundreds of
//! megabytes), so it runs on the blocking thread pool.

pub mod archive;
pub mod candidates;

use std::path::Path;
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::metadata;

pub use archive::{ArchiveReader, ProjectArchive, ZipArchiveReader};
pub use candidates::select_candidates;

/// The two upload shapes the resolver accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A single plain-text G-code file.
    Gcode,
    /// A packaged project archive (e.g. `.3mf`).
    Archive,
}

/// Failures surfaced by the resolver.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The file extension is neither a text nor an archive format.
    #[error("unsupported file type '{0}'; please use .gcode or .3mf")]
    UnsupportedFormat(String),

    /// The archive opened but holds no entry worth scanning.
    #[error("no readable metadata files found in this project archive")]
    NoMetadataFiles,

    /// Candidates were scanned but none stated a positive mass.
    #[error("{}", not_found_message(.kind))]
    MetadataNotFound { kind: FileKind },

    /// The container itself could not be decoded.
    #[error("cannot read project archive: {0}")]
    ArchiveRead(String),

    /// One archive entry could not be read. Logged and skipped during a scan;
    /// never returned from [`ProjectResolver::resolve`].
    #[error("cannot read archive entry {name}: {message}")]
    EntryRead { name: String, message: String },

    /// Reading the upload from disk, or the scan task itself, failed.
    #[error("{0}")]
    Io(String),
}

fn not_found_message(kind: &FileKind) -> &'static str {
    match kind {
        FileKind::Gcode => "could not find filament mass in G-code",
        FileKind::Archive => "filament info not found in project (was this file sliced and saved?)",
    }
}

/// Classify `file_name` by extension (case-insensitive).
pub fn classify(file_name: &str, config: &ResolverConfig) -> Result<FileKind, ResolveError> {
    let ext = candidates::extension_of(file_name).unwrap_or_default();
    let matches = |list: &Vec<String>| list.iter().any(|e| e.eq_ignore_ascii_case(&ext));

    if !ext.is_empty() && matches(&config.gcode_extensions) {
        Ok(FileKind::Gcode)
    } else if !ext.is_empty() && matches(&config.archive_extensions) {
        Ok(FileKind::Archive)
    } else {
        Err(ResolveError::UnsupportedFormat(if ext.is_empty() {
            file_name.to_string()
        } else {
            format!(".{ext}")
        }))
    }
}

/// Resolves uploads using a shared [`ResolverConfig`] and [`ArchiveReader`].
///
/// Cheap to clone; concurrent resolutions share nothing mutable.
#[derive(Debug)]
pub struct ProjectResolver<R = ZipArchiveReader> {
    config: Arc<ResolverConfig>,
    reader: Arc<R>,
}

impl<R> Clone for ProjectResolver<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            reader: Arc::clone(&self.reader),
        }
    }
}

impl ProjectResolver<ZipArchiveReader> {
    /// A resolver that opens archives as ZIP containers.
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_reader(config, ZipArchiveReader)
    }
}

impl Default for ProjectResolver<ZipArchiveReader> {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl<R: ArchiveReader> ProjectResolver<R> {
    pub fn with_reader(config: ResolverConfig, reader: R) -> Self {
        Self {
            config: Arc::new(config),
            reader: Arc::new(reader),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the filament mass in grams from an upload's name and bytes.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::UnsupportedFormat`] — extension not recognised; the
    ///   bytes are never inspected.
    /// - [`ResolveError::ArchiveRead`] — archive could not be decoded.
    /// - [`ResolveError::NoMetadataFiles`] — archive has nothing to scan.
    /// - [`ResolveError::MetadataNotFound`] — nothing scanned held a mass.
    pub async fn resolve(&self, file_name: &str, bytes: Vec<u8>) -> Result<f64, ResolveError> {
        let kind = classify(file_name, &self.config).inspect_err(|e| {
            tracing::warn!(file = file_name, error = %e, "rejected upload");
        })?;
        tracing::info!(file = file_name, ?kind, size = bytes.len(), "resolving filament mass");

        let config = Arc::clone(&self.config);
        let reader = Arc::clone(&self.reader);
        let result = tokio::task::spawn_blocking(move || match kind {
            FileKind::Gcode => scan_gcode(&bytes),
            FileKind::Archive => scan_archive(&*reader, &config, bytes),
        })
        .await
        .map_err(|e| ResolveError::Io(format!("scan task panicked: {e}")))?;

        match &result {
            Ok(grams) => tracing::info!(file = file_name, grams, "filament mass resolved"),
            Err(e) => tracing::error!(file = file_name, error = %e, "could not resolve filament mass"),
        }
        result
    }

    /// Read `path` from disk and [`resolve`](Self::resolve) it.
    ///
    /// The extension is checked before the file is read.
    pub async fn resolve_file(&self, path: &Path) -> Result<f64, ResolveError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        classify(&file_name, &self.config)?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ResolveError::Io(format!("cannot read {}: {e}", path.display())))?;
        self.resolve(&file_name, bytes).await
    }
}

/// Resolve with the default ZIP reader and resolver config.
pub async fn resolve_project_weight(file_name: &str, bytes: Vec<u8>) -> Result<f64, ResolveError> {
    ProjectResolver::default().resolve(file_name, bytes).await
}

/// Read `path` from disk and resolve it with the default configuration.
pub async fn resolve_project_file(path: &Path) -> Result<f64, ResolveError> {
    ProjectResolver::default().resolve_file(path).await
}

fn scan_gcode(bytes: &[u8]) -> Result<f64, ResolveError> {
    let text = String::from_utf8_lossy(bytes);
    match metadata::extract(&text) {
        Some(found) if found.grams > 0.0 => {
            tracing::debug!(tier = ?found.tier, grams = found.grams, "matched G-code metadata");
            Ok(found.grams)
        }
        _ => Err(ResolveError::MetadataNotFound {
            kind: FileKind::Gcode,
        }),
    }
}

fn scan_archive<R: ArchiveReader>(
    reader: &R,
    config: &ResolverConfig,
    bytes: Vec<u8>,
) -> Result<f64, ResolveError> {
    let mut archive = reader.open(bytes)?;
    let names = archive.entry_names();
    tracing::info!(entries = names.len(), "opened project archive");

    let candidates = select_candidates(&names, config);
    if candidates.is_empty() {
        return Err(ResolveError::NoMetadataFiles);
    }
    tracing::info!(candidates = candidates.len(), "scanning archive entries for filament data");

    for name in &candidates {
        let text = match archive.read_text(name) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(entry = %name, error = %e, "could not read archive entry; skipping");
                continue;
            }
        };
        match metadata::extract(&text) {
            Some(found) if found.grams > 0.0 => {
                tracing::info!(entry = %name, tier = ?found.tier, grams = found.grams, "matched archive entry");
                return Ok(found.grams);
            }
            _ => tracing::debug!(entry = %name, "no filament mass in entry"),
        }
    }

    Err(ResolveError::MetadataNotFound {
        kind: FileKind::Archive,
    })
}
