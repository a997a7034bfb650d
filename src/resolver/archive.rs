//! Archive access for packaged project files.
//!
//! The resolver only needs two things from a container: the list of entry
//! names and a way to read one entry as text. [`ArchiveReader`] captures
//! that, so tests (or another container format) can stand in for the
//! `zip`-backed [`ZipArchiveReader`].

use std::io::{Cursor, Read};

use super::ResolveError;

/// Opens raw archive bytes.
///
/// Implementations must be shareable across threads: the resolver runs the
/// scan on the blocking thread pool.
pub trait ArchiveReader: Send + Sync + 'static {
    type Archive: ProjectArchive;

    /// Decode the container. Fails with [`ResolveError::ArchiveRead`] on
    /// corrupt or foreign input.
    fn open(&self, bytes: Vec<u8>) -> Result<Self::Archive, ResolveError>;
}

/// An opened archive.
pub trait ProjectArchive {
    /// File entry names in archive order. Directory entries are omitted.
    fn entry_names(&self) -> Vec<String>;

    /// Read entry `name` as text. Invalid UTF-8 is replaced, not rejected.
    /// Fails with [`ResolveError::EntryRead`].
    fn read_text(&mut self, name: &str) -> Result<String, ResolveError>;
}

/// [`ArchiveReader`] for ZIP containers (`.3mf` projects are ZIP files).
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiveReader;

/// An in-memory ZIP archive opened by [`ZipArchiveReader`].
pub struct ZipProjectArchive {
    inner: zip::ZipArchive<Cursor<Vec<u8>>>,
}

impl ArchiveReader for ZipArchiveReader {
    type Archive = ZipProjectArchive;

    fn open(&self, bytes: Vec<u8>) -> Result<ZipProjectArchive, ResolveError> {
        let inner = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ResolveError::ArchiveRead(format!("not a valid ZIP archive: {e}")))?;
        Ok(ZipProjectArchive { inner })
    }
}

impl ProjectArchive for ZipProjectArchive {
    fn entry_names(&self) -> Vec<String> {
        self.inner
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect()
    }

    fn read_text(&mut self, name: &str) -> Result<String, ResolveError> {
        let entry_err = |message: String| ResolveError::EntryRead {
            name: name.to_string(),
            message,
        };

        let mut entry = self.inner.by_name(name).map_err(|e| entry_err(e.to_string()))?;
        let mut buf = Vec::new();
        entry
            .read_to_end(&mut buf)
            .map_err(|e| entry_err(e.to_string()))?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
