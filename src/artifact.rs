use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// The file being patched, held in memory between one read and one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Resolved location; symlinks are followed so writes land on the real file
    path: PathBuf,
    /// Text with `\n` line breaks, whatever the file uses on disk
    content: String,
    line_ending: LineEnding,
    /// xxh3 of the bytes read from disk
    fingerprint: u64,
}

/// Line break convention of the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    Crlf,
}

impl LineEnding {
    /// `Crlf` only when every line break in `text` is `\r\n`. Mixed files are
    /// treated as `Lf` and matched byte for byte.
    pub fn detect(text: &str) -> Self {
        let crlf = text.matches("\r\n").count();
        if crlf > 0 && crlf == text.matches('\n').count() {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }
}

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8: {source}")]
    Utf8 {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    #[error("{path} changed on disk after it was read; refusing to overwrite")]
    ConcurrentModification { path: PathBuf },
}

impl Artifact {
    /// Read the whole file. Fails if it is missing, unreadable or not UTF-8.
    ///
    /// CRLF files are normalized to `\n` in memory and written back as CRLF.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PatchError> {
        let given = path.as_ref();
        let path = fs::canonicalize(given).map_err(|source| PatchError::Read {
            path: given.to_path_buf(),
            source,
        })?;
        let bytes = fs::read(&path).map_err(|source| PatchError::Read {
            path: path.clone(),
            source,
        })?;
        let fingerprint = xxh3_64(&bytes);
        let raw = String::from_utf8(bytes).map_err(|source| PatchError::Utf8 {
            path: path.clone(),
            source,
        })?;

        let line_ending = LineEnding::detect(&raw);
        let content = match line_ending {
            LineEnding::Crlf => raw.replace("\r\n", "\n"),
            LineEnding::Lf => raw,
        };

        log::debug!(
            "loaded {} ({} bytes, {line_ending:?}, xxh3 {fingerprint:016x})",
            path.display(),
            content.len()
        );

        Ok(Self {
            path,
            content,
            line_ending,
            fingerprint,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Overwrite the file with `content`.
    ///
    /// The file is re-read first; if it no longer hashes to the fingerprint
    /// taken at load time the write is refused.
    pub fn persist(&self, content: &str) -> Result<(), PatchError> {
        let current = fs::read(&self.path).map_err(|source| PatchError::Read {
            path: self.path.clone(),
            source,
        })?;
        if xxh3_64(&current) != self.fingerprint {
            return Err(PatchError::ConcurrentModification {
                path: self.path.clone(),
            });
        }

        let encoded = match self.line_ending {
            LineEnding::Crlf => Cow::Owned(content.replace('\n', "\r\n")),
            LineEnding::Lf => Cow::Borrowed(content),
        };

        atomic_write(&self.path, encoded.as_bytes()).map_err(|source| PatchError::Write {
            path: self.path.clone(),
            source,
        })?;

        // Bump mtime so file watchers and incremental builds notice the change
        filetime::set_file_mtime(&self.path, filetime::FileTime::now()).map_err(|source| {
            PatchError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        log::info!("wrote {} ({} bytes)", self.path.display(), encoded.len());
        Ok(())
    }
}

/// Atomic file write: tempfile + fsync + rename, keeping the original permissions.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // Same directory, so the rename stays on one filesystem
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let permissions = fs::metadata(path)?.permissions();

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), permissions)?;

    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
