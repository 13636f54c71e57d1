//! Input resolution: validate a user-supplied PDF path, or stage uploaded
//! bytes in a temp file.
//!
//! pdfium wants a file-system path. Bytes that arrive in memory are written
//! to a [`NamedTempFile`] that lives as long as the [`ResolvedInput`], so the
//! file is removed once extraction is done. The `%PDF` magic bytes are checked
//! up front so callers get a meaningful error rather than a pdfium failure.

use crate::error::Pdf2McqError;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// A PDF ready for extraction.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input arrived as bytes; staged in a temp file deleted on drop.
    Staged(NamedTempFile),
}

impl ResolvedInput {
    /// Path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Staged(tmp) => tmp.path(),
        }
    }
}

/// Validate a local PDF path: it must exist, be readable and carry the PDF
/// magic bytes.
pub fn resolve_local(path: impl AsRef<Path>) -> Result<ResolvedInput, Pdf2McqError> {
    let path = path.as_ref().to_path_buf();

    if !path.exists() {
        return Err(Pdf2McqError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(f) => {
            let mut head = Vec::with_capacity(PDF_MAGIC.len());
            f.take(PDF_MAGIC.len() as u64)
                .read_to_end(&mut head)
                .map_err(|e| Pdf2McqError::Internal(format!("read {}: {e}", path.display())))?;
            if head.as_slice() != PDF_MAGIC {
                return Err(Pdf2McqError::NotAPdf {
                    magic: magic_of(&head),
                    path,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2McqError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2McqError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Stage in-memory PDF bytes in a temp file.
pub fn stage_bytes(bytes: &[u8]) -> Result<ResolvedInput, Pdf2McqError> {
    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| Pdf2McqError::Internal(format!("tempfile: {e}")))?;

    if !bytes.starts_with(PDF_MAGIC) {
        return Err(Pdf2McqError::NotAPdf {
            path: tmp.path().to_path_buf(),
            magic: magic_of(bytes),
        });
    }

    tmp.write_all(bytes)
        .map_err(|e| Pdf2McqError::Internal(format!("tempfile write: {e}")))?;
    tmp.flush()
        .map_err(|e| Pdf2McqError::Internal(format!("tempfile flush: {e}")))?;

    debug!("Staged {} uploaded bytes at {}", bytes.len(), tmp.path().display());
    Ok(ResolvedInput::Staged(tmp))
}

/// First four bytes of `head`, zero-padded when shorter.
fn magic_of(head: &[u8]) -> [u8; 4] {
    let mut magic = [0u8; 4];
    let n = head.len().min(magic.len());
    magic[..n].copy_from_slice(&head[..n]);
    magic
}
