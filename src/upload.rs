//! The uploaded requirements document.
//!
//! The file is read once into memory and forwarded verbatim to the suggestion
//! endpoint; nothing is parsed client side.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::errors::ValidationError;

/// Extensions the upload step accepts.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["doc", "docx", "txt"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl UploadedFile {
    /// Validate an in-memory document.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::MissingFile);
        }
        let extension = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ValidationError::UnsupportedFileType { extension });
        }
        if bytes.is_empty() {
            return Err(ValidationError::EmptyFile);
        }
        let content_type = mime_guess::from_path(&name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        Ok(Self {
            name,
            bytes,
            content_type,
        })
    }

    /// Read a local file. I/O errors surface as `anyhow` context; format
    /// problems as `ValidationError`.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(ValidationError::MissingFile)?
            .to_string();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        Ok(Self::new(name, bytes)?)
    }

    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }

    /// First 12 hex characters of the content's SHA-256, for logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.bytes);
        format!("{:x}", digest)[..12].to_string()
    }
}
