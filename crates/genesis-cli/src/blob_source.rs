use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use genesis_decoder::default_blob;

/// Where the blob being decoded comes from.
pub enum BlobSource {
    /// The constant compiled into this binary.
    Embedded,
    /// A blob file supplied on the command line, whitespace-trimmed.
    File { label: String, text: String },
}

impl BlobSource {
    /// Load `--blob FILE` if given, else fall back to the embedded blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as UTF-8 text.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Embedded);
        };
        let text =
            fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
        tracing::debug!(path = %path.display(), len = text.len(), "loaded blob file");

        Ok(Self::File {
            label: path.display().to_string(),
            text: text.trim().to_string(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Embedded => default_blob(),
            Self::File { text, .. } => text.as_bytes(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Embedded => "<embedded>",
            Self::File { label, .. } => label,
        }
    }
}

/// Number of bytes a padded base64 text decodes to.
///
/// Only meaningful for well-formed input; used for reporting.
pub fn decoded_base64_len(blob: &[u8]) -> usize {
    let padding = blob.iter().rev().take(2).filter(|&&b| b == b'=').count();
    (blob.len() / 4 * 3).saturating_sub(padding)
}
