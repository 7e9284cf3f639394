use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderStringWriter;
use flate2::{Compression, GzBuilder};

use crate::error::EncodeError;

/// Highest gzip level accepted by [`PackOptions::level`].
pub const MAX_LEVEL: u32 = 9;

/// How a genesis document is compressed before encoding.
///
/// ```text
/// ┌───────────┬──────────────────────────────────────────────────────┐
/// │ Field     │ Effect                                               │
/// ├───────────┼──────────────────────────────────────────────────────┤
/// │ level     │ Deflate level, 0 (store) to 9 (best, default)        │
/// │ file_name │ FNAME recorded in the gzip header (none by default)  │
/// │ mtime     │ MTIME recorded in the gzip header (0 = unknown)      │
/// └───────────┴──────────────────────────────────────────────────────┘
/// ```
///
/// Leaving `mtime` at zero keeps the output reproducible for a given
/// document and level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackOptions {
    pub level: u32,
    pub file_name: Option<String>,
    pub mtime: u32,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            level: MAX_LEVEL,
            file_name: None,
            mtime: 0,
        }
    }
}

/// Pack a genesis document into a blob with [`PackOptions::default`].
///
/// # Errors
///
/// See [`pack_with`].
pub fn pack(document: &[u8]) -> Result<String, EncodeError> {
    pack_with(document, &PackOptions::default())
}

/// Pack a genesis document into a blob: one gzip member (RFC 1952),
/// then standard padded base64 (RFC 4648 §4). This is the exact inverse
/// of the decoder's pipeline.
///
/// # Example
///
/// ```rust
/// let blob = genesis_encoder::pack(br#"{"nonce":"0x42"}"#).unwrap();
/// assert!(blob.starts_with("H4sI"));
/// ```
///
/// # Errors
///
/// - [`EncodeError::EmptyDocument`] if `document` is empty.
/// - [`EncodeError::InvalidLevel`] if `options.level` exceeds 9.
/// - [`EncodeError::InvalidFileName`] if `options.file_name` contains NUL.
/// - [`EncodeError::Io`] if the gzip or base64 writer fails.
pub fn pack_with(document: &[u8], options: &PackOptions) -> Result<String, EncodeError> {
    if document.is_empty() {
        return Err(EncodeError::EmptyDocument);
    }
    if options.level > MAX_LEVEL {
        return Err(EncodeError::InvalidLevel {
            level: options.level,
        });
    }

    let mut builder = GzBuilder::new().mtime(options.mtime);
    if let Some(name) = &options.file_name {
        if name.contains('\0') {
            return Err(EncodeError::InvalidFileName { name: name.clone() });
        }
        builder = builder.filename(name.as_bytes());
    }

    let mut gz = builder.write(
        EncoderStringWriter::new(&STANDARD),
        Compression::new(options.level),
    );
    gz.write_all(document)?;
    let blob = gz.finish()?.into_inner();

    tracing::debug!(
        document_len = document.len(),
        blob_len = blob.len(),
        level = options.level,
        "packed genesis document"
    );
    Ok(blob)
}
