/// Errors that can occur while packing a genesis document into a blob.
///
/// ```text
///   EncodeError
///   ├── EmptyDocument        ← nothing to compress
///   ├── InvalidLevel         ← gzip level outside 0..=9
///   ├── InvalidFileName      ← FNAME contains a NUL byte
///   └── Io(std::io::Error)   ← from the gzip or base64 writers
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// An empty blob is rejected by the decoder, so it is never produced.
    #[error("genesis document is empty")]
    EmptyDocument,

    #[error("gzip level {level} is out of range (expected 0..=9)")]
    InvalidLevel { level: u32 },

    /// FNAME is NUL-terminated in the gzip header.
    #[error("gzip file name {name:?} contains a NUL byte")]
    InvalidFileName { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
