use std::io;

/// Errors raised while unwrapping a genesis blob.
///
/// Both kinds are terminal. The stream that produced one is poisoned and
/// keeps returning it; there is no local recovery or retry.
///
/// ```text
///   GenesisError
///   ├── Encoding        ← invalid base64 symbol, bad padding, empty source
///   └── Decompression   ← gzip header, deflate body, CRC32/ISIZE trailer,
///                         trailing data, decoded size limit
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenesisError {
    /// The base64 stage rejected its input.
    ///
    /// `position` is the absolute index of the offending symbol in the
    /// blob when the base64 decoder can pin one down (invalid byte or
    /// invalid last symbol). Padding and length failures leave it `None`.
    #[error("genesis blob is not valid base64{}: {reason}", fmt_position(.position.as_ref()))]
    Encoding {
        position: Option<usize>,
        reason: String,
    },

    /// The gzip stage rejected the decoded bytes.
    ///
    /// `offset` counts the decompressed bytes delivered to the caller
    /// before the failure surfaced.
    #[error("genesis blob failed to decompress after {offset} bytes: {reason}")]
    Decompression { offset: u64, reason: String },
}

fn fmt_position(position: Option<&usize>) -> String {
    position.map_or_else(String::new, |p| format!(" at symbol {p}"))
}

impl GenesisError {
    pub(crate) fn empty_source() -> Self {
        Self::Encoding {
            position: Some(0),
            reason: "source is empty".to_string(),
        }
    }

    /// Whether this is a base64 stage failure.
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }

    /// Whether this is a gzip stage failure.
    #[must_use]
    pub fn is_decompression(&self) -> bool {
        matches!(self, Self::Decompression { .. })
    }

    /// Classify an I/O error surfaced by the gzip stage.
    ///
    /// Errors raised by the base64 stage travel through the gzip stage
    /// untouched, carrying a `GenesisError` payload; they are recovered
    /// as-is. Anything else originated in the gzip stage itself.
    pub(crate) fn classify(err: &io::Error, offset: u64) -> Self {
        match err.get_ref().and_then(|inner| inner.downcast_ref::<Self>()) {
            Some(typed) => typed.clone(),
            None => Self::Decompression {
                offset,
                reason: err.to_string(),
            },
        }
    }
}

/// Recover the typed error from an `io::Error` returned by
/// [`GenesisStream`](crate::GenesisStream)'s `Read` implementation.
///
/// I/O errors that do not carry a `GenesisError` are reported as
/// decompression failures at offset 0.
impl From<io::Error> for GenesisError {
    fn from(err: io::Error) -> Self {
        Self::classify(&err, 0)
    }
}

impl From<GenesisError> for io::Error {
    fn from(err: GenesisError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

/// The decoded document does not look like a JSON object.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("document is empty")]
    Empty,

    #[error("document is not valid UTF-8 (first bad byte at {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("document must start with '{{', found {found:?}")]
    MissingOpenBrace { found: char },

    #[error("document must end with '}}', found {found:?}")]
    MissingCloseBrace { found: char },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_display_includes_position() {
        let err = GenesisError::Encoding {
            position: Some(42),
            reason: "Invalid symbol 33, offset 42.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "genesis blob is not valid base64 at symbol 42: Invalid symbol 33, offset 42."
        );
    }

    #[test]
    fn encoding_display_without_position() {
        let err = GenesisError::Encoding {
            position: None,
            reason: "Invalid padding".to_string(),
        };
        assert_eq!(err.to_string(), "genesis blob is not valid base64: Invalid padding");
    }

    #[test]
    fn typed_error_survives_io_round_trip() {
        let original = GenesisError::Decompression {
            offset: 7,
            reason: "corrupt deflate stream".to_string(),
        };
        let io_err: io::Error = original.clone().into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(GenesisError::from(io_err), original);
    }

    #[test]
    fn foreign_io_error_is_decompression() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "early eof");
        let err = GenesisError::classify(&io_err, 128);
        assert!(err.is_decompression());
        assert!(matches!(err, GenesisError::Decompression { offset: 128, .. }));
    }

    #[test]
    fn empty_source_is_encoding() {
        assert!(GenesisError::empty_source().is_encoding());
    }
}
