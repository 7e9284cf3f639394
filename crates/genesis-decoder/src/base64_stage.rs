use std::io::{self, Read};

use base64::DecodeError;
use base64::engine::GeneralPurpose;
use base64::engine::general_purpose::STANDARD;
use base64::read::DecoderReader;

use crate::error::GenesisError;

/// Standard alphabet, canonical padding required (RFC 4648 §4).
static ENGINE: GeneralPurpose = STANDARD;

/// First stage of the pipeline: pulls base64 symbols from the blob and
/// yields the decoded bytes.
///
/// Decoding is incremental. A corrupt symbol is only reported once the
/// read cursor reaches it. Failures leave this stage as an `io::Error`
/// carrying a [`GenesisError::Encoding`], so they can be told apart
/// from gzip failures after passing through the next stage.
pub(crate) struct Base64Stage<'a> {
    inner: DecoderReader<'static, GeneralPurpose, &'a [u8]>,
}

impl<'a> Base64Stage<'a> {
    pub(crate) fn new(blob: &'a [u8]) -> Self {
        Self {
            inner: DecoderReader::new(blob, &ENGINE),
        }
    }
}

impl Read for Base64Stage<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).map_err(|err| encoding_error(&err).into())
    }
}

fn encoding_error(err: &io::Error) -> GenesisError {
    let decode_err = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<DecodeError>());

    let position = match decode_err {
        Some(DecodeError::InvalidByte(offset, _) | DecodeError::InvalidLastSymbol(offset, _)) => {
            Some(*offset)
        }
        _ => None,
    };

    GenesisError::Encoding {
        position,
        reason: decode_err.map_or_else(|| err.to_string(), ToString::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(blob: &[u8]) -> Result<Vec<u8>, GenesisError> {
        let mut out = Vec::new();
        Base64Stage::new(blob)
            .read_to_end(&mut out)
            .map_err(GenesisError::from)?;
        Ok(out)
    }

    #[test]
    fn decodes_padded_input() {
        assert_eq!(drain(b"aGVsbG8=").unwrap(), b"hello");
        assert_eq!(drain(b"aGk=").unwrap(), b"hi");
        assert_eq!(drain(b"").unwrap(), b"");
    }

    #[test]
    fn invalid_symbol_reports_absolute_position() {
        // '!' sits at index 9, inside the third quad.
        let err = drain(b"aGVsbG8gd!9ybGQ=").unwrap_err();
        assert!(
            matches!(err, GenesisError::Encoding { position: Some(9), .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn missing_padding_is_rejected() {
        let err = drain(b"aGk").unwrap_err();
        assert!(err.is_encoding(), "unexpected error: {err:?}");
    }

    #[test]
    fn whitespace_is_not_part_of_the_alphabet() {
        let err = drain(b"aGVs\nbG8=").unwrap_err();
        assert!(err.is_encoding(), "unexpected error: {err:?}");
    }
}
