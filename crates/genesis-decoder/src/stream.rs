use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::mem;

use flate2::bufread::GzDecoder;

use crate::base64_stage::Base64Stage;
use crate::blob::default_blob;
use crate::config::DecoderConfig;
use crate::error::GenesisError;

/// Gzip member metadata, available once the header has been parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GzipMember {
    /// Original file name recorded by the compressor (FNAME), if any.
    pub file_name: Option<String>,
    /// Modification time recorded by the compressor, seconds since epoch.
    pub mtime: u32,
}

/// Lazily decoding byte stream over a genesis blob.
///
/// Two read filters are stacked over the blob and driven by the caller's
/// reads:
///
/// ```text
///   &[u8] blob ──▶ Base64Stage ──▶ BufReader (window) ──▶ GzDecoder ──▶ caller
/// ```
///
/// Nothing is pulled from the blob until the first [`read`](Read::read).
/// Corruption is reported on the read that reaches it, not at open time.
/// Each stream owns its decoding state; streams opened over the same blob
/// share nothing mutable and may be read from different threads.
///
/// Lifecycle:
///
/// ```text
///   Pending ──first read──▶ Inflating ──end verified──▶ Done
///                               │
///                               └──────error──────────▶ Failed (poisoned)
/// ```
///
/// Entering `Done` or `Failed` drops the decoding state. A failed stream
/// keeps returning its error and never reports a clean end-of-stream.
///
/// # Example
///
/// ```rust
/// use std::io::Read;
///
/// let mut stream = genesis_decoder::open_default_genesis().unwrap();
/// let mut head = [0u8; 9];
/// stream.read_exact(&mut head).unwrap();
/// assert_eq!(&head, b"{\"nonce\":");
/// ```
pub struct GenesisStream<'a> {
    state: StreamState<'a>,
    config: DecoderConfig,
    produced: u64,
    member: Option<GzipMember>,
}

enum StreamState<'a> {
    Pending(BufReader<Base64Stage<'a>>),
    Inflating(GzDecoder<BufReader<Base64Stage<'a>>>),
    Done,
    Failed(GenesisError),
}

impl StreamState<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::Pending(_) => "pending",
            Self::Inflating(_) => "inflating",
            Self::Done => "done",
            Self::Failed(_) => "failed",
        }
    }
}

/// Open a stream over the genesis blob embedded in this binary.
///
/// # Errors
///
/// Returns [`GenesisError::Encoding`] if the embedded constant is empty.
/// All other failures surface from the stream's reads.
pub fn open_default_genesis() -> Result<GenesisStream<'static>, GenesisError> {
    open_genesis(default_blob())
}

/// Open a stream over an arbitrary blob using the default configuration.
///
/// # Errors
///
/// Returns [`GenesisError::Encoding`] if `blob` is empty.
pub fn open_genesis(blob: &[u8]) -> Result<GenesisStream<'_>, GenesisError> {
    open_genesis_with(blob, &DecoderConfig::default())
}

/// Open a stream over `blob` with explicit tuning.
///
/// # Errors
///
/// Returns [`GenesisError::Encoding`] if `blob` is empty. An empty blob
/// is malformed input, not a valid empty document.
pub fn open_genesis_with<'a>(
    blob: &'a [u8],
    config: &DecoderConfig,
) -> Result<GenesisStream<'a>, GenesisError> {
    if blob.is_empty() {
        tracing::warn!("refusing to open an empty genesis blob");
        return Err(GenesisError::empty_source());
    }

    tracing::debug!(blob_len = blob.len(), window = config.window(), "opening genesis stream");
    let window = BufReader::with_capacity(config.window(), Base64Stage::new(blob));

    Ok(GenesisStream {
        state: StreamState::Pending(window),
        config: config.clone(),
        produced: 0,
        member: None,
    })
}

/// Decode the embedded genesis blob into memory.
///
/// # Errors
///
/// Any [`GenesisError`] raised while opening or draining the stream.
pub fn read_default_genesis() -> Result<Vec<u8>, GenesisError> {
    open_default_genesis()?.read_all()
}

impl GenesisStream<'_> {
    /// Drain the stream into a buffer.
    ///
    /// # Errors
    ///
    /// The first [`GenesisError`] encountered while reading.
    pub fn read_all(mut self) -> Result<Vec<u8>, GenesisError> {
        let mut out = Vec::new();
        self.read_to_end(&mut out).map_err(GenesisError::from)?;
        Ok(out)
    }

    /// Decompressed bytes delivered so far.
    #[must_use]
    pub fn decoded_len(&self) -> u64 {
        self.produced
    }

    /// Whether end-of-stream has been reached and verified.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, StreamState::Done)
    }

    /// Gzip header metadata, once the header has been parsed.
    #[must_use]
    pub fn member(&self) -> Option<&GzipMember> {
        self.member.as_ref()
    }

    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, GenesisError> {
        if let StreamState::Failed(err) = &self.state {
            return Err(err.clone());
        }
        if buf.is_empty() {
            return Ok(0);
        }
        if matches!(self.state, StreamState::Pending(_)) {
            self.start();
        }

        let StreamState::Inflating(gz) = &mut self.state else {
            return Ok(0);
        };

        // Never hand the caller bytes past the limit. Once it is reached,
        // probe for one more byte in scratch space instead.
        let remaining = self
            .config
            .max_decoded_size
            .map(|limit| limit.saturating_sub(self.produced));
        let read = match remaining {
            Some(0) => gz.read(&mut [0u8; 1]),
            Some(left) => {
                let cap = usize::try_from(left).map_or(buf.len(), |left| left.min(buf.len()));
                gz.read(&mut buf[..cap])
            }
            None => gz.read(buf),
        };

        match read {
            Ok(0) => {
                self.finish()?;
                Ok(0)
            }
            Ok(n) => {
                self.capture_member();
                if let (Some(0), Some(limit)) = (remaining, self.config.max_decoded_size) {
                    return Err(self.fail(GenesisError::Decompression {
                        offset: self.produced,
                        reason: format!("decoded size exceeds limit of {limit} bytes"),
                    }));
                }
                self.produced += n as u64;
                Ok(n)
            }
            Err(err) => Err(self.fail(GenesisError::classify(&err, self.produced))),
        }
    }

    fn start(&mut self) {
        if let StreamState::Pending(window) = mem::replace(&mut self.state, StreamState::Done) {
            self.state = StreamState::Inflating(GzDecoder::new(window));
        }
    }

    fn capture_member(&mut self) {
        if self.member.is_some() {
            return;
        }
        if let StreamState::Inflating(gz) = &self.state {
            self.member = gz.header().map(|header| GzipMember {
                file_name: header
                    .filename()
                    .map(|name| String::from_utf8_lossy(name).into_owned()),
                mtime: header.mtime(),
            });
        }
    }

    /// The gzip trailer has been verified; check what follows it.
    fn finish(&mut self) -> Result<(), GenesisError> {
        self.capture_member();

        if !self.config.allow_trailing_data {
            if let StreamState::Inflating(gz) = &mut self.state {
                match gz.get_mut().fill_buf() {
                    Ok([]) => {}
                    Ok(rest) => {
                        let reason = format!("{} bytes of trailing data after gzip member", rest.len());
                        return Err(self.fail(GenesisError::Decompression {
                            offset: self.produced,
                            reason,
                        }));
                    }
                    Err(err) => {
                        let err = GenesisError::classify(&err, self.produced);
                        return Err(self.fail(err));
                    }
                }
            }
        }

        tracing::debug!(decoded_len = self.produced, "genesis stream exhausted");
        self.state = StreamState::Done;
        Ok(())
    }

    fn fail(&mut self, err: GenesisError) -> GenesisError {
        tracing::warn!(error = %err, decoded_len = self.produced, "genesis stream failed");
        self.state = StreamState::Failed(err.clone());
        err
    }
}

impl Read for GenesisStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.pull(buf).map_err(io::Error::from)
    }
}

impl fmt::Debug for GenesisStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenesisStream")
            .field("state", &self.state.name())
            .field("produced", &self.produced)
            .field("member", &self.member)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    const GENESIS_LEN: usize = 46_084;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn default_genesis_decodes_to_json_object() {
        let doc = read_default_genesis().unwrap();
        assert_eq!(doc.len(), GENESIS_LEN);
        assert!(doc.starts_with(b"{\"nonce\":\"0x0000000000000042\""));
        assert!(doc.ends_with(b"\"gasLimit\":\"0x300000\"}"));
    }

    #[test]
    fn single_byte_reads_match_bulk_read() {
        let bulk = read_default_genesis().unwrap();

        let mut stream = open_default_genesis().unwrap();
        let mut byte = [0u8; 1];
        let mut trickle = Vec::with_capacity(bulk.len());
        loop {
            match stream.read(&mut byte).unwrap() {
                0 => break,
                n => trickle.extend_from_slice(&byte[..n]),
            }
        }

        assert_eq!(trickle, bulk);
        assert!(stream.is_finished());
        assert_eq!(stream.decoded_len(), bulk.len() as u64);
    }

    #[test]
    fn tiny_window_still_decodes() {
        let config = DecoderConfig {
            buffer_capacity: 0,
            ..DecoderConfig::default()
        };
        let doc = open_genesis_with(default_blob(), &config)
            .unwrap()
            .read_all()
            .unwrap();
        assert_eq!(doc.len(), GENESIS_LEN);
    }

    #[test]
    fn member_header_is_exposed() {
        let mut stream = open_default_genesis().unwrap();
        assert!(stream.member().is_none());

        let mut head = [0u8; 16];
        stream.read_exact(&mut head).unwrap();

        let member = stream.member().unwrap();
        assert_eq!(member.file_name.as_deref(), Some("gen.txt"));
        assert_eq!(member.mtime, 1_459_271_114);
    }

    #[test]
    fn open_is_lazy() {
        // Not even base64; still opens, fails on first read.
        let mut stream = open_genesis(b"!!!!").unwrap();
        let mut buf = [0u8; 8];
        let err = GenesisError::from(stream.read(&mut buf).unwrap_err());
        assert!(err.is_encoding(), "unexpected error: {err:?}");
    }

    #[test]
    fn empty_blob_is_rejected_at_open() {
        let err = open_genesis(b"").unwrap_err();
        assert_eq!(err, GenesisError::empty_source());
    }

    #[test]
    fn failed_stream_stays_failed() {
        let blob = STANDARD.encode(b"definitely not gzip");
        let mut stream = open_genesis(blob.as_bytes()).unwrap();
        let mut buf = [0u8; 64];

        let first = GenesisError::from(stream.read(&mut buf).unwrap_err());
        assert!(first.is_decompression(), "unexpected error: {first:?}");

        for _ in 0..3 {
            let again = GenesisError::from(stream.read(&mut buf).unwrap_err());
            assert_eq!(again, first);
        }
        assert!(!stream.is_finished());
    }

    #[test]
    fn zero_length_read_does_not_advance() {
        let mut stream = open_default_genesis().unwrap();
        assert_eq!(stream.read(&mut []).unwrap(), 0);
        assert!(!stream.is_finished());
        assert_eq!(stream.read_all().unwrap().len(), GENESIS_LEN);
    }

    #[test]
    fn size_limit_trips_as_decompression_error() {
        let config = DecoderConfig {
            max_decoded_size: Some(1024),
            ..DecoderConfig::default()
        };
        let err = open_genesis_with(default_blob(), &config)
            .unwrap()
            .read_all()
            .unwrap_err();
        assert!(err.is_decompression(), "unexpected error: {err:?}");
    }

    #[test]
    fn size_limit_never_delivers_bytes_past_the_limit() {
        let config = DecoderConfig {
            max_decoded_size: Some(100),
            ..DecoderConfig::default()
        };
        let mut stream = open_genesis_with(default_blob(), &config).unwrap();

        let mut delivered = Vec::new();
        let mut buf = [0u8; 4096];
        while delivered.len() < 100 {
            let n = stream.read(&mut buf).unwrap();
            assert!(n > 0);
            delivered.extend_from_slice(&buf[..n]);
        }
        assert_eq!(delivered.len(), 100);
        assert_eq!(stream.decoded_len(), 100);

        // The read that trips the limit leaves the caller's buffer untouched.
        let mut sentinel = [0xAAu8; 4096];
        let err = GenesisError::from(stream.read(&mut sentinel).unwrap_err());
        assert!(
            matches!(&err, GenesisError::Decompression { offset: 100, .. }),
            "unexpected error: {err:?}"
        );
        assert!(sentinel.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn trailing_data_is_rejected_by_default() {
        let mut raw = gzip(b"{\"nonce\":\"0x42\"}");
        raw.extend_from_slice(b"junk");
        let blob = STANDARD.encode(&raw);

        let err = open_genesis(blob.as_bytes()).unwrap().read_all().unwrap_err();
        assert!(
            matches!(&err, GenesisError::Decompression { offset: 16, reason } if reason.contains("trailing")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn trailing_data_can_be_tolerated() {
        let mut raw = gzip(b"{\"nonce\":\"0x42\"}");
        raw.extend_from_slice(b"junk");
        let blob = STANDARD.encode(&raw);
        let config = DecoderConfig {
            allow_trailing_data: true,
            ..DecoderConfig::default()
        };

        let doc = open_genesis_with(blob.as_bytes(), &config)
            .unwrap()
            .read_all()
            .unwrap();
        assert_eq!(doc, b"{\"nonce\":\"0x42\"}");
    }

    #[test]
    fn encoder_output_round_trips() {
        let doc = br#"{"alloc":{},"gasLimit":"0x1388"}"#;
        let blob = genesis_encoder::pack(doc).unwrap();
        let decoded = open_genesis(blob.as_bytes()).unwrap().read_all().unwrap();
        assert_eq!(decoded, doc);
    }
}
