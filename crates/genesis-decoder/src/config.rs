/// Default size of the window between the base64 and gzip stages.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// Default upper bound on decompressed output (16 MiB).
///
/// The shipped genesis decodes to well under 100 KiB; the limit only
/// matters for blobs supplied from outside the binary.
pub const DEFAULT_MAX_DECODED_SIZE: u64 = 16 * 1024 * 1024;

/// Tuning knobs for a [`GenesisStream`](crate::GenesisStream).
///
/// ```text
/// ┌─────────────────────┬──────────────────────────────────────────────┐
/// │ Field               │ Purpose                                      │
/// ├─────────────────────┼──────────────────────────────────────────────┤
/// │ buffer_capacity     │ Bytes buffered between base64 and gzip       │
/// │ max_decoded_size    │ Decompression bomb guard (None = unbounded)  │
/// │ allow_trailing_data │ Tolerate bytes after the gzip trailer        │
/// └─────────────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Capacity of the buffered window feeding the gzip stage. Peak memory
    /// of a stream is this window plus the inflater's fixed 32 KiB history.
    /// Zero is treated as one.
    pub buffer_capacity: usize,

    /// Fail with a decompression error once more than this many bytes
    /// have been produced.
    pub max_decoded_size: Option<u64>,

    /// When `false`, any bytes left after the first gzip member's trailer
    /// fail the stream at end-of-stream.
    pub allow_trailing_data: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_decoded_size: Some(DEFAULT_MAX_DECODED_SIZE),
            allow_trailing_data: false,
        }
    }
}

impl DecoderConfig {
    pub(crate) fn window(&self) -> usize {
        self.buffer_capacity.max(1)
    }
}
