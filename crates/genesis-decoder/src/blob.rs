/// The default genesis specification, gzip-compressed and base64-encoded.
///
/// The asset is baked into the binary at build time and is never mutated.
/// It decodes to a UTF-8 JSON document describing the chain's initial
/// state (nonce, difficulty, account allocations, mix hash, coinbase,
/// timestamp, parent hash and gas limit).
///
/// ```text
/// default_genesis.b64 ── base64 (RFC 4648 §4) ──▶ gzip member (RFC 1952)
///                                                  ── inflate ──▶ genesis JSON
/// ```
///
/// The file must not carry a trailing newline: every symbol in it is part
/// of the padded base64 alphabet.
pub const DEFAULT_GENESIS_BLOB: &str = include_str!("../assets/default_genesis.b64");

/// Byte view of [`DEFAULT_GENESIS_BLOB`], as consumed by the decoder.
#[must_use]
pub fn default_blob() -> &'static [u8] {
    DEFAULT_GENESIS_BLOB.as_bytes()
}
