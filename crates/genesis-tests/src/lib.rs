//! Shared helpers for the genesis integration tests and benches.

use serde_json::Value;

/// The canonical genesis document the embedded blob must decode to.
pub const CANONICAL_GENESIS: &[u8] = include_bytes!("../tests/fixtures/default_genesis.json");

/// Standard padded base64 alphabet, in index order.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Copy `blob` with the symbol at `index` swapped for a different, still
/// valid, alphabet symbol (its alphabet index with the low bit flipped).
///
/// # Panics
///
/// Panics if the symbol at `index` is not in the alphabet (e.g. padding).
#[must_use]
pub fn flip_symbol(blob: &[u8], index: usize) -> Vec<u8> {
    let mut out = blob.to_vec();
    let pos = ALPHABET
        .iter()
        .position(|&s| s == out[index])
        .unwrap_or_else(|| panic!("symbol {:?} at {index} is not in the alphabet", out[index] as char));
    out[index] = ALPHABET[pos ^ 1];
    out
}

/// Drop commas that directly precede a closing `}` or `]`, outside of
/// string literals.
#[must_use]
pub fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else if c == '"' {
            in_string = true;
        } else if c == ',' && text[i + 1..].trim_start().starts_with(&['}', ']'][..]) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Parse JSON, tolerating trailing commas.
///
/// # Errors
///
/// Any error `serde_json` reports once trailing commas are removed, or
/// invalid UTF-8.
pub fn parse_lenient(document: &[u8]) -> Result<Value, serde_json::Error> {
    let text = String::from_utf8_lossy(document);
    serde_json::from_str(&strip_trailing_commas(&text))
}
