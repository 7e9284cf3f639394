/// Implementation of `genesis stats`.
///
/// Decodes the blob and prints its size at every layer of the pipeline,
/// the gzip member metadata, and a BLAKE3 digest of the document.
///
/// # Example output
///
/// ```text
/// Source:      <embedded>
/// Base64:      26036 symbols
/// Gzip:        19527 bytes  (member "gen.txt", mtime 1459271114)
/// Document:    46084 bytes
/// Ratio:       2.36x  (document / gzip)
/// BLAKE3:      9c1e…
/// ```
use std::fmt::Write as _;
use std::io::Read as _;

use anyhow::{Context, Result};
use genesis_decoder::{DecoderConfig, GenesisError, open_genesis_with};

use crate::StatsArgs;
use crate::blob_source::{BlobSource, decoded_base64_len};

/// Run the `genesis stats` command.
///
/// # Errors
///
/// Returns an error if the blob cannot be loaded or decoded.
pub fn run(args: &StatsArgs, config: &DecoderConfig) -> Result<()> {
    let source = BlobSource::load(args.blob.as_deref())?;
    print!("{}", render(&source, config)?);
    Ok(())
}

fn render(source: &BlobSource, config: &DecoderConfig) -> Result<String> {
    let blob = source.bytes();
    let mut stream = open_genesis_with(blob, config)
        .with_context(|| format!("failed to open {}", source.label()))?;

    // Hash while streaming; the document is never buffered whole.
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; 8 * 1024];
    loop {
        let n = stream
            .read(&mut buf)
            .map_err(GenesisError::from)
            .with_context(|| format!("failed to decode {}", source.label()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let gzip_len = decoded_base64_len(blob);
    let document_len = stream.decoded_len();
    let member = match stream.member() {
        Some(m) => match &m.file_name {
            Some(name) => format!("member {name:?}, mtime {}", m.mtime),
            None => format!("unnamed member, mtime {}", m.mtime),
        },
        None => "no member".to_string(),
    };

    let mut out = String::new();
    writeln!(out, "Source:      {}", source.label())?;
    writeln!(out, "Base64:      {} symbols", blob.len())?;
    writeln!(out, "Gzip:        {gzip_len} bytes  ({member})")?;
    writeln!(out, "Document:    {document_len} bytes")?;
    writeln!(out, "Ratio:       {}  (document / gzip)", ratio(document_len, gzip_len))?;
    writeln!(out, "BLAKE3:      {}", hasher.finalize().to_hex())?;
    Ok(out)
}

#[allow(clippy::cast_precision_loss)]
fn ratio(document_len: u64, gzip_len: usize) -> String {
    if gzip_len == 0 {
        return "n/a".to_string();
    }
    format!("{:.2}x", document_len as f64 / gzip_len as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_report_lists_every_layer() {
        let report = render(&BlobSource::Embedded, &DecoderConfig::default()).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Source:      <embedded>");
        assert_eq!(lines[1], "Base64:      26036 symbols");
        assert_eq!(lines[2], "Gzip:        19527 bytes  (member \"gen.txt\", mtime 1459271114)");
        assert_eq!(lines[3], "Document:    46084 bytes");
        assert_eq!(lines[4], "Ratio:       2.36x  (document / gzip)");
        assert!(lines[5].starts_with("BLAKE3:      "));
    }

    #[test]
    fn digest_matches_a_direct_hash() {
        let document = genesis_decoder::read_default_genesis().unwrap();
        let expected = blake3::hash(&document).to_hex().to_string();
        let report = render(&BlobSource::Embedded, &DecoderConfig::default()).unwrap();
        assert!(report.ends_with(&format!("BLAKE3:      {expected}\n")));
    }

    #[test]
    fn ratio_handles_empty_gzip() {
        assert_eq!(ratio(10, 0), "n/a");
        assert_eq!(ratio(30, 10), "3.00x");
    }
}
