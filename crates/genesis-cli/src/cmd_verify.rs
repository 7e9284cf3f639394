/// Implementation of `genesis verify`.
///
/// Decodes the whole blob and reports each layer as a `✓` line, or the
/// first failure as a `✗` line. The command exits with code 0 on a sound
/// blob and code 1 otherwise.
///
/// # Success output
///
/// ```text
/// ✓ Base64: 26036 symbols, 19527 bytes of gzip
/// ✓ Gzip: member "gen.txt", CRC32 and size verified
/// ✓ Document: 46084 bytes, JSON object shape
/// ✓ Digest: blake3 9c1e…
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error: genesis blob failed to decompress after 0 bytes: invalid gzip header
/// ```
///
/// The document check is a shape check only; the genesis schema itself is
/// validated by whatever loads the genesis, not here.
use anyhow::{Result, anyhow};
use genesis_decoder::{DecoderConfig, GenesisStream, check_shape, open_genesis_with};

use crate::VerifyArgs;
use crate::blob_source::{BlobSource, decoded_base64_len};

/// Run the `genesis verify` command.
///
/// # Errors
///
/// Returns an error if the blob cannot be loaded, fails to decode, does
/// not look like a JSON object, or does not match `--expect-digest`.
pub fn run(args: &VerifyArgs, config: &DecoderConfig) -> Result<()> {
    let source = BlobSource::load(args.blob.as_deref())?;
    let report = verify(&source, config, args.expect_digest.as_deref());

    for line in &report.lines {
        println!("✓ {line}");
    }
    match report.failure {
        None => Ok(()),
        Some(diagnostic) => {
            println!("✗ Error: {diagnostic}");
            Err(anyhow!("verification of {} failed", source.label()))
        }
    }
}

/// Outcome of a verification pass: the layers that passed, then the
/// first failure, if any.
struct Report {
    lines: Vec<String>,
    failure: Option<String>,
}

fn verify(source: &BlobSource, config: &DecoderConfig, expect_digest: Option<&str>) -> Report {
    let mut lines = Vec::new();
    let failure = check(source, config, expect_digest, &mut lines).err();
    Report { lines, failure }
}

fn check(
    source: &BlobSource,
    config: &DecoderConfig,
    expect_digest: Option<&str>,
    lines: &mut Vec<String>,
) -> Result<(), String> {
    let blob = source.bytes();
    let mut stream = open_genesis_with(blob, config).map_err(|e| e.to_string())?;
    let document = drain(&mut stream)?;

    lines.push(format!(
        "Base64: {} symbols, {} bytes of gzip",
        blob.len(),
        decoded_base64_len(blob)
    ));
    let member = match stream.member().and_then(|m| m.file_name.as_deref()) {
        Some(name) => format!("member {name:?}"),
        None => "unnamed member".to_string(),
    };
    lines.push(format!("Gzip: {member}, CRC32 and size verified"));

    let shape = check_shape(&document).map_err(|e| e.to_string())?;
    lines.push(format!("Document: {} bytes, JSON object shape", shape.len));

    let digest = blake3::hash(&document).to_hex();
    if let Some(expected) = expect_digest {
        if !digest.as_str().eq_ignore_ascii_case(expected.trim()) {
            return Err(format!("digest mismatch: expected {expected}, got {digest}"));
        }
        lines.push(format!("Digest: blake3 {digest} (matches)"));
    } else {
        lines.push(format!("Digest: blake3 {digest}"));
    }
    Ok(())
}

fn drain(stream: &mut GenesisStream<'_>) -> Result<Vec<u8>, String> {
    let mut document = Vec::new();
    std::io::Read::read_to_end(stream, &mut document)
        .map_err(|e| genesis_decoder::GenesisError::from(e).to_string())?;
    Ok(document)
}
