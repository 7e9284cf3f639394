/// Implementation of `genesis pack`.
///
/// Reads a genesis JSON document, compresses it into a single gzip member
/// and base64-encodes the result. The blob is decoded again before it is
/// written, so a file produced by this command is known to round-trip.
///
/// ```text
/// genesis.json ──gzip──▶ member ──base64──▶ blob ──decode──▶ compare ──▶ -o FILE
/// ```
///
/// `--max-size` bounds the input document. The round-trip decode itself is
/// unbounded, since the expected size is already known.
use std::fs;

use anyhow::{Context, Result, bail};
use genesis_decoder::{DecoderConfig, check_shape, open_genesis_with};
use genesis_encoder::{PackOptions, pack_with};

use crate::PackArgs;

/// Run the `genesis pack` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read, exceeds `max_size`, is not
/// shaped like a JSON object, cannot be packed, fails to round-trip, or the
/// output cannot be written.
pub fn run(args: &PackArgs, max_size: Option<u64>) -> Result<()> {
    let document =
        fs::read(&args.input).with_context(|| format!("cannot read {}", args.input.display()))?;
    check_size(&document, max_size)
        .with_context(|| format!("cannot pack {}", args.input.display()))?;
    check_shape(&document).with_context(|| format!("{} is not a JSON object", args.input.display()))?;

    let options = PackOptions {
        level: args.level,
        file_name: args.file_name.clone(),
        ..PackOptions::default()
    };
    let blob = pack_checked(&document, &options)?;

    fs::write(&args.output, blob.as_bytes())
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    println!(
        "packed {} bytes into {} symbols → {}",
        document.len(),
        blob.len(),
        args.output.display()
    );
    Ok(())
}

fn check_size(document: &[u8], max_size: Option<u64>) -> Result<()> {
    match max_size {
        Some(limit) if document.len() as u64 > limit => bail!(
            "document is {} bytes, over the --max-size limit of {limit} bytes",
            document.len()
        ),
        _ => Ok(()),
    }
}

fn pack_checked(document: &[u8], options: &PackOptions) -> Result<String> {
    let blob = pack_with(document, options).context("failed to pack document")?;

    let unbounded = DecoderConfig {
        max_decoded_size: None,
        ..DecoderConfig::default()
    };
    let decoded = open_genesis_with(blob.as_bytes(), &unbounded)
        .and_then(genesis_decoder::GenesisStream::read_all)
        .context("packed blob does not decode")?;
    if decoded != document {
        bail!("packed blob decodes to different bytes");
    }
    Ok(blob)
}
