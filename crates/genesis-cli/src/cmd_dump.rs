/// Implementation of `genesis dump`.
///
/// Pulls the decoded document through a fixed-size buffer and writes each
/// chunk as it arrives, so memory stays bounded by the decoder's window.
/// Output goes to stdout or to `-o <file>`.
///
/// A corrupt blob can fail part-way through, after some bytes have
/// already been written; the command then exits with code 1. A partly
/// written `-o` file is removed.
use std::fs::{self, File};
use std::io::{self, Read as _, Write};
use std::path::Path;

use anyhow::{Context, Result};
use genesis_decoder::{DecoderConfig, GenesisError, open_genesis_with};

use crate::DumpArgs;
use crate::blob_source::BlobSource;

const CHUNK: usize = 8 * 1024;

/// Run the `genesis dump` command.
///
/// # Errors
///
/// Returns an error if the blob cannot be loaded or decoded, or if the
/// output cannot be written.
pub fn run(args: &DumpArgs, config: &DecoderConfig) -> Result<()> {
    let source = BlobSource::load(args.blob.as_deref())?;

    let written = if let Some(path) = &args.output {
        dump_to_file(&source, config, path)?
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let written = copy_decoded(&source, config, &mut handle)?;
        handle.flush().context("cannot write to stdout")?;
        written
    };

    tracing::debug!(source = source.label(), written, "dumped genesis document");
    Ok(())
}

fn dump_to_file(source: &BlobSource, config: &DecoderConfig, path: &Path) -> Result<u64> {
    let mut file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let result = copy_decoded(source, config, &mut file).and_then(|written| {
        file.flush()
            .with_context(|| format!("cannot write {}", path.display()))?;
        Ok(written)
    });

    if result.is_err() {
        drop(file);
        if let Err(err) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "cannot remove partial output");
        }
    }
    result
}

/// Stream the decoded document into `out`, returning the byte count.
///
/// Read and write failures are kept apart so a broken pipe is never
/// reported as a corrupt blob.
fn copy_decoded(source: &BlobSource, config: &DecoderConfig, out: &mut impl Write) -> Result<u64> {
    let mut stream = open_genesis_with(source.bytes(), config)
        .with_context(|| format!("failed to open {}", source.label()))?;

    let mut buf = vec![0u8; CHUNK];
    let mut written = 0u64;
    loop {
        let n = stream
            .read(&mut buf)
            .map_err(GenesisError::from)
            .with_context(|| format!("failed to decode {}", source.label()))?;
        if n == 0 {
            return Ok(written);
        }
        out.write_all(&buf[..n]).context("cannot write decoded output")?;
        written += n as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_the_embedded_document() {
        let mut out = Vec::new();
        let written =
            copy_decoded(&BlobSource::Embedded, &DecoderConfig::default(), &mut out).unwrap();
        assert_eq!(written, out.len() as u64);
        assert_eq!(out, genesis_decoder::read_default_genesis().unwrap());
    }

    #[test]
    fn corrupt_blob_is_reported_as_decode_failure() {
        let source = BlobSource::File {
            label: "bad.b64".to_string(),
            text: "H4sI!!!!".to_string(),
        };
        let err = copy_decoded(&source, &DecoderConfig::default(), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("failed to decode bad.b64"));
        assert!(err.downcast_ref::<GenesisError>().is_some_and(GenesisError::is_encoding));
    }

    fn truncated_source() -> BlobSource {
        let blob = genesis_decoder::default_blob();
        let cut = blob.len() * 3 / 4 / 4 * 4;
        BlobSource::File {
            label: "truncated.b64".to_string(),
            text: String::from_utf8(blob[..cut].to_vec()).unwrap(),
        }
    }

    #[test]
    fn dump_to_file_writes_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");

        let written = dump_to_file(&BlobSource::Embedded, &DecoderConfig::default(), &path).unwrap();
        let on_disk = fs::read(&path).unwrap();
        assert_eq!(written, on_disk.len() as u64);
        assert_eq!(on_disk, genesis_decoder::read_default_genesis().unwrap());
    }

    #[test]
    fn failed_dump_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.json");

        let err = dump_to_file(&truncated_source(), &DecoderConfig::default(), &path).unwrap_err();
        assert!(err.downcast_ref::<GenesisError>().is_some_and(GenesisError::is_decompression));
        assert!(!path.exists());
    }
}
