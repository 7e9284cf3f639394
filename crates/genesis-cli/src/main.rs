/// Genesis command-line tool: dump, verify, measure, and build the
/// default genesis blob embedded in the client.
///
/// # Command overview
///
/// ```text
/// genesis <COMMAND> [OPTIONS]
///
/// Commands:
///   dump     Write the decoded genesis document
///   verify   Decode fully and check the document's integrity
///   stats    Print size, compression and digest figures
///   pack     Build a blob from a genesis JSON file
///   help     Print help information
///
/// Global options:
///   -v, --verbose          Enable debug logging on stderr
///   --max-size <BYTES>     Decoded size limit (default 16 MiB)
///   -h, --help             Print help
///   -V, --version          Print version
/// ```
///
/// `RUST_LOG` overrides the log filter chosen by `--verbose`.
///
/// # Exit codes
///
/// | Code | Meaning                                        |
/// |------|------------------------------------------------|
/// | 0    | Success                                        |
/// | 1    | Error (I/O failure, corrupt blob, bad flag...) |
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use genesis_decoder::DecoderConfig;

mod blob_source;
mod cmd_dump;
mod cmd_pack;
mod cmd_stats;
mod cmd_verify;
mod logging;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Inspect and rebuild the default genesis blob.
#[derive(Parser)]
#[command(name = "genesis", version, about = "Default genesis blob tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Fail once the decoded document exceeds this many bytes. For `pack`,
    /// bounds the input document instead.
    #[arg(long, global = true, value_name = "BYTES")]
    max_size: Option<u64>,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Write the decoded genesis document to stdout or a file.
    Dump(DumpArgs),
    /// Decode fully and check the document's integrity.
    Verify(VerifyArgs),
    /// Print size, compression and digest figures.
    Stats(StatsArgs),
    /// Build a blob from a genesis JSON file.
    Pack(PackArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `genesis dump`.
///
/// Streams the document; it is never held in memory as a whole.
#[derive(clap::Args)]
pub struct DumpArgs {
    /// Decode this blob file instead of the embedded one.
    #[arg(long)]
    pub blob: Option<PathBuf>,

    /// Write the document to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `genesis verify`.
///
/// ```text
/// ┌─────────────────┬──────────────────────────────────────────────────┐
/// │ Flag            │ Effect                                           │
/// ├─────────────────┼──────────────────────────────────────────────────┤
/// │ --blob FILE     │ Verify an external blob instead of the embedded  │
/// │ --expect-digest │ Fail unless the BLAKE3 digest matches (hex)      │
/// └─────────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Verify this blob file instead of the embedded one.
    #[arg(long)]
    pub blob: Option<PathBuf>,

    /// Expected BLAKE3 digest of the decoded document, as hex.
    #[arg(long, value_name = "HEX")]
    pub expect_digest: Option<String>,
}

/// Arguments for `genesis stats`.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// Measure this blob file instead of the embedded one.
    #[arg(long)]
    pub blob: Option<PathBuf>,
}

/// Arguments for `genesis pack`.
///
/// The output file holds the blob with no trailing newline, ready to be
/// embedded with `include_str!`.
#[derive(clap::Args)]
pub struct PackArgs {
    /// Genesis JSON document to pack.
    pub input: PathBuf,

    /// Output blob file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Deflate level, 0 (store) to 9 (best).
    #[arg(long, default_value_t = 9)]
    pub level: u32,

    /// File name recorded in the gzip header.
    #[arg(long)]
    pub file_name: Option<String>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = DecoderConfig {
        max_decoded_size: cli
            .max_size
            .or(DecoderConfig::default().max_decoded_size),
        ..DecoderConfig::default()
    };

    let result = match cli.command {
        Commands::Dump(args) => cmd_dump::run(&args, &config),
        Commands::Verify(args) => cmd_verify::run(&args, &config),
        Commands::Stats(args) => cmd_stats::run(&args, &config),
        Commands::Pack(args) => cmd_pack::run(&args, cli.max_size),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
