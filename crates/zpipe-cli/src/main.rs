/// zpipe — a zstd decompression filter.
///
/// Reads compressed bytes from stdin and writes decompressed bytes to
/// stdout, incrementally, through a pair of fixed-capacity buffers. Memory
/// use is bounded by the two buffer capacities regardless of stream length.
///
/// ```text
/// zstd -c access.log | ssh host zpipe > access.log
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                              |
/// |------|------------------------------------------------------|
/// | 0    | Success                                              |
/// | 1    | Error (I/O failure, corrupt stream, stall detection) |
///
/// On failure a single human-readable line goes to stderr. Output already
/// flushed before the failure has reached stdout — partial output on error
/// is an inherent property of streaming decode.
use std::io::{self, Write as _};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use zpipe_driver::{DriveReport, DriverConfig, StreamDriver};
use zpipe_zstd::ZstdDecoder;

/// Decompress a zstd stream from stdin to stdout.
#[derive(Parser)]
#[command(name = "zpipe", version, about = "Streaming zstd decompression filter")]
struct Cli {
    /// Print stream statistics to stderr after a successful run.
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let decoder = ZstdDecoder::new().context("cannot initialise the zstd decoder")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let driver = StreamDriver::new(
        DriverConfig::default(),
        decoder,
        stdin.lock(),
        stdout.lock(),
    );
    let report = driver.run()?;

    io::stdout().flush().context("cannot flush stdout")?;

    if cli.verbose {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &DriveReport) {
    eprintln!(
        "zpipe: {} bytes in, {} bytes out, {} steps, {} source compactions, {} flushes",
        report.bytes_in,
        report.bytes_out,
        report.steps,
        report.src_compactions,
        report.dst_flushes,
    );
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
