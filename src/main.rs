use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::info;

use par_bitonic::{parallel_sort_verified, sequence, SortConfig, Verification};

/// Parallel bitonic sorter for binary integer sequence files.
#[derive(Parser)]
#[command(name = "par_bitonic", version, about = "Sort a binary integer sequence with a worker pool")]
struct Cli {
    /// Input file: little-endian i32 element count followed by the elements
    input: PathBuf,

    /// Number of worker threads
    #[arg(short, long, default_value_t = par_bitonic::config::DEFAULT_WORKERS)]
    workers: usize,

    /// Width of the initial sort units (power of two, at most the sequence length)
    #[arg(short, long, default_value_t = par_bitonic::config::DEFAULT_MIN_WIDTH)]
    min_width: usize,

    /// Write the sorted sequence to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let mut seq = sequence::read_file(&cli.input)?;
    info!("loaded {} elements from {}", seq.len(), cli.input.display());

    let config = SortConfig::new(cli.workers, cli.min_width);
    let start = Instant::now();
    let verdict = parallel_sort_verified(&mut seq, &config)?;
    let elapsed = start.elapsed().as_secs_f64();

    match verdict {
        Verification::Sorted => {
            println!("sorted {} elements in {elapsed:.6} s", seq.len());
        }
        Verification::Unsorted { index, left, right } => {
            println!(
                "sequence NOT sorted: seq[{index}] = {left} > seq[{}] = {right}",
                index + 1
            );
            return Ok(ExitCode::FAILURE);
        }
    }

    if let Some(output) = &cli.output {
        sequence::write_file(output, &seq)?;
        info!("wrote sorted sequence to {}", output.display());
    }

    Ok(ExitCode::SUCCESS)
}
