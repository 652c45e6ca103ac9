//! applyaudiosr - AudioSR automation for large WAV files

use clap::Parser;
use std::process;
use applyaudiosr::audio::WavMetadata;
use applyaudiosr::{init_logging, Args, ChunkedWaveformProcessor, Config, Result};

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.verbose {
        println!("{}", applyaudiosr::get_library_info());
        println!();
    }

    let print_metadata = args.print_metadata;
    let config = Config::from_args_and_config(args)?;

    if print_metadata {
        println!("{}", WavMetadata::read(&config.input_path)?);
        println!();
    }

    let mut processor = ChunkedWaveformProcessor::new(&config)?;
    let result = processor.process()?;

    if print_metadata {
        println!("{}", WavMetadata::read(&result.output_path)?);
        println!();
    }

    println!("Output: {}", result.output_path.display());
    println!("Chunks: {}", result.chunk_count);
    println!("Time: {:.2}s", result.processing_time.as_secs_f64());
    println!("Processed audio file with seed: {}", result.seed);

    Ok(())
}
