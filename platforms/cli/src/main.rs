use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tmsim::{MachineError, RunOutcome, TemplateCache};

/// Visited lengths above this print a "very large" marker instead of the
/// tape content.
const LARGE_OUTPUT_THRESHOLD: usize = 1000;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Machine definition files to run (defaults to *.txt in the current directory)
    files: Vec<PathBuf>,

    /// Unary input length used when a definition has no input line
    #[clap(long, default_value_t = 1)]
    unary: usize,

    /// Step budget per machine; 0 runs until the machine halts
    #[clap(long, default_value_t = 0)]
    max_steps: u64,
}

fn main() {
    let cli = Cli::parse();

    let files = if cli.files.is_empty() {
        match definition_files_in_cwd() {
            Ok(files) => files,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    } else {
        cli.files.clone()
    };

    if files.is_empty() {
        eprintln!(
            "No input files found. Provide .txt machine files as arguments \
             or place them in the working directory."
        );
        std::process::exit(1);
    }

    let mut cache = TemplateCache::new();

    // Definition errors are reported per file; the batch continues.
    for file in &files {
        if let Err(e) = process_file(&mut cache, file, cli.unary, cli.max_steps) {
            eprintln!("Error processing {}: {}", file.display(), e);
        }
    }
}

/// Collects non-hidden `*.txt` files from the working directory.
fn definition_files_in_cwd() -> Result<Vec<PathBuf>, MachineError> {
    let entries = std::fs::read_dir(".")
        .map_err(|e| MachineError::File(format!("failed to read working directory: {}", e)))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            !path.is_dir()
                && path.extension().is_some_and(|ext| ext == "txt")
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| !name.starts_with('.'))
        })
        .collect();
    files.sort();

    Ok(files)
}

fn process_file(
    cache: &mut TemplateCache,
    path: &Path,
    unary: usize,
    max_steps: u64,
) -> Result<(), MachineError> {
    let definition = cache.get_or_load(path)?;

    let mut machine = definition.template.clone_template();
    if definition.state_count > 0 && definition.symbols_per_state > 0 {
        machine.compile(definition.state_count, definition.symbols_per_state)?;
    }

    match &definition.initial_input {
        Some(input) => machine.initialize_tape(input),
        None => machine.initialize_unary(unary),
    }
    machine.set_current_state(0);

    let start = Instant::now();
    let outcome = machine.run(max_steps);
    let elapsed = start.elapsed().as_secs_f64();

    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("<unnamed>");
    println!("{}", name);

    if outcome == RunOutcome::StepLimitReached {
        println!("step limit reached after {} steps", max_steps);
    }

    let visited_length = machine.visited_length();
    if visited_length > LARGE_OUTPUT_THRESHOLD {
        println!("output: very large");
    } else {
        println!("output:");
        println!("{}", machine.visited_content_string());
    }
    println!("output length: {}", visited_length);
    println!("sum of symbols: {}", machine.sum_of_symbols());
    println!();
    println!("elapsed (s): {:.3}", elapsed);

    Ok(())
}
