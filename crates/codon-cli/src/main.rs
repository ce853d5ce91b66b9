//! `codon` command-line tool: validate, run, mutate and compare genome files.

mod commands;
mod telemetry;

use anyhow::Result;
use clap::{Parser, Subcommand};
use codon_core::{MutationConfig, RuntimeConfig};
use codon_ir::MutationKind;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "codon", version, about = "Codon genome toolkit")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize and validate a genome, printing diagnostics
    Check {
        genome: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Execute a genome and print its trace
    Run {
        genome: PathBuf,
        /// JSON runtime configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Stop after this many instructions
        #[arg(long)]
        max_steps: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Apply one mutation and print the mutated genome
    Mutate {
        genome: PathBuf,
        /// Mutation kind; drawn from the configured weights when omitted
        #[arg(long)]
        kind: Option<MutationKind>,
        /// Codon index or base offset, depending on the kind
        #[arg(long)]
        position: Option<usize>,
        /// Bases inserted or deleted
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// JSON mutation weights
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Compare two genomes codon by codon
    Diff {
        original: PathBuf,
        mutated: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Re-flow a genome into aligned codon lines
    Format {
        genome: PathBuf,
        #[arg(long, default_value_t = 10)]
        width: usize,
        /// Print one decoded instruction per line instead
        #[arg(long)]
        disassemble: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_logging(cli.verbose)?;

    let output = match cli.command {
        Commands::Check { genome, json } => {
            let report = commands::check(&read(&genome)?)?;
            let output = if json {
                serde_json::to_string_pretty(&report)?
            } else {
                report.to_string()
            };
            if report.has_errors() {
                println!("{}", output);
                anyhow::bail!("{} failed validation", genome.display());
            }
            output
        }
        Commands::Run {
            genome,
            config,
            max_steps,
            json,
        } => {
            let mut runtime_config: RuntimeConfig = match config {
                Some(path) => commands::load_json(&path)?,
                None => Default::default(),
            };
            if max_steps.is_some() {
                runtime_config.max_steps = max_steps;
            }
            commands::run(&read(&genome)?, runtime_config, json)?
        }
        Commands::Mutate {
            genome,
            kind,
            position,
            count,
            seed,
            config,
            json,
        } => {
            let mutation_config: MutationConfig = match config {
                Some(path) => commands::load_json(&path)?,
                None => Default::default(),
            };
            let request = commands::MutateRequest {
                kind,
                position,
                count,
                seed,
            };
            commands::mutate(&read(&genome)?, &request, mutation_config, json)?
        }
        Commands::Diff {
            original,
            mutated,
            json,
        } => commands::diff(&read(&original)?, &read(&mutated)?, json)?,
        Commands::Format {
            genome,
            width,
            disassemble,
        } => commands::format(&read(&genome)?, width, disassemble)?,
    };

    println!("{}", output);
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))
}
