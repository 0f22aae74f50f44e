//! GeoGen CLI
//!
//! Loads a generation problem, runs the generator and reports results

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geogen_core::{loader, signature_kinds, ConfigurationRecord, GenerationOutput, PredefinedConstruction};

#[derive(Parser)]
#[command(name = "geogen", about = "Generate geometric configurations from loose objects")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the generation described by a problem file
    Run {
        /// Input problem file (JSON)
        problem: PathBuf,

        /// Override the number of iterations
        #[arg(long)]
        iterations: Option<usize>,

        /// Override the random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the number of pictures
        #[arg(long)]
        pictures: Option<usize>,

        /// Write every configuration as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the predefined constructions
    Constructions,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Run {
            problem,
            iterations,
            seed,
            pictures,
            output,
        } => cmd_run(problem, *iterations, *seed, *pictures, output.as_deref()),
        Commands::Constructions => cmd_constructions(),
    }
}

fn cmd_run(
    path: &Path,
    iterations: Option<usize>,
    seed: Option<u64>,
    pictures: Option<usize>,
    output_path: Option<&Path>,
) -> Result<()> {
    let mut problem = loader::load_problem(path)
        .with_context(|| format!("failed to load problem {}", path.display()))?;

    if let Some(iterations) = iterations {
        problem.settings.iterations = iterations;
    }
    if let Some(seed) = seed {
        problem.settings.seed = seed;
    }
    if let Some(pictures) = pictures {
        problem.settings.number_of_pictures = pictures;
    }

    let generator = problem
        .to_generator()
        .with_context(|| format!("failed to set up problem {}", problem.id))?;
    let output = generator.collect_output().context("generation failed")?;

    print_summary(&problem.id, &output);

    if let Some(output_path) = output_path {
        output
            .to_json_file(output_path)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        println!("wrote {}", output_path.display());
    }
    Ok(())
}

fn print_summary(id: &str, output: &GenerationOutput) {
    println!("problem:    {id}");
    println!("layout:     {:?}", output.layout);
    for object in &output.initial_objects {
        println!("initial:    {object}");
    }
    for (i, size) in output.statistics.frontier_sizes.iter().enumerate() {
        println!("iteration {}: {size} configurations", i + 1);
    }

    let stats = &output.statistics;
    println!("emitted:    {}", stats.emitted);
    println!(
        "rejected:   {} unconstructible, {} duplicate, {} non-canonical",
        stats.unconstructible, stats.duplicates, stats.non_canonical
    );
    println!(
        "skipped:    {} symbolic duplicates, {} known invalid",
        stats.symbolic_duplicates, stats.invalid_cache_hits
    );
    if stats.inconsistencies_resolved > 0 {
        println!(
            "rebuilt:    {} inconsistencies in {} redraws",
            stats.inconsistencies_resolved, stats.reconstructions
        );
    }

    if let Some(last) = output.configurations.last() {
        println!("last:       {}", describe(last));
    }
}

fn describe(record: &ConfigurationRecord) -> String {
    record.newest.join(", ")
}

fn cmd_constructions() -> Result<()> {
    for construction in PredefinedConstruction::ALL {
        let signature: Vec<String> = construction.signature().iter().map(ToString::to_string).collect();
        println!(
            "{:<24} ({}) -> {}  [{} objects]",
            construction.name(),
            signature.join(", "),
            construction.output_kind(),
            signature_kinds(&construction.signature()).len()
        );
    }
    Ok(())
}
