//! heapbench CLI: time the heap sort and compare it with recorded timings.

use std::path::{Path, PathBuf};

use clap::{Parser as ClapParser, Subcommand};
use heapbench_cli::colors::{gray, red, status_label};
use heapbench_cli::commands::{self, RunOptions};
use heapbench_cli::config::{HeapbenchConfig, OutputFormat};
use heapbench_cli::{logging, CliError};

#[derive(ClapParser)]
#[command(name = "heapbench", version, about = "Heap sort timing and comparison")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark suite and print a summary
    Run {
        /// Config file (default: search for heapbench.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Input size to benchmark; repeat for several (replaces config sizes)
        #[arg(long = "size", allow_negative_numbers = true)]
        sizes: Vec<i64>,

        /// Runs per size
        #[arg(short, long)]
        repetitions: Option<usize>,

        /// Seed for reproducible inputs
        #[arg(long)]
        seed: Option<u64>,

        /// Summary format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Save the JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write comparison charts into this directory
        #[arg(long)]
        charts: Option<PathBuf>,

        /// Reference dataset to compare against (c or python)
        #[arg(long)]
        reference: Option<String>,
    },
    /// Render charts from a saved JSON report
    Plot {
        /// Report written by `heapbench run --output`
        #[arg(long)]
        input: PathBuf,

        /// Output directory
        #[arg(long, default_value = "charts")]
        out_dir: PathBuf,

        /// Compare against this dataset instead of the one in the report
        #[arg(long)]
        reference: Option<String>,
    },
    /// Sort integers with the heap sort and print them
    Sort {
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,
    },
    /// Create a heapbench.toml config file in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let outcome = match cli.command {
        Commands::Run {
            config,
            sizes,
            repetitions,
            seed,
            format,
            output,
            charts,
            reference,
        } => cmd_run(
            config,
            RunOptions {
                sizes,
                repetitions,
                seed,
                format,
                output,
                charts,
                reference,
            },
        ),
        Commands::Plot {
            input,
            out_dir,
            reference,
        } => cmd_plot(&input, &out_dir, reference.as_deref()),
        Commands::Sort { values } => {
            let sorted = commands::sort_values(values);
            let rendered: Vec<String> = sorted.iter().map(|v| v.to_string()).collect();
            println!("{}", rendered.join(" "));
            Ok(())
        }
        Commands::Init => cmd_init(),
    };

    if let Err(e) = outcome {
        eprintln!("{} {}", red("error:"), e);
        std::process::exit(1);
    }
}

fn cmd_run(config_path: Option<PathBuf>, opts: RunOptions) -> Result<(), CliError> {
    let config = match &config_path {
        Some(path) => HeapbenchConfig::load_from(path)?,
        None => HeapbenchConfig::load()?,
    };

    let out = commands::run(config, &opts)?;
    print!("{}", out.rendered);

    if let Some(path) = &out.saved {
        eprintln!("{} {}", status_label("Saved"), path.display());
    }
    for path in &out.charts {
        eprintln!("{} {}", status_label("Chart"), path.display());
    }
    Ok(())
}

fn cmd_plot(input: &Path, out_dir: &Path, reference: Option<&str>) -> Result<(), CliError> {
    let paths = commands::plot(input, out_dir, reference)?;
    for path in &paths {
        println!("{} {}", status_label("Chart"), path.display());
    }
    println!("{}", gray("open the .svg files in a browser to view them"));
    Ok(())
}

fn cmd_init() -> Result<(), CliError> {
    let dir = std::env::current_dir().map_err(|source| CliError::Read {
        path: PathBuf::from("."),
        source,
    })?;
    let path = commands::init(&dir)?;
    println!("{} {}", status_label("Created"), path.display());
    Ok(())
}
