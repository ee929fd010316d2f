use clap::Parser;
use matrix_sum::app::{handle_fatal_error, init_logging, AppConfig};
use matrix_sum::config::{ConfigLayer, RunConfig};
use matrix_sum::driver::Driver;
use matrix_sum::reduce::SyncStrategy;
use matrix_sum::report::ReportFormat;
use std::io::BufWriter;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::debug;

/// Sum, maximum and minimum of a random square grid, computed by parallel strip workers
#[derive(Parser)]
#[command(name = "matrix-sum")]
#[command(version, long_about = None)]
struct Cli {
    /// Grid dimension (default and upper bound: --max-size)
    size: Option<NonZeroUsize>,

    /// Number of workers (default and upper bound: --max-workers)
    workers: Option<NonZeroUsize>,

    /// Largest accepted grid dimension; larger requests are clamped
    #[arg(long)]
    max_size: Option<NonZeroUsize>,

    /// Largest accepted worker count; larger requests are clamped
    #[arg(long)]
    max_workers: Option<NonZeroUsize>,

    /// Smallest generated cell value
    #[arg(long, allow_hyphen_values = true)]
    min_value: Option<i32>,

    /// Largest generated cell value
    #[arg(long, allow_hyphen_values = true)]
    max_value: Option<i32>,

    /// Seed for grid generation (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// How partial results reach the aggregator
    #[arg(short, long, value_enum)]
    strategy: Option<SyncStrategy>,

    /// Output format for the summary
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Print the grid before the summary
    #[arg(long)]
    print_grid: bool,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Settings given on the command line, layered over the config file
    fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            size: self.size.map(NonZeroUsize::get),
            workers: self.workers.map(NonZeroUsize::get),
            max_size: self.max_size.map(NonZeroUsize::get),
            max_workers: self.max_workers.map(NonZeroUsize::get),
            min_value: self.min_value,
            max_value: self.max_value,
            seed: self.seed,
            strategy: self.strategy,
            format: self.format,
            print_grid: self.print_grid.then_some(true),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let app_config = AppConfig::new(cli.verbose);
    init_logging(&app_config);

    if let Err(e) = run(cli).await {
        handle_fatal_error(e, app_config.verbose);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let file_layer = match &cli.config {
        Some(path) => ConfigLayer::load(path)?,
        None => ConfigLayer::default(),
    };
    let config = RunConfig::resolve(file_layer.merge(cli.overrides()))?;
    debug!("Resolved configuration: {:?}", config);

    let mut out = BufWriter::new(std::io::stdout());
    Driver::new(config).run(&mut out).await?;
    Ok(())
}
