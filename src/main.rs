//! pricepipe CLI
//!
//! Runs the house price pipelines against a CSV file.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use pricepipe::config::PipelineConfig;
use pricepipe::pipeline::{DEFAULT_PIPELINE, DataCatalog, METRICS, SequentialRunner, register_pipelines};
use pricepipe::table::Table;

#[derive(Parser)]
#[command(name = "pricepipe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "House price regression pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a registered pipeline end to end
    Run {
        /// Parameters file (TOML)
        #[arg(short, long, default_value = "conf/parameters.toml")]
        config: PathBuf,

        /// Raw data CSV, overrides the configured catalog path
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Pipeline name
        #[arg(short, long, default_value = DEFAULT_PIPELINE)]
        pipeline: String,
    },

    /// Show data information
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },

    /// List registered pipelines
    List,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pricepipe=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, data, pipeline } => cmd_run(&config, data, &pipeline)?,
        Commands::Info { data } => cmd_info(&data)?,
        Commands::List => cmd_list(),
    }

    Ok(())
}

fn cmd_run(config_path: &Path, data: Option<PathBuf>, name: &str) -> anyhow::Result<()> {
    let mut config = PipelineConfig::load(Some(config_path))?;
    if let Some(data) = data {
        config.catalog.raw_data = data;
    }

    let pipelines = register_pipelines();
    let Some(pipeline) = pipelines.get(name) else {
        let known: Vec<&str> = pipelines.keys().map(String::as_str).collect();
        anyhow::bail!("Unknown pipeline '{}', expected one of {:?}", name, known);
    };

    let start = Instant::now();
    let mut catalog = DataCatalog::from_config(&config)?;
    SequentialRunner::new().run(pipeline, &mut catalog)?;
    let written = catalog.persist(&config.catalog)?;

    println!("Pipeline '{}' finished in {:?}", name, start.elapsed());
    if catalog.exists(METRICS) {
        let report = catalog.load(METRICS)?.as_report()?;
        println!("RMSE: {:.6}", report.rmse);
        println!("MAE:  {:.6}", report.mae);
        println!("R²:   {:.4}", report.r2);
    }
    for path in written {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn cmd_info(path: &Path) -> anyhow::Result<()> {
    let table = Table::read_csv(path)?;
    let (rows, cols) = table.shape();

    println!("{}: {} rows × {} columns", path.display(), rows, cols);
    println!("{:<24} {:<12} {:>8}", "column", "type", "missing");
    for (name, column) in table.columns() {
        println!("{:<24} {:<12} {:>8}", name, column.dtype(), column.null_count());
    }

    Ok(())
}

fn cmd_list() {
    for (name, pipeline) in register_pipelines() {
        println!("{name}");
        for node in pipeline.nodes() {
            println!("  {node}");
        }
    }
}
