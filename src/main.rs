use std::path::PathBuf;

use bilan_achats::aggregate;
use bilan_achats::model::AggregateStats;
use bilan_achats::report::DEFAULT_REPORT_NAME;
use bilan_achats::{Result, ToolError};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    match cli.command {
        Command::Report(args) => execute_report(args),
    }
}

fn execute_report(args: ReportArgs) -> Result<()> {
    let stats = aggregate::aggregate_files(&args.cnrs, &args.insa, &args.output)?;

    if args.stats_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats);
    }
    Ok(())
}

fn print_stats(stats: &AggregateStats) {
    println!("Codes CNRS    : {}", stats.cnrs_codes);
    println!("Codes INSA    : {}", stats.insa_codes);
    println!("Codes Total   : {}", stats.merged_codes);
    println!("Montant Total : {:.2} €", stats.total_amount);
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Aggregate CNRS and INSA expenditure exports by NACRES code."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Build the per-code expenditure report from the two exports.
    Report(ReportArgs),
}

#[derive(clap::Args)]
struct ReportArgs {
    /// Path of the GESLAB (CNRS) export, ODS format.
    #[arg(long)]
    cnrs: PathBuf,

    /// Path of the INSA export, ODS format.
    #[arg(long)]
    insa: PathBuf,

    /// Path of the generated tab-separated report.
    #[arg(long, default_value = DEFAULT_REPORT_NAME)]
    output: PathBuf,

    /// Print the summary counters as JSON instead of the readable block.
    #[arg(long)]
    stats_json: bool,
}
