use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use reporter::prelude::*;
use sheets::{InMemoryWorkbook, SheetsProvider, WorkbookSnapshot};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "reporter")]
#[command(about = "Build spreadsheet reports from Playwright and Cypress test runs")]
struct Cli {
    /// Reporter configuration (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the daily tab payload from a run's JSON results
    Daily {
        /// Result batch: {"framework": "...", "results": [...]}
        #[arg(short, long)]
        input: PathBuf,
        /// Run date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Plan a roll-up against a workbook snapshot
    Weekly {
        /// Workbook snapshot: {"tabs": [{"title": "...", "values": [...]}]}
        #[arg(short, long)]
        workbook: PathBuf,
        /// Summary tab title, defaults to the configured one
        #[arg(long)]
        destination: Option<String>,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Roll up the previous month instead of the current week
        #[arg(long)]
        monthly: bool,
        /// Apply the payload to the snapshot and print the updated workbook
        #[arg(long)]
        apply: bool,
    },
    /// Print the date range a roll-up covers
    Window {
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        monthly: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Daily { input, date } => {
            daily(&config, &input, date.unwrap_or_else(today))?;
        }
        Commands::Weekly {
            workbook,
            destination,
            date,
            monthly,
            apply,
        } => {
            let summary_type = summary_type(monthly);
            let destination = destination.unwrap_or_else(|| match summary_type {
                SummaryType::Monthly => config.sheets.monthly_summary_title.clone(),
                _ => config.sheets.weekly_summary_title.clone(),
            });
            weekly(
                &workbook,
                &destination,
                date.unwrap_or_else(today),
                summary_type,
                apply,
            )
            .await?;
        }
        Commands::Window { date, monthly } => {
            let window = RollupWindow::for_date(date.unwrap_or_else(today), summary_type(monthly));
            println!("{}", serde_json::to_string_pretty(&window)?);
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn summary_type(monthly: bool) -> SummaryType {
    if monthly {
        SummaryType::Monthly
    } else {
        SummaryType::Weekly
    }
}

fn load_config(path: Option<&Path>) -> ReportResult<ReporterConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ReporterConfig::load(path)
        }
        None => {
            let mut config = ReporterConfig::default();
            config.apply_env_overrides()?;
            Ok(config)
        }
    }
}

fn daily(config: &ReporterConfig, input: &Path, date: NaiveDate) -> ReportResult<()> {
    let batch: ResultBatch = serde_json::from_str(&std::fs::read_to_string(input)?)?;
    let report = DailyReport::build(&batch, config, date)?;

    println!("{}", serde_json::to_string_pretty(&report.to_payload())?);
    Ok(())
}

async fn weekly(
    workbook: &Path,
    destination: &str,
    date: NaiveDate,
    summary_type: SummaryType,
    apply: bool,
) -> ReportResult<()> {
    let snapshot: WorkbookSnapshot = serde_json::from_str(&std::fs::read_to_string(workbook)?)?;
    let workbook = InMemoryWorkbook::from_snapshot(snapshot);
    info!("Using {} workbook", workbook.provider_name());

    let titles = workbook.titles()?;
    let payload = WeeklyAssembler::new(&workbook)
        .with_reference_date(date)
        .with_summary_type(summary_type)
        .construct_weekly_payload_for_copy_paste(&titles, destination)
        .await?;

    if apply {
        ReportPublisher::new(&workbook).publish_weekly(&payload).await?;
        println!("{}", serde_json::to_string_pretty(&workbook.snapshot()?)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(())
}
