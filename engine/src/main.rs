//! adscope - analyse advertising report exports from the command line
//!
//! Loads a PPC keyword report or a brand share report, prints the derived
//! table, optionally retargets individual rows and exports the result.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use engine::config::settings::{EngineSettings, CONFIG_ENV_VAR};
use engine::data::result_store::ResultStore;
use engine::error::Notice;
use engine::services::{AnalysisService, EditTargetAcosRequest, ExportRequest, IngestRequest};
use shared::models::{BidRecord, BrandShareRecord, ExportFormat, ReportKind};
use shared::utils::{format_amount, format_percentage, format_percentage_points};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adscope")]
#[command(about = "Bid recommendations and brand share opportunities from ad report exports")]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive new max bids from a PPC keyword report
    Ppc {
        /// Report file (.csv or workbook)
        #[arg(short, long)]
        input: PathBuf,

        /// Per-row target ACOS override, e.g. row-3=25 (repeatable)
        #[arg(long = "target-acos", value_parser = parse_edit)]
        edits: Vec<(String, String)>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List search queries with brand share improvement potential
    Brand {
        /// Report file (.csv or workbook)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Export the result set in this format
    #[arg(long, value_enum)]
    export: Option<ExportArg>,

    /// Directory for exported files (defaults to the configured export dir)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print records as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportArg {
    Xlsx,
    Csv,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Xlsx => ExportFormat::Xlsx,
            ExportArg::Csv => ExportFormat::Csv,
        }
    }
}

fn parse_edit(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((id, value)) if !id.trim().is_empty() => Ok((id.trim().to_string(), value.to_string())),
        _ => Err(format!("expected <row-id>=<target acos>, got '{}'", s)),
    }
}

fn print_notice(notice: &Notice) {
    if notice.is_error() {
        eprintln!("[error] {}: {}", notice.title, notice.description);
    } else {
        println!("[ok] {}: {}", notice.title, notice.description);
    }
}

fn print_bids(records: &[BidRecord]) {
    println!(
        "{:<8} {:<32} {:<10} {:>10} {:>10} {:>8} {:>12} {:>12}",
        "Id", "Keyword", "Match", "CPC", "ACOS", "ROAS", "Target ACOS", "New Max Bid"
    );
    for r in records {
        println!(
            "{:<8} {:<32} {:<10} {:>10} {:>10} {:>8} {:>12} {:>12}",
            r.id(),
            r.keyword(),
            r.match_type(),
            format_amount(r.cpc()),
            format_percentage_points(r.acos()),
            format_amount(r.roas()),
            format_percentage_points(r.target_acos()),
            format_amount(r.new_max_bid()),
        );
    }
}

fn print_brand_shares(records: &[BrandShareRecord]) {
    println!("{:<40} {:>12} {:>12} {:>12}", "Search Query", "Impressions", "Clicks", "Cart Adds");
    for r in records {
        println!(
            "{:<40} {:>12} {:>12} {:>12}",
            r.search_query,
            format_percentage(r.impression_share),
            format_percentage(r.click_share),
            format_percentage(r.cart_add_share),
        );
    }
}

async fn run_export(service: &AnalysisService, report: ReportKind, output: &OutputArgs) -> Result<()> {
    let Some(format) = output.export else {
        return Ok(());
    };
    let response = service
        .export(ExportRequest { report, format: format.into(), dir: output.out_dir.clone() })
        .await;
    print_notice(&response.notice);
    match response.path {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => bail!("export failed: {}", response.notice.description),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = EngineSettings::load(cli.config.as_deref()).context("Failed to load settings")?;
    info!(?settings, "Starting adscope");

    let store = Arc::new(RwLock::new(ResultStore::new()));
    let service = AnalysisService::new(store.clone(), Arc::new(settings));

    match &cli.command {
        Commands::Ppc { input, edits, output } => {
            let response = service
                .ingest(IngestRequest { path: input.clone(), report: ReportKind::PpcBid })
                .await;
            print_notice(&response.notice);
            if response.notice.is_error() {
                bail!("could not load {}", input.display());
            }

            for (id, value) in edits {
                let response = service
                    .edit_target_acos(EditTargetAcosRequest { id: id.clone(), value: value.clone() })
                    .await;
                print_notice(&response.notice);
            }

            {
                let store = store.read().await;
                if output.json {
                    println!("{}", serde_json::to_string_pretty(store.bids()).context("Failed to encode records")?);
                } else {
                    print_bids(store.bids());
                }
            }
            run_export(&service, ReportKind::PpcBid, output).await?;
        }
        Commands::Brand { input, output } => {
            let response = service
                .ingest(IngestRequest { path: input.clone(), report: ReportKind::BrandShare })
                .await;
            print_notice(&response.notice);
            if response.notice.is_error() {
                bail!("could not load {}", input.display());
            }

            {
                let store = store.read().await;
                if output.json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(store.brand_shares()).context("Failed to encode records")?
                    );
                } else {
                    print_brand_shares(store.brand_shares());
                }
            }
            run_export(&service, ReportKind::BrandShare, output).await?;
        }
    }

    Ok(())
}
