//! `drawermap`: draw one slot map per drawer of a sample inventory.

mod output;
mod source;

use camino::Utf8PathBuf;
use chrono::Local;
use clap::Parser;
use drawermap::{Config, RenderOptions, render_inventory};
use miette::{IntoDiagnostic, WrapErr, miette};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::output::{Format, Rasterizer, write_pages};

#[derive(Parser, Debug)]
#[command(name = "drawermap", version, about = "Draw one slot map per drawer of a sample inventory")]
struct Args {
    /// Configuration document (JSON)
    #[arg(short, long)]
    config: Utf8PathBuf,

    /// Inventory table (.csv, .tsv, .xlsx, .xls, .ods); defaults to `main.db_path`
    #[arg(short, long)]
    input: Option<Utf8PathBuf>,

    /// Directory the pages are written to; defaults to `main.output_dir`, then `.`
    #[arg(short, long)]
    output_dir: Option<Utf8PathBuf>,

    /// Worksheet to read from a workbook; defaults to `main.sheet`
    #[arg(long)]
    sheet: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    run(Args::parse())
}

fn run(args: Args) -> miette::Result<()> {
    info!("starting drawermap");

    let text = std::fs::read_to_string(&args.config)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read configuration `{}`", args.config))?;
    let config = Config::from_json_str(&text)
        .wrap_err_with(|| format!("invalid configuration `{}`", args.config))?;

    let input = args
        .input
        .or_else(|| config.main.db_path.as_deref().map(Utf8PathBuf::from))
        .ok_or_else(|| {
            miette!(
                help = "pass --input or set `main.db_path` in the configuration",
                "no inventory table given"
            )
        })?;
    let sheet = args.sheet.as_deref().unwrap_or(&config.main.sheet);
    let table = source::load_table(&input, sheet)?;
    let records = source::records_from_table(&table, &config.main.columns)?;

    let options = RenderOptions {
        generated_at: Local::now().naive_local(),
        source_label: input.to_string(),
    };
    let rendering = render_inventory(&config, &records, &options);

    let output_dir = args
        .output_dir
        .or_else(|| config.main.output_dir.as_deref().map(Utf8PathBuf::from))
        .unwrap_or_else(|| Utf8PathBuf::from("."));
    let rasterizer = match args.format {
        Format::Png => Some(Rasterizer::new(std::env::current_dir().ok())),
        Format::Svg => None,
    };
    let written = write_pages(&rendering.pages, &output_dir, args.format, rasterizer.as_ref())?;

    println!("{} page(s) written to {}", written.len(), output_dir);
    if !rendering.conflicts.is_empty() {
        println!("{} slot(s) claimed by more than one record:", rendering.conflicts.len());
        for conflict in &rendering.conflicts {
            println!("  {conflict}");
        }
    }
    if !rendering.unplaced.is_empty() {
        warn!(records = rendering.unplaced.len(), "records without a slot were not drawn");
        for r in &rendering.unplaced {
            println!("  no slot for D{}-{} ({})", r.drawer, r.position, r.name.as_deref().unwrap_or("-"));
        }
    }

    info!("finished drawermap");
    Ok(())
}
