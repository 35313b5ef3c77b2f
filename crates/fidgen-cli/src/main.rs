//! fidgen: write printable sheets of classic fiducial markers.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use fidgen_core::{
    GenerationReport, MARKER_TABLE, PngDirectorySink, SheetConfig, SheetGenerator, SheetManifest,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the manifest written next to the sheets.
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Parser, Debug)]
#[command(
    name = "fidgen",
    version,
    about = "Generate printable sheets of the 120 classic fiducial markers"
)]
struct Cli {
    /// Pixels per layout unit.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    unit_size: u32,
    /// Markers per row.
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..))]
    columns: u32,
    /// Markers per column.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    rows: u32,
    /// Directory the sheets are written to (created if missing).
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
    /// Draw pages on all cores.
    #[arg(long)]
    parallel: bool,
    /// Also write `manifest.json` with the code and position of every marker.
    #[arg(long)]
    manifest: bool,
    /// Print the plan (or the manifest, with `--manifest`) as JSON and exit
    /// without writing anything.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn config(&self) -> SheetConfig {
        SheetConfig::builder()
            .unit_size(self.unit_size)
            .columns(self.columns)
            .rows(self.rows)
            .build()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    run(&cli, &mut io::stdout().lock())
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let generator = SheetGenerator::new(cli.config()).context("invalid sheet layout")?;
    let plan = generator.plan();
    tracing::info!(
        pages = plan.page_count,
        width = plan.page_width,
        height = plan.page_height,
        "generating sheets"
    );

    if cli.dry_run {
        let json = if cli.manifest {
            let manifest = SheetManifest::new(plan, generator.geometry(), &MARKER_TABLE);
            serde_json::to_string_pretty(&manifest)?
        } else {
            serde_json::to_string_pretty(&plan)?
        };
        writeln!(out, "{json}")?;
        return Ok(());
    }

    let mut sink = PngDirectorySink::create(&cli.output)
        .with_context(|| format!("cannot create output directory {}", cli.output.display()))?;
    let report = if cli.parallel {
        generator.generate_pages_parallel(&mut sink)
    } else {
        generator.generate_pages(&mut sink)
    };

    for artifact in report.artifacts() {
        match &artifact.path {
            Some(path) => writeln!(out, "{}", path.display())?,
            None => writeln!(out, "{}", artifact.name)?,
        }
    }

    if cli.manifest {
        let manifest = SheetManifest::new(plan, generator.geometry(), &MARKER_TABLE);
        let path = cli.output.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(&path, json).with_context(|| format!("cannot write {}", path.display()))?;
        writeln!(out, "{}", path.display())?;
    }

    check_report(&report)
}

fn check_report(report: &GenerationReport) -> Result<()> {
    let failed: Vec<_> = report.pages.iter().filter(|p| p.result.is_err()).collect();
    if failed.is_empty() {
        return Ok(());
    }
    for page in &failed {
        if let Err(e) = &page.result {
            tracing::error!(sheet = %page.name, error = %e, "sheet not written");
        }
    }
    bail!("{} of {} sheets failed to export", failed.len(), report.pages.len())
}
