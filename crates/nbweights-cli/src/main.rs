//! nbweights: extract model weights from a Jupyter notebook into JSON.
//!
//! Usage:
//!   nbweights extract notebook.ipynb --output-dir ../models/transaction_model
//!   nbweights scan notebook.ipynb
//!   nbweights pack --output-dir ../models/transaction_model

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use nbweights_convert::{convert, pack_existing, MarkerScanner, Notebook, NotebookDocument};
use nbweights_core::config::{CliOverrides, MatchPolicy};
use nbweights_core::errors::ConvertError;
use nbweights_core::tracing::init_tracing;
use nbweights_core::{NbErrorCode, NbWeightsConfig};

#[derive(Parser, Debug)]
#[command(name = "nbweights", version)]
#[command(about = "Extract model weights from a Jupyter notebook into JSON")]
struct Cli {
    /// Config file to use instead of ./nbweights.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging (NBWEIGHTS_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate the notebook's weight line and write weights.json
    Extract(ExtractArgs),
    /// List every line carrying a weight marker, without evaluating
    Scan(ScanArgs),
    /// Write model.json and weights.bin from an existing weights.json
    Pack(PackArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Notebook to read (default: extract.notebook from config)
    notebook: Option<PathBuf>,

    /// Output directory (default: ../models/transaction_model)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Marker substring; repeat to match several
    #[arg(short = 'm', long = "marker")]
    markers: Vec<String>,

    /// Which match wins: first | last-cell
    #[arg(long)]
    policy: Option<MatchPolicy>,

    /// Pretty-print weights.json
    #[arg(long)]
    pretty: bool,

    /// Also write a layers-model model.json
    #[arg(long)]
    manifest: bool,

    /// Also write weights.bin
    #[arg(long)]
    bin: bool,

    /// Print the conversion report as JSON
    #[arg(long)]
    report: bool,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Notebook to read (default: extract.notebook from config)
    notebook: Option<PathBuf>,

    /// Marker substring; repeat to match several
    #[arg(short = 'm', long = "marker")]
    markers: Vec<String>,
}

#[derive(Args, Debug)]
struct PackArgs {
    /// Directory holding weights.json
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

impl Command {
    fn overrides(&self) -> CliOverrides {
        match self {
            Self::Extract(args) => CliOverrides {
                notebook: args.notebook.clone(),
                output_dir: args.output_dir.clone(),
                markers: args.markers.clone(),
                policy: args.policy,
                pretty: args.pretty.then_some(true),
                manifest: args.manifest.then_some(true),
                bin: args.bin.then_some(true),
            },
            Self::Scan(args) => CliOverrides {
                notebook: args.notebook.clone(),
                markers: args.markers.clone(),
                ..Default::default()
            },
            Self::Pack(args) => CliOverrides {
                output_dir: args.output_dir.clone(),
                ..Default::default()
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", describe(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let config = NbWeightsConfig::load(&cwd, cli.config.as_deref(), Some(&cli.command.overrides()))
        .map_err(ConvertError::from)?;

    match &cli.command {
        Command::Extract(args) => {
            let report = convert(&config)?;
            println!("Weights saved to {}", report.weights_path.display());
            if args.report {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Command::Scan(_) => scan(&config)?,
        Command::Pack(_) => {
            let report = pack_existing(&config)?;
            println!(
                "Packed {} layers ({} bytes) into {} and {}",
                report.layers,
                report.bytes,
                report.manifest_path.display(),
                report.bin_path.display()
            );
        }
    }
    Ok(())
}

fn scan(config: &NbWeightsConfig) -> Result<(), ConvertError> {
    let path = config.notebook_path()?;
    let document = NotebookDocument::load(path)?;
    let scanner = MarkerScanner::new(&config.extract.effective_markers())?;

    let lines = scan_lines(&document.notebook, &scanner);
    if lines.is_empty() {
        println!("No weight markers in {}", path.display());
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// One line per marker match, tagged with the policies that would pick it.
fn scan_lines(notebook: &Notebook, scanner: &MarkerScanner) -> Vec<String> {
    let first = scanner.select(notebook, MatchPolicy::First);
    let last_cell = scanner.select(notebook, MatchPolicy::LastCell);

    scanner
        .scan_all(notebook)
        .iter()
        .map(|found| {
            let picks = [(MatchPolicy::First, &first), (MatchPolicy::LastCell, &last_cell)];
            let honored: Vec<&str> = picks
                .into_iter()
                .filter(|(_, picked)| picked.as_ref() == Some(found))
                .map(|(policy, _)| policy.as_str())
                .collect();
            let note = if honored.is_empty() {
                String::new()
            } else {
                format!("  <- {}", honored.join(", "))
            };
            format!(
                "cell {:>3} line {:>3} [{}] {}{}",
                found.cell,
                found.line,
                found.marker,
                found.text.trim_end(),
                note
            )
        })
        .collect()
}

/// `[ERROR_CODE] message` for conversion errors, the full chain otherwise.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ConvertError>() {
        Some(e) => e.diagnostic(),
        None => format!("{err:#}"),
    }
}
