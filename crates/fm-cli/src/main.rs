//! floodmob — road accessibility to critical facilities under flood scenarios.
//!
//! ```text
//! floodmob run --config flood.json          # compute and write all layers
//! floodmob inspect --config flood.json      # show network, facilities, scenarios
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use fm_analysis::{AnalysisBuilder, AnalysisObserver, Phase};
use fm_core::AnalysisConfig;
use fm_engine::{UnitFailure, UnitReport};

// ── CLI structure ─────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "floodmob")]
#[command(author, version, about = "Flood-scenario road accessibility analysis", long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and write the result layers
    Run {
        /// JSON analysis configuration
        #[arg(short, long)]
        config: PathBuf,
        /// Override `output_dir`
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Override `threads`
        #[arg(short, long)]
        threads: Option<usize>,
    },
    /// Load inputs and report what a run would cover
    Inspect {
        /// JSON analysis configuration
        #[arg(short, long)]
        config: PathBuf,
    },
}

// ── Progress ──────────────────────────────────────────────────────────────────

/// Logs phase boundaries and per-unit results.
struct LogObserver {
    started: Option<Instant>,
}

impl AnalysisObserver for LogObserver {
    fn on_phase_start(&mut self, phase: Phase, units: usize) {
        self.started = Some(Instant::now());
        info!(units, "{phase}: started");
    }

    fn on_unit_complete(&mut self, r: &UnitReport) {
        info!(
            scenario = %r.scenario,
            facility = %r.facility,
            removed_links = r.removed_links,
            unreachable = r.unreachable,
            "unit done"
        );
    }

    fn on_unit_failed(&mut self, f: &UnitFailure) {
        warn!(scenario = %f.scenario, facility = %f.facility, error = %f.error, "unit failed");
    }

    fn on_phase_end(&mut self, phase: Phase) {
        let secs = self.started.take().map(|t| t.elapsed().as_secs_f64()).unwrap_or_default();
        info!("{phase}: done in {secs:.2}s");
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn load_config(path: &Path) -> Result<AnalysisConfig> {
    AnalysisConfig::from_json_path(path)
        .with_context(|| format!("reading configuration {}", path.display()))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Run { config, output_dir, threads } => {
            let t0 = Instant::now();
            let mut cfg = load_config(&config)?;
            if let Some(dir) = output_dir {
                cfg.output_dir = dir;
            }
            if threads.is_some() {
                cfg.threads = threads;
            }

            let analysis = AnalysisBuilder::new(cfg).build().context("loading inputs")?;
            let output = analysis.run(&mut LogObserver { started: None }).context("running analysis")?;
            analysis.write(&output).context("writing results")?;

            if !output.failures.is_empty() || output.cancelled > 0 {
                warn!(
                    failed = output.failures.len(),
                    cancelled = output.cancelled,
                    "some scenario units produced no results"
                );
            }
            info!(
                elapsed_secs = t0.elapsed().as_secs_f64(),
                output_dir = %analysis.config().output_dir.display(),
                "analysis completed"
            );
        }

        Commands::Inspect { config } => {
            let analysis = AnalysisBuilder::new(load_config(&config)?).build().context("loading inputs")?;
            let net = analysis.network();
            println!(
                "Network: {} vertices, {} links ({})",
                net.vertex_count(),
                net.link_count(),
                if net.is_directed() { "directed" } else { "undirected" },
            );
            println!("CRS: {}", net.crs());
            println!("\nFacilities:");
            for f in analysis.facilities().iter() {
                println!("  {:<24} {} access vertices", f.label, f.access.len());
            }
            println!("\nScenarios:");
            for s in analysis.scenarios() {
                println!("  {s}");
            }
            let cfg = analysis.config();
            println!(
                "\nLink removal above {}, flood tags at {} ({} units)",
                cfg.link_removal_threshold,
                cfg.wading_height(),
                analysis.scenarios().len() * analysis.facilities().len(),
            );
        }
    }

    Ok(())
}
