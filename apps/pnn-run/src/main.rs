//! pnn-run — simulate one point-neurone network experiment.
//!
//! Reads an experiment document, assembles its network, runs the scheduler to
//! the time horizon and writes:
//!
//! * `<network>.ras` — the spike raster,
//! * `reports.csv` / `spikes.csv` / `firing_rates.csv` (or `results.db` with
//!   `--format sqlite`),
//! * `<network>.png` when built with the `png` feature and `--png` is given.
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` for per-projection
//! detail.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pnn_core::RunConfig;
use pnn_model::Experiment;
use pnn_network::{Assembler, Network};
use pnn_output::{CsvWriter, OutputWriter, ReportSet, Results, SimOutputObserver, write_raster};
use pnn_sim::{ProgressLogger, RunStats, SchedulerBuilder, SimObserver};

// ── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "pnn-run", version, about = "Point-neurone network co-simulation")]
struct Args {
    /// Experiment document (JSON) with exactly one simulation task.
    experiment: PathBuf,

    /// Directory receiving the raster, reports and firing rates.
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Override the task's master seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Abort when one boundary delivers more events than this.
    #[arg(long)]
    max_drain_events: Option<u64>,

    /// Backend for report samples, spikes and firing rates.
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Also render the raster as a PNG image.
    #[arg(long, default_value_t = false)]
    png: bool,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Sqlite,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Report sampling plus progress logging.
struct RunObserver<W: OutputWriter> {
    output:   SimOutputObserver<W>,
    progress: ProgressLogger,
}

impl<W: OutputWriter> SimObserver for RunObserver<W> {
    fn on_boundary_end(&mut self, time: f64, network: &Network) {
        self.output.on_boundary_end(time, network);
    }

    fn on_progress(&mut self, fraction: f64) {
        self.progress.on_progress(fraction);
    }

    fn on_sim_end(&mut self, stats: &RunStats) {
        self.output.on_sim_end(stats);
        self.progress.on_sim_end(stats);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let experiment = Experiment::from_file(&args.experiment)
        .with_context(|| format!("reading experiment {}", args.experiment.display()))?;
    let task = experiment.single_task()?;
    let base_dir = args.experiment.parent().unwrap_or(Path::new(".")).to_path_buf();
    let model = task.load_model(&base_dir)?;

    let mut config = task.run_config()?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.max_drain_events.is_some() {
        config.max_drain_events = args.max_drain_events;
    }
    info!(
        task     = %task.name,
        network  = %model.name,
        interval = config.reporting_interval,
        horizon  = config.time_horizon,
        seed     = config.seed,
        "experiment loaded"
    );

    let network = Assembler::new(&model).in_dir(&base_dir).seed(config.seed).assemble()?;
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let run = match args.format {
        Format::Csv => simulate(CsvWriter::new(&args.output)?, &config, network, &task.reports)?,
        Format::Sqlite => simulate(sqlite_writer(&args.output)?, &config, network, &task.reports)?,
    };

    let ras = args.output.join(format!("{}.ras", model.name));
    write_raster(&ras, &run.results.raster)?;
    info!(path = %ras.display(), spikes = run.results.raster.len(), "raster written");

    if args.png {
        write_png(&args.output.join(format!("{}.png", model.name)), &run.results, &run.stats)?;
    }

    print!("{}", run.stats);
    println!();
    println!("{:<24} {:>8} {:>10} {:>12}", "Population", "Neurons", "Spikes", "Rate (Hz)");
    println!("{}", "-".repeat(57));
    for r in &run.results.rates {
        println!("{:<24} {:>8} {:>10} {:>12.3}", r.population, r.neurons, r.spikes, r.rate);
    }

    match run.failure {
        Some(e) => Err(e.context(format!("run aborted at t = {} s; partial results written", run.stats.time))),
        None => Ok(()),
    }
}

struct Run {
    stats:   RunStats,
    results: Results,
    /// Set when the scheduler stopped before the horizon.
    failure: Option<anyhow::Error>,
}

/// Build and run the scheduler, writing samples and results to `writer`.
///
/// A failing run still yields the spikes and rates recorded up to the last
/// boundary reached.
fn simulate<W: OutputWriter>(
    writer:  W,
    config:  &RunConfig,
    network: Network,
    reports: &[String],
) -> Result<Run> {
    let mut scheduler = SchedulerBuilder::new(config.clone(), network).build()?;

    let reports = ReportSet::resolve(reports, scheduler.network())?;
    let mut obs = RunObserver {
        output:   SimOutputObserver::new(writer, reports),
        progress: ProgressLogger::default(),
    };
    obs.output.record(0.0, scheduler.network());

    let t0 = Instant::now();
    let outcome = scheduler.run(&mut obs);
    info!(elapsed_s = t0.elapsed().as_secs_f64(), "run complete");

    if let Some(e) = obs.output.take_error() {
        warn!(error = %e, "report output failed");
        return Err(e.into());
    }

    let (stats, results, failure) = match outcome {
        Ok(stats) => {
            let network = scheduler.finalize()?;
            let results = Results::collect(&network, config.time_horizon);
            (stats, results, None)
        }
        Err(e) => {
            let stats = scheduler.stats();
            warn!(error = %e, time = stats.time, "run aborted, collecting partial results");
            let results = Results::collect(scheduler.network(), stats.time);
            (stats, results, Some(e.into()))
        }
    };
    obs.output.finish(&results)?;
    Ok(Run { stats, results, failure })
}

#[cfg(feature = "sqlite")]
fn sqlite_writer(dir: &Path) -> Result<pnn_output::SqliteWriter> {
    Ok(pnn_output::SqliteWriter::new(dir)?)
}

#[cfg(not(feature = "sqlite"))]
fn sqlite_writer(_dir: &Path) -> Result<CsvWriter> {
    anyhow::bail!("this binary was built without the `sqlite` feature")
}

#[cfg(feature = "png")]
fn write_png(path: &Path, results: &Results, stats: &RunStats) -> Result<()> {
    pnn_output::write_raster_png(path, &results.raster, stats.time)?;
    info!(path = %path.display(), "raster image written");
    Ok(())
}

#[cfg(not(feature = "png"))]
fn write_png(_path: &Path, _results: &Results, _stats: &RunStats) -> Result<()> {
    anyhow::bail!("this binary was built without the `png` feature")
}
