use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use hat_draw::{Report, Settings};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "hat_draw",
    version,
    about = "Estimate how often a hat draw forms a single cycle"
)]
struct Opt {
    /// toml settings file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    n_min: Option<usize>,
    /// exclusive
    #[arg(long)]
    n_max: Option<usize>,
    #[arg(short = 'k', long)]
    trials: Option<u64>,
    /// n for the per-permutation table
    #[arg(short = 'n', long = "n")]
    n: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_restarts: Option<u64>,
    #[arg(long)]
    exact_up_to: Option<usize>,
    #[arg(long)]
    confidence: Option<f64>,
    #[arg(long)]
    json: bool,
    #[arg(long)]
    no_sweep: bool,
    #[arg(long)]
    no_stats: bool,
}

impl Opt {
    fn settings(&self) -> Result<Settings, Box<dyn Error>> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        if let Some(v) = self.n_min {
            settings.n_min = v;
        }
        if let Some(v) = self.n_max {
            settings.n_max = v;
        }
        if let Some(v) = self.trials {
            settings.trials = v;
        }
        if let Some(v) = self.n {
            settings.n = v;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(v) = self.max_restarts {
            settings.max_restarts = v;
        }
        if let Some(v) = self.exact_up_to {
            settings.exact_up_to = v;
        }
        if let Some(v) = self.confidence {
            settings.confidence = v;
        }
        Ok(settings)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let opts = Opt::parse();
    let settings = opts.settings()?;
    info!(?settings, "starting");

    let mut rng = match settings.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    };

    let report = Report::run(&settings, &mut rng, !opts.no_sweep, !opts.no_stats)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if opts.json {
        writeln!(out, "{}", report.to_json()?)?;
    } else {
        report.write_text(&mut out)?;
    }
    out.flush()?;
    Ok(())
}
