use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use lenspos_core::grid::Coordinate;
use lenspos_core::{LensPosError, PositionsPairer};
use tracing::warn;

use crate::job::Job;
use crate::summary::{print_job_summary, print_pair_results};
use crate::timeout::{parse_timeout, run_with_timeout};

#[derive(Args)]
pub struct PairArgs {
    /// Job file (TOML)
    pub job: PathBuf,

    /// Give up on a position after this many seconds
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Index of the source the positions belong to
    #[arg(long, default_value = "0")]
    pub source: usize,
}

pub fn run(args: &PairArgs) -> Result<()> {
    let job = Job::load(&args.job)?;
    let timeout = parse_timeout(args.timeout)?;

    let Some(&source) = job.sources.get(args.source) else {
        bail!(
            "Source index {} out of range (job has {})",
            args.source,
            job.sources.len()
        );
    };
    if job.positions.is_empty() {
        bail!("Job lists no observed positions to pair");
    }

    print_job_summary(&job, "pairer");

    let pairer = Arc::new(PositionsPairer::new(job.solver.clone(), job.pairer.clone())?);
    let lens = Arc::new(job.lens.clone());

    let pb = ProgressBar::new(job.positions.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Pairing [{bar:40}] {pos}/{len} positions")?
            .progress_chars("=> "),
    );

    let mut pairs: Vec<(Coordinate, Option<Coordinate>)> = Vec::with_capacity(job.positions.len());
    for &position in &job.positions {
        let pairer = Arc::clone(&pairer);
        let lens = Arc::clone(&lens);
        let result = run_with_timeout(timeout, move || pairer.solve(lens.as_ref(), position, source))
            .with_context(|| format!("Position ({}, {})", position.y, position.x))?;
        let paired = match result {
            Ok(paired) => Some(paired),
            Err(e @ LensPosError::PairingNotFound { .. }) => {
                warn!("{e}");
                None
            }
            Err(e) => return Err(e.into()),
        };
        pairs.push((position, paired));
        pb.inc(1);
    }
    pb.finish_and_clear();

    print_pair_results(&source, &pairs);

    let unpaired = pairs.iter().filter(|(_, p)| p.is_none()).count();
    if unpaired > 0 {
        bail!("{unpaired} position(s) could not be paired");
    }
    Ok(())
}
