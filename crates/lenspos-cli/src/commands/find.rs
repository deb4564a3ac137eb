use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use lenspos_core::PositionsFinder;
use tracing::info;

use crate::job::Job;
use crate::summary::{print_find_results, print_job_summary};
use crate::timeout::{parse_timeout, run_with_timeout};

#[derive(Args)]
pub struct FindArgs {
    /// Job file (TOML)
    pub job: PathBuf,

    /// Give up on a source after this many seconds
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Stop refining below this pixel scale (overrides the job)
    #[arg(long)]
    pub precision: Option<f64>,

    /// Report pixel-level positions without sub-pixel refinement
    #[arg(long)]
    pub no_upscaling: bool,
}

pub fn run(args: &FindArgs) -> Result<()> {
    let mut job = Job::load(&args.job)?;
    if let Some(precision) = args.precision {
        job.solver.pixel_scale_precision = precision;
    }
    if args.no_upscaling {
        job.solver.use_upscaling = false;
    }
    let timeout = parse_timeout(args.timeout)?;
    info!(path = %args.job.display(), sources = job.sources.len(), "Loaded job");

    print_job_summary(&job, "finder");

    let grid = job.grid.build().context("Invalid base grid")?;
    let finder = Arc::new(PositionsFinder::new(grid, job.solver.clone())?);
    let lens = Arc::new(job.lens.clone());

    let pb = ProgressBar::new(job.sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Solving [{bar:40}] {pos}/{len} sources")?
            .progress_chars("=> "),
    );

    let mut results = Vec::with_capacity(job.sources.len());
    for &source in &job.sources {
        let finder = Arc::clone(&finder);
        let lens = Arc::clone(&lens);
        let positions = run_with_timeout(timeout, move || finder.solve(lens.as_ref(), source))
            .with_context(|| format!("Source ({}, {})", source.y, source.x))??;
        results.push((source, positions));
        pb.inc(1);
    }
    pb.finish_and_clear();

    print_find_results(&results);
    Ok(())
}
