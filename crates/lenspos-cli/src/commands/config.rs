use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::job::Job;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the job to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save an example job as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let toml_str = toml::to_string_pretty(&Job::example()?)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write job to {}", path.display()))?;
        println!("Example job saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
