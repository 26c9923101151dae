//! Aspect correction of a photon event list.
//!
//! Reads a CSV event table, one or more RON attitude files and a RON telescope definition,
//! and writes the event table with sky pixel coordinates and sky referenced Stokes
//! parameters appended.

use anyhow::{Context, Result};
use attitude::prelude::AttitudeSources;
use clap::Parser;
use det2sky::prelude::*;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Transform detector event positions and Stokes parameters to J2000 sky coordinates"
)]
struct Cli {
    #[arg(long, help = "Input event table (CSV)")]
    infile: PathBuf,

    #[arg(long, help = "Output event table (CSV)")]
    outfile: PathBuf,

    #[arg(
        long,
        required = true,
        value_delimiter = ',',
        help = "Attitude files (RON), comma separated"
    )]
    attitude: Vec<PathBuf>,

    #[arg(long, help = "Telescope definition (RON)")]
    teldef: PathBuf,

    #[arg(long, help = "Optional run configuration (RON)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Also write spacecraft frame columns SCX, SCY")]
    sc: bool,

    #[arg(long, help = "Overwrite the output file if it exists")]
    clobber: bool,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if cli.outfile.exists() && !cli.clobber {
        anyhow::bail!("{} exists, pass --clobber to overwrite", cli.outfile.display());
    }

    let mut config = match &cli.config {
        Some(path) => AspectConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => AspectConfig::default(),
    };
    config.spacecraft |= cli.sc;

    let telescope = TelescopeDefinition::from_file(&cli.teldef)
        .with_context(|| format!("reading telescope definition {}", cli.teldef.display()))?;

    let mut sources = Vec::with_capacity(cli.attitude.len());
    for path in &cli.attitude {
        let file = AttitudeFile::from_path(path)
            .with_context(|| format!("reading attitude file {}", path.display()))?;
        sources.push(file.into_source(path.display().to_string(), &config.attitude));
    }
    let sources = AttitudeSources::new(sources).context("merging attitude sources")?;

    let table = CsvTable::from_path(&cli.infile)
        .with_context(|| format!("reading event table {}", cli.infile.display()))?;
    let events = table
        .event_table()
        .and_then(|t| t.records())
        .with_context(|| format!("parsing events from {}", cli.infile.display()))?;
    info!("read {} events from {}", events.len(), cli.infile.display());

    let correction = AspectCorrection::new(telescope, sources, config)?;
    let pixel_map = correction.pixel_map()?;
    let result = correction.run(&events, &pixel_map);

    write_output(&cli.outfile, cli.clobber, &table, &result)
        .with_context(|| format!("writing {}", cli.outfile.display()))?;
    info!("wrote {} ({})", cli.outfile.display(), result.summary());

    Ok(())
}
