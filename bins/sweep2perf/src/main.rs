use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let metrics = sweep2perf(&args)?;
    println!("{metrics}");
    Ok(())
}

/// Arguments to [`sweep2perf`].
#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "Extract amplifier performance metrics from simulator sweep output"
)]
pub struct Args {
    /// The directory containing the simulator output tables.
    dir: PathBuf,
    /// The AC sweep table file name within the directory.
    #[arg(long, default_value = "ac.csv")]
    ac: String,
    /// The DC operating-point table file name within the directory.
    #[arg(long, default_value = "dc.csv")]
    dc: String,
}

/// Reads the AC/DC tables named by `args` and extracts amplifier metrics.
pub fn sweep2perf(args: &Args) -> anyhow::Result<ampmeas::Metrics> {
    let ac_path = args.dir.join(&args.ac);
    let dc_path = args.dir.join(&args.dc);

    let ac = std::fs::read(&ac_path)
        .with_context(|| format!("Failed to read AC sweep table {:?}.", ac_path))?;
    let dc = std::fs::read(&dc_path)
        .with_context(|| format!("Failed to read DC operating-point table {:?}.", dc_path))?;

    let sweep = ampmeas::parser::parse_ac(&ac)
        .with_context(|| format!("Failed to parse AC sweep table {:?}.", ac_path))?;
    let bias = ampmeas::parser::parse_dc(&dc)
        .with_context(|| format!("Failed to parse DC operating-point table {:?}.", dc_path))?;

    ampmeas::extract(&sweep, bias).with_context(|| "Failed to extract metrics.")
}
