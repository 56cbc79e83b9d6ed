use anyhow::Context;
use clap::Parser;
use usecase_pipeline::commands::{self, Workspace};

/// Write placeholder analyses without calling the completion API
#[derive(Parser)]
#[command(name = "sample-analysis")]
struct Args;

fn main() {
    usecase_pipeline::init_logging();
    Args::parse();

    if let Err(e) = run() {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let project_dir = std::env::current_dir().context("resolving working directory")?;
    let ws = Workspace::open(&project_dir).context("loading configuration")?;
    let report = commands::run_sample_analysis(&ws)?;

    println!("Sample analyses: {} episodes", report.episodes);
    println!("Index:           {} use cases", report.index.use_cases);
    println!("Wrote {}", ws.files.analyzed.path().display());
    println!("Wrote {}", ws.files.use_cases.path().display());
    Ok(())
}
