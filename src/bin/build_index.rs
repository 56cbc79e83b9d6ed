use anyhow::Context;
use clap::Parser;
use usecase_pipeline::commands::{self, Workspace};

/// Rebuild the flat use-case index from analyzed episodes
#[derive(Parser)]
#[command(name = "build-index")]
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
    let summary = commands::run_build_index(&ws)?;

    println!(
        "Built index: {} use cases from {} episodes",
        summary.use_cases, summary.episodes
    );
    if summary.carried > 0 {
        println!("Kept enrichment on {} use cases", summary.carried);
    }
    println!("Wrote {}", ws.files.use_cases.path().display());
    Ok(())
}
