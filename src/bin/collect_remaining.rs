use anyhow::Context;
use clap::Parser;
use usecase_pipeline::commands::{self, Workspace};

/// Recover missing transcripts from subtitle files
#[derive(Parser)]
#[command(name = "collect-remaining")]
struct Args;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    usecase_pipeline::init_logging();
    Args::parse();

    if let Err(e) = run().await {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let project_dir = std::env::current_dir().context("resolving working directory")?;
    let ws = Workspace::open(&project_dir).context("loading configuration")?;
    let summary = commands::run_recover(&ws).await?;

    if summary.missing == 0 {
        println!("All {} episodes already have transcripts", summary.total);
        return Ok(());
    }
    println!("Recovered:     {}/{}", summary.recovered, summary.missing);
    println!("Still missing: {}", summary.still_missing);
    println!(
        "With transcript: {}/{}",
        summary.with_transcript, summary.total
    );
    Ok(())
}
