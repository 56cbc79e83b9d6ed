use anyhow::Context;
use clap::Parser;
use usecase_pipeline::commands::{self, Workspace};

/// Tag each use case with intents and mark editor's picks
#[derive(Parser)]
#[command(name = "enrich")]
struct Args {
    /// Re-enrich use cases that already carry intents
    #[arg(long)]
    force: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    usecase_pipeline::init_logging();
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let project_dir = std::env::current_dir().context("resolving working directory")?;
    let ws = Workspace::open(&project_dir).context("loading configuration")?;
    let summary = commands::run_enrich(&ws, args.force).await?;

    println!("Use cases: {}", summary.total);
    println!(
        "Batches:   {} ({} skipped, {} failed)",
        summary.batches, summary.batches_skipped, summary.batches_failed
    );
    println!("Updated:   {}", summary.updated);
    println!("Picks:     {}", summary.picks);
    println!();
    println!("Intent distribution:");
    for (intent, count) in &summary.distribution {
        println!("  {:<25} {}", intent.as_str(), count);
    }
    Ok(())
}
