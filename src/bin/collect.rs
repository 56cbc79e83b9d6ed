use anyhow::Context;
use clap::Parser;
use usecase_pipeline::commands::{self, Workspace};

/// List the channel's videos and fetch timed transcripts into the catalog
#[derive(Parser)]
#[command(name = "collect")]
struct Args {
    /// Ignore the existing catalog and re-fetch every transcript
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
    let summary = commands::run_collect(&ws, args.force).await?;

    println!("Listed:    {} videos", summary.listed);
    println!("Discarded: {} shorts", summary.discarded);
    println!("Fetched:   {}", summary.fetched);
    println!("Cached:    {}", summary.skipped);
    println!("Failed:    {}", summary.failed);
    if summary.retained > 0 {
        println!("Retained:  {} episodes no longer listed", summary.retained);
    }
    println!("Catalog:   {}", ws.files.catalog.path().display());
    Ok(())
}
