use anyhow::Context;
use clap::Parser;
use usecase_pipeline::commands::{self, Workspace};

/// Extract structured use cases from every cataloged episode
#[derive(Parser)]
#[command(name = "analyze")]
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
    let report = commands::run_analyze(&ws).await?;
    let a = &report.analysis;

    println!("Episodes:         {}", a.total);
    println!("Already analyzed: {}", a.already_analyzed);
    println!("No content:       {}", a.no_content);
    println!(
        "Analyzed:         {} ({} transcript, {} description only)",
        a.analyzed, a.with_transcript, a.description_only
    );
    println!("Failed:           {}", a.failed);
    println!(
        "Index:            {} use cases from {} episodes",
        report.index.use_cases, report.index.episodes
    );
    Ok(())
}
