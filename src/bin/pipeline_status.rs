use anyhow::Context;
use clap::Parser;
use usecase_pipeline::commands::{self, Workspace};

/// Summarize what each pipeline stage has produced so far
#[derive(Parser)]
#[command(name = "pipeline-status")]
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
    let status = commands::pipeline_status(&ws)?;

    println!("{}", status);
    Ok(())
}
