//! Report command - career assessment report

use std::path::PathBuf;

use clap::Args;

use super::bootstrap;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// JSON file holding the assessment responses
    #[arg(short, long)]
    pub input: PathBuf,
}

pub async fn run(args: ReportArgs) -> anyhow::Result<()> {
    let engine = bootstrap::start().await?;
    let assessment: serde_json::Value = bootstrap::read_json(&args.input).await?;

    let report = engine.reports.generate(&assessment).await?;

    bootstrap::print_json(&report)
}
