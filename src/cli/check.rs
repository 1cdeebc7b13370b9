//! Check command - near-duplicate report for an existing question set

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::domain::question::Question;

use super::bootstrap;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON file holding an array of `{id, text, options}` questions
    #[arg(short, long)]
    pub input: PathBuf,
}

/// Print every near-duplicate pair as JSON
pub async fn run(args: CheckArgs) -> anyhow::Result<()> {
    let engine = bootstrap::start().await?;
    let questions: Vec<Question> = bootstrap::read_json(&args.input).await?;

    let pairs = engine.detector.detect(&questions).await?;

    for pair in &pairs {
        info!("{}", pair.describe());
    }
    info!(
        questions = questions.len(),
        pairs = pairs.len(),
        "Similarity check complete"
    );

    bootstrap::print_json(&pairs)
}
