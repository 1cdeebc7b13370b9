//! Follow-ups command - generate, check and regenerate follow-up questions

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::domain::question::GenerationContext;

use super::bootstrap;

#[derive(Args, Debug)]
pub struct FollowUpsArgs {
    /// JSON file holding the assessment responses
    #[arg(short, long)]
    pub input: PathBuf,

    /// Number of questions to request (defaults to `generator.question_count`)
    #[arg(short, long)]
    pub count: Option<usize>,
}

pub async fn run(args: FollowUpsArgs) -> anyhow::Result<()> {
    let engine = bootstrap::start().await?;
    let assessment: serde_json::Value = bootstrap::read_json(&args.input).await?;

    let count = args.count.unwrap_or(engine.question_count);
    let outcome = engine
        .orchestrator
        .run(&GenerationContext::new(assessment, count))
        .await?;

    info!(
        questions = outcome.questions.len(),
        duplicates = outcome.duplicates.len(),
        regenerated = outcome.regenerated,
        "Follow-up questions ready"
    );

    bootstrap::print_json(&outcome)
}
