//! CLI module for Survey Dedup
//!
//! Provides subcommands that drive the engine from JSON files:
//! - `check`: report near-duplicate questions and options
//! - `follow-ups`: generate follow-up questions, regenerating once on duplicates
//! - `report`: generate a career assessment report
//! - `embed`: fetch embeddings through the tiered cache

pub mod check;
pub mod embed;
pub mod follow_ups;
pub mod report;

mod bootstrap;

use clap::{Parser, Subcommand};

/// Survey Dedup - Embedding cache and near-duplicate checks for assessment questions
#[derive(Parser)]
#[command(name = "survey-dedup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a question set for near-duplicates
    Check(check::CheckArgs),

    /// Generate follow-up questions for assessment responses
    FollowUps(follow_ups::FollowUpsArgs),

    /// Generate a career report for assessment responses
    Report(report::ReportArgs),

    /// Fetch embeddings for texts
    Embed(embed::EmbedArgs),
}
