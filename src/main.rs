use clap::Parser;
use survey_dedup::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check(args) => cli::check::run(args).await,
        Command::FollowUps(args) => cli::follow_ups::run(args).await,
        Command::Report(args) => cli::report::run(args).await,
        Command::Embed(args) => cli::embed::run(args).await,
    }
}
