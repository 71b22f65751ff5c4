use anyhow::Result;
use clap::Parser;
use starsort::app::{RunOptions, run};
use std::path::PathBuf;

/// starsort - sort your GitHub stars
///
/// Fetch the repositories a GitHub user has starred, assign each one a
/// category (AI, Programming, Design, Game, Utility Tools, Other) and write
/// the grouped result as JSON.
///
/// If no --token is given, the GITHUB_TOKEN environment variable is used.
/// Without any token only the first 200 repositories are fetched.
///
/// Examples:
///   starsort --username octocat
///   starsort -u octocat --token ghp_xxx --output stars/octocat.json
#[derive(Parser, Debug)]
#[command(author, version = env!("STARSORT_VERSION"), about)]
struct Cli {
    /// GitHub username whose stars are fetched
    #[arg(long, short = 'u', value_name = "USERNAME")]
    username: String,

    /// GitHub personal access token (helps with rate limits)
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Output file path
    #[arg(long, short = 'o', value_name = "PATH", default_value = "./output.json")]
    output: PathBuf,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL")]
    api_url: Option<String>,

    /// Maximum number of pages of 100 repositories to fetch
    /// (defaults to unlimited with a token, 2 without)
    #[arg(long = "max-pages", value_name = "N")]
    max_pages: Option<u32>,
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        RunOptions {
            username: cli.username,
            token: cli.token,
            output: cli.output,
            api_url: cli.api_url,
            max_pages: cli.max_pages,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = starsort::runtime::RealRuntime;

    run(runtime, cli.into()).await?;
    Ok(())
}
