mod cli;
mod commands;
mod config;
mod context;
mod output;
mod timing;
mod utils;

use anyhow::Result;
use clap::Parser as _;
use directory_business::RawConfig;

use crate::cli::{Cli, Commands, ListArgs};
use crate::commands::{generate_completions, run_companies, run_list, run_show};
use crate::config::Config;
use crate::context::build_fetcher;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    timing::init_tracing(cli.verbose, cli.timing);

    let command = cli.command.unwrap_or_else(|| {
        Commands::List(ListArgs {
            page: 1,
            ..ListArgs::default()
        })
    });

    if let Commands::Completions { shell } = command {
        generate_completions(shell);
        return Ok(());
    }

    let page_size_flag = match &command {
        Commands::List(args) => args.page_size,
        _ => None,
    };
    let flags = RawConfig {
        api_url: cli.api_url,
        page_size: page_size_flag,
        ..RawConfig::default()
    };
    let config = config::resolve(Config::load()?, RawConfig::from_env()?, flags)?;
    let fetcher = build_fetcher(&config)?;

    match command {
        Commands::List(args) => run_list(&fetcher, &args, config.page_size).await,
        Commands::Companies => run_companies(&fetcher).await,
        Commands::Show { id } => run_show(&fetcher, &id).await,
        Commands::Completions { .. } => Ok(()),
    }
}
