use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "user-directory")]
#[command(about = "Browse the user directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the directory API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List users, one page at a time (default)
    List(ListArgs),
    /// List the companies users work for
    Companies,
    /// Show one user's details
    Show {
        /// User ID, or a `/user/{id}` path
        id: String,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ListArgs {
    /// Only users whose name contains this text (case-insensitive)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only users working for this company
    #[arg(long, short = 'c')]
    pub company: Option<String>,

    /// Page to show, starting at 1
    #[arg(long, short = 'p', default_value = "1")]
    pub page: usize,

    /// Users per page
    #[arg(long)]
    pub page_size: Option<usize>,
}
