use crate::report::{run_search, run_summary, SearchArgs, SummaryArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use district_atlas::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "district-atlas",
    about = "Serve and query school-district finance data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print spending totals for the loaded dataset
    Summary(SummaryArgs),
    /// Search districts by name, campus name, spending floor, or debt ceiling
    Search(SearchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the district dataset path
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Override the newsletter store path
    #[arg(long)]
    pub(crate) newsletter: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Summary(args) => run_summary(args),
        Command::Search(args) => run_search(args),
    }
}
