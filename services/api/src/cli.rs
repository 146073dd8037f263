use crate::demo::{run_demo, run_import, run_score, DemoArgs, ImportArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ecobrand::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "EcoBrand",
    about = "Score the environmental impact of consumer products and serve the EcoBrand catalog",
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
    /// Compute an eco-score from attributes given on the command line or in a JSON file
    Score(ScoreArgs),
    /// Load a legacy catalog CSV export and rank the imported products
    Import(ImportArgs),
    /// Walk through scoring, search, and alternatives on a sample catalog
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Import(args) => run_import(args),
        Command::Demo(args) => run_demo(args),
    }
}
