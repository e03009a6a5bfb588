use crate::demo::{run_demo, run_import, DemoArgs, ImportArgs};
use crate::server;
use crate::watch::{run_watch, WatchArgs};
use clap::{Args, Parser, Subcommand};
use ride_dispatch::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Ride Dispatch Queues",
    about = "Run and inspect the rideshare dispatch priority queues from the command line",
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
    /// Seed a board with sample or exported orders and print the queues
    Demo(DemoArgs),
    /// Admit an order CSV export into a fresh board and report placements
    Import(ImportArgs),
    /// Poll a running service and print queue counts until interrupted
    Watch(WatchArgs),
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
        Command::Demo(args) => run_demo(args),
        Command::Import(args) => run_import(args),
        Command::Watch(args) => run_watch(args).await,
    }
}
