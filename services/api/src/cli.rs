use crate::render::{run_render, run_request, RenderArgs, RequestArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use consent_form::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Building Consent Form",
    about = "Serve the building consent form or replay its inputs from the command line",
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
    /// Replay property and standards payloads and print the rendered form
    Render(RenderArgs),
    /// Print the rules engine request for an activity and property
    Request(RequestArgs),
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
        Command::Render(args) => run_render(args),
        Command::Request(args) => run_request(args),
    }
}
