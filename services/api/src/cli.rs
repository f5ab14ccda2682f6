use crate::commands::{run_checklist, run_export, ChecklistArgs, ExportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use internal_audit::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "internal-audit",
    about = "Collect Imaging CRO internal audit checklists and export CSV/PDF reports",
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
    /// Print the checklist definition or a blank submission template
    Checklist(ChecklistArgs),
    /// Export a submitted answers file to CSV and PDF
    Export(ExportArgs),
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
        Command::Checklist(args) => run_checklist(args),
        Command::Export(args) => run_export(args),
    }
}
