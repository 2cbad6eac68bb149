//! settings-sync CLI
//!
//! Uploads and downloads editor settings to and from a GitHub Gist.

mod cli;
mod commands;
mod error;
mod logging;
mod session;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;
use session::Session;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let Some(command) = cli.command.clone() else {
        println!("{} Editor settings sync", "settings-sync".green().bold());
        println!();
        println!("Run {} for available commands.", "settings-sync --help".cyan());
        return Ok(());
    };

    let mut session = Session::load(&cli)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(execute_command(command, &mut session))
}

async fn execute_command(cmd: Commands, session: &mut Session) -> Result<()> {
    match cmd {
        Commands::Init {
            enterprise_url,
            public,
        } => commands::run_init(session, enterprise_url, public),
        Commands::Upload => commands::run_upload(session).await,
        Commands::Download { force } => commands::run_download(session, force).await,
        Commands::Status { offline } => commands::run_status(session, offline).await,
    }
}
