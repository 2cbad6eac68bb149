//! Download command implementation

use colored::Colorize;
use sync_core::{
    CodeExtensionHost, CustomSettings, DownloadOptions, DownloadOutcome, Downloader, LogNotifier,
    PragmaTransform, SyncContext,
};

use crate::error::Result;
use crate::session::Session;

/// Download the configured gist into the user folder.
pub async fn run_download(session: &mut Session, force: bool) -> Result<()> {
    let gist = session.require_gist()?;
    let store = session.store()?;
    let mut descriptor = CustomSettings::load_or_default(&session.env)?;

    let ctx = SyncContext::new(session.env.clone()).with_host_name(descriptor.host_name.clone());
    let host = CodeExtensionHost::new(session.env.extensions_dir.clone(), &session.config.code_binary);
    let notifier = LogNotifier::new(session.config.quiet_sync);
    let options = DownloadOptions {
        force_download: force || session.config.force_download,
        sync_extensions: session.config.sync_extensions,
        remove_extensions: session.config.remove_extensions,
    };

    let outcome = Downloader::new(&ctx, &store, &PragmaTransform, &notifier)
        .with_extension_host(&host)
        .download(&gist, &descriptor, &options)
        .await?;

    let result = match outcome {
        DownloadOutcome::AlreadyCurrent => {
            println!(
                "{} Already up to date (use {} to download anyway)",
                "=".dimmed(),
                "--force".cyan()
            );
            return Ok(());
        }
        DownloadOutcome::Updated(result) => result,
    };

    if let Some(timestamp) = result.remote_timestamp {
        descriptor.last_download = Some(timestamp);
    }
    descriptor.save(&session.env)?;
    if result.public && !session.config.public_gist {
        session.config.public_gist = true;
        session.save_config()?;
    }

    println!(
        "{} Downloaded {} files from gist {}",
        "✓".green().bold(),
        result.updated_files.len(),
        gist.cyan()
    );
    for ext in &result.added_extensions {
        println!("  {} {}", "+".green(), ext.identifier);
    }
    for ext in &result.deleted_extensions {
        println!("  {} {}", "-".red(), ext.identifier);
    }
    for key in &result.failed_writes {
        println!("  {} {} (not written)", "!".yellow(), key);
    }
    Ok(())
}
