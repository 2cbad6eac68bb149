//! Status command implementation

use colored::Colorize;
use sync_core::{CustomSettings, MarkerDocument};
use sync_fs::UserFile;
use sync_store::DocumentStore;

use crate::error::Result;
use crate::session::Session;

/// Print configuration, local timestamps and the remote marker.
pub async fn run_status(session: &Session, offline: bool) -> Result<()> {
    println!("{}", "Settings Sync Status".bold());
    println!();
    println!("{}:  {}", "Config".dimmed(), session.config_path);
    println!("{}:    {}", "User".dimmed(), session.env.user_folder);
    println!(
        "{}:    {}",
        "Gist".dimmed(),
        session.config.gist_id().unwrap_or("not configured").cyan()
    );
    println!(
        "{}:   {}",
        "Token".dimmed(),
        if session.config.token.is_some() { "set" } else { "not set" }
    );

    let descriptor_path = session.env.descriptor_path();
    if !descriptor_path.exists() {
        println!();
        println!(
            "{} Descriptor not found; run {}",
            "!".yellow(),
            "settings-sync init".cyan()
        );
        return Ok(());
    }

    let descriptor = CustomSettings::load(&session.env)?;
    let show = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map(|t| t.to_rfc3339()).unwrap_or_else(|| "never".to_string())
    };
    println!("{}:   {}", "Upload".dimmed(), show(descriptor.last_upload));
    println!("{}: {}", "Download".dimmed(), show(descriptor.last_download));

    if offline {
        return Ok(());
    }
    let Some(gist) = session.config.gist_id() else {
        return Ok(());
    };

    let store = session.store()?;
    let document = store.read_document(gist).await?;
    let remote = document
        .content(UserFile::Marker.as_str())
        .and_then(|c| MarkerDocument::parse(c).ok());
    match remote {
        Some(marker) => {
            let state = if marker.is_current(descriptor.last_download, descriptor.last_upload) {
                "up to date".green()
            } else {
                "remote differs".yellow()
            };
            println!(
                "{}:   {} ({})",
                "Remote".dimmed(),
                marker.last_upload.to_rfc3339(),
                state
            );
        }
        None => println!("{}:   {}", "Remote".dimmed(), "no marker".dimmed()),
    }
    Ok(())
}
