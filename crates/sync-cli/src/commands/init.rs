//! Init command implementation

use colored::Colorize;
use sync_core::CustomSettings;
use sync_fs::io;

use crate::error::Result;
use crate::session::Session;

/// Create the descriptor (if missing) and write the tool configuration.
pub fn run_init(session: &mut Session, enterprise_url: Option<String>, public: bool) -> Result<()> {
    io::create_dir_all(&session.env.user_folder)?;

    let descriptor_path = session.env.descriptor_path();
    if descriptor_path.exists() {
        println!(
            "{} Descriptor already exists at {}",
            "=".dimmed(),
            descriptor_path.as_str().cyan()
        );
    } else {
        CustomSettings::default().save(&session.env)?;
        println!(
            "{} Created descriptor {}",
            "+".green(),
            descriptor_path.as_str().cyan()
        );
    }

    if enterprise_url.is_some() {
        session.config.github_enterprise_url = enterprise_url;
    }
    if public {
        session.config.public_gist = true;
    }
    session.save_config()?;
    println!(
        "{} Wrote configuration {}",
        "+".green(),
        session.config_path.as_str().cyan()
    );

    if session.config.token.is_none() {
        println!();
        println!(
            "Set a token with {} before uploading.",
            "settings-sync init --token <TOKEN>".cyan()
        );
    }
    Ok(())
}
