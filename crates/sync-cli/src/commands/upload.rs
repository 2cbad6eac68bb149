//! Upload command implementation

use std::io::IsTerminal;

use chrono::Utc;
use colored::Colorize;
use dialoguer::Input;
use sync_core::{
    CodeExtensionHost, CustomSettings, LogNotifier, PragmaTransform, SyncContext, UploadOptions,
    Uploader,
};

use crate::error::Result;
use crate::session::Session;

/// Upload the local configuration and record the result.
pub async fn run_upload(session: &mut Session) -> Result<()> {
    // A missing descriptor aborts before any prompt or network call
    let mut descriptor = CustomSettings::load(&session.env)?;
    let store = session.store()?;
    let document_id = session.config.gist_id().map(str::to_string);

    let description = if document_id.is_none() {
        gist_description(&descriptor)?
    } else {
        descriptor.gist_description.clone()
    };

    let mut ctx = SyncContext::new(session.env.clone()).with_host_name(descriptor.host_name.clone());
    if let Some(login) = session.identity(&store).await {
        ctx = ctx.with_identity(login);
    }

    let host = CodeExtensionHost::new(session.env.extensions_dir.clone(), &session.config.code_binary);
    let notifier = LogNotifier::new(session.config.quiet_sync);
    let options = UploadOptions {
        public: session.config.public_gist,
        description,
        sync_extensions: session.config.sync_extensions,
    };

    let response = Uploader::new(&ctx, &store, &PragmaTransform, &notifier)
        .with_extension_host(&host)
        .run(&descriptor, document_id.as_deref(), &options, Utc::now())
        .await?;

    descriptor.last_upload = Some(response.uploaded_at);
    descriptor.save(&session.env)?;
    if response.created || response.public {
        session.config.gist = Some(response.document_id.clone());
        session.config.public_gist |= response.public;
        session.save_config()?;
    }

    println!(
        "{} Uploaded {} files to gist {}",
        "✓".green().bold(),
        response.files.len(),
        response.document_id.cyan()
    );
    Ok(())
}

/// Description for a new gist, asking when the descriptor says so.
fn gist_description(descriptor: &CustomSettings) -> Result<String> {
    if !descriptor.ask_gist_name || !std::io::stdin().is_terminal() {
        return Ok(descriptor.gist_description.clone());
    }
    let name: String = Input::new()
        .with_prompt("Gist description")
        .default(descriptor.gist_description.clone())
        .interact_text()?;
    Ok(name)
}
