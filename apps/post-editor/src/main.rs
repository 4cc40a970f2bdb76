//! # Post Editor
//!
//! Command line front end for the post editor: opens the editor on a create
//! or edit route, fills in the fields given as arguments and submits.

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;

use postdesk_core::form::FieldStatus;
use postdesk_core::{PostEditor, SkipReason, SubmitOutcome};
use postdesk_infra::{StaticRoute, read_image};

mod config;
mod state;
mod telemetry;

use config::{AppConfig, Cli};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli);

    telemetry::init_telemetry(&config.telemetry);

    let state = AppState::new(&config)?;
    let route = StaticRoute::for_post(cli.post_id.as_deref());
    let mut editor = PostEditor::new(
        state.api.clone(),
        Arc::new(route),
        state.navigator.clone(),
        config.editor.clone(),
    );
    let mut saved = editor.subscribe_saved();

    // Ctrl-C aborts whatever the editor is waiting on.
    let token = editor.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            token.cancel();
        }
    });

    editor.init().await.context("failed to open the editor")?;

    if let Some(title) = cli.title {
        editor.set_title(title);
    }
    if let Some(content) = cli.content {
        editor.set_content(content);
    }
    if let Some(path) = &cli.image {
        let file = read_image(path).await?;
        if editor.on_image_picked(file) != FieldStatus::Valid {
            bail!("image rejected: {}", editor.form().error_summary());
        }
    }

    match editor.save().await.context("failed to save the post")? {
        SubmitOutcome::Saved(id) => {
            if let Ok(event) = saved.try_recv() {
                tracing::debug!(kind = ?event.kind, saved_at = %event.saved_at, "Save confirmed");
            }
            println!("{id}");
        }
        SubmitOutcome::Skipped(SkipReason::Invalid(errors)) => {
            bail!("form is invalid: {errors}");
        }
        SubmitOutcome::Skipped(SkipReason::NotReady) => {
            bail!("the post to edit is not loaded");
        }
    }

    editor.destroy();
    Ok(())
}
