//! Application configuration loaded from the command line and environment.

use std::path::PathBuf;

use clap::Parser;

use postdesk_core::EditorConfig;
#[cfg(feature = "http")]
use postdesk_infra::ApiConfig;

use crate::telemetry::TelemetryConfig;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "post-editor", version, about = "Create or edit a post")]
pub struct Cli {
    /// Edit the post with this id instead of creating a new one.
    #[arg(long, env = "POSTDESK_POST_ID")]
    pub post_id: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,

    /// Image file to upload (png, jpeg or gif).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Use an in-memory posts API instead of the remote one.
    #[arg(long)]
    pub offline: bool,

    /// Base URL of the posts API, overrides POSTDESK_API_URL.
    #[arg(long)]
    pub api_url: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    #[cfg(feature = "http")]
    pub api: ApiConfig,
    pub editor: EditorConfig,
    pub telemetry: TelemetryConfig,
    pub offline: bool,
}

impl AppConfig {
    /// Load configuration from environment variables, then apply CLI overrides.
    pub fn load(cli: &Cli) -> Self {
        #[cfg(feature = "http")]
        let api = {
            let mut api = ApiConfig::from_env();
            if let Some(url) = &cli.api_url {
                api.base_url = url.clone();
            }
            api
        };

        Self {
            #[cfg(feature = "http")]
            api,
            editor: EditorConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
            offline: cli.offline || cfg!(not(feature = "http")),
        }
    }
}
