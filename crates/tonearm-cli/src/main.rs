// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tonearm_config::{load as load_config, AppConfig};
use tonearm_domain::{ResolveOptions, Song};
use tonearm_extractor::{SearchType, SoundCloudPlugin};
use tonearm_soundcloud::SoundCloudClient;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Resolve and search SoundCloud from the command line
#[derive(Parser)]
#[command(name = "tonearm", author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "TONEARM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search tracks or playlists; a soundcloud.com URL is resolved instead
    Search {
        query: String,
        /// What to look for: track or playlist
        #[arg(short = 't', long = "type", default_value = "track")]
        search_type: SearchType,
        /// Maximum number of results (defaults to search.default_limit)
        #[arg(short, long)]
        limit: Option<u32>,
        /// Member tag attached to every result
        #[arg(long)]
        member: Option<String>,
    },
    /// Resolve a track or playlist URL
    Resolve {
        url: String,
        #[arg(long)]
        member: Option<String>,
    },
    /// List songs related to a track URL
    Related { url: String },
    /// Print a playable stream URL for a track URL
    Stream { url: String },
    /// Check whether a URL belongs to SoundCloud
    Validate { url: String },
}

#[derive(Serialize)]
struct Validation<'a> {
    url: &'a str,
    valid: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.telemetry.log_level);

    let plugin = build_plugin(&config)?;
    run(&plugin, &config, cli.command).await
}

fn init_tracing(default_level: &str) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn build_plugin(config: &AppConfig) -> Result<SoundCloudPlugin> {
    let options = config.plugin_options();
    let mut builder = SoundCloudClient::builder().timeout(config.soundcloud.timeout());

    if let Some(base_url) = &config.soundcloud.api_base_url {
        builder = builder.base_url(base_url.as_str());
    }
    if let Some(client_id) = options.client_id {
        builder = builder.client_id(client_id);
    }
    if let Some(token) = options.oauth_token {
        builder = builder.oauth_token(token);
    }

    Ok(SoundCloudPlugin::with_api(builder.build()?))
}

async fn run(plugin: &SoundCloudPlugin, config: &AppConfig, command: Command) -> Result<()> {
    match command {
        Command::Search {
            query,
            search_type,
            limit,
            member,
        } => {
            let limit = limit.unwrap_or(config.search.default_limit);
            info!(target: "cli", %query, %search_type, limit, "searching");
            let items = plugin
                .search(&query, search_type, limit, &resolve_options(member))
                .await?;
            print_json(&items)
        }
        Command::Resolve { url, member } => {
            let item = plugin.resolve(&url, &resolve_options(member)).await?;
            print_json(&item)
        }
        Command::Related { url } => {
            let song = resolve_song(plugin, &url).await?;
            let related = plugin.get_related_songs(&song).await?;
            print_json(&related)
        }
        Command::Stream { url } => {
            let song = resolve_song(plugin, &url).await?;
            let stream_url = plugin.get_stream_url(&song).await?;
            println!("{}", stream_url);
            Ok(())
        }
        Command::Validate { url } => {
            let valid = plugin.validate(&url);
            print_json(&Validation { url: &url, valid })
        }
    }
}

fn resolve_options(member: Option<String>) -> ResolveOptions {
    match member {
        Some(member) => ResolveOptions::default().with_member(member),
        None => ResolveOptions::default(),
    }
}

async fn resolve_song(plugin: &SoundCloudPlugin, url: &str) -> Result<Song> {
    let item = plugin.resolve(url, &ResolveOptions::default()).await?;
    debug!(target: "cli", source = item.source(), "resolved {}", url);
    item.into_song()
        .ok_or_else(|| anyhow!("{} is a playlist, expected a track URL", url))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
