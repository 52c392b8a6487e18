// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! mlcontent command-line client
//!
//! Thin front end over [`ApiClient`]: every subcommand maps to one client
//! operation and prints the result as pretty JSON on stdout. Logs go to
//! stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mlcontent_client::models::ProfileUpdate;
use mlcontent_client::{ApiClient, Config, ContentQuery, SearchQuery};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "mlcontent", version, about = "Learning-content service client")]
struct Cli {
    /// Emit structured JSON logs
    #[arg(long, global = true)]
    json: bool,

    /// API base URL (overrides MLCONTENT_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check service health
    Health,
    /// List content items
    List {
        #[arg(long)]
        module: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one content item
    Show { id: i64 },
    /// Search content
    Search {
        query: String,
        #[arg(long)]
        module: Option<String>,
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Create an account
    Register {
        username: String,
        email: String,
        #[arg(long, env = "MLCONTENT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in and store credentials
    Login {
        username: String,
        #[arg(long, env = "MLCONTENT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget stored credentials
    Logout,
    /// Refresh stored credentials
    Refresh,
    /// Show the logged-in account
    Me,
    /// Show or update the profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    /// List favorites
    Favorites {
        /// Include a summary of each bookmarked item
        #[arg(long)]
        with_content: bool,
    },
    /// Add or remove a favorite
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// Update profile fields
    Set {
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum FavoriteAction {
    Add {
        content_id: i64,
        #[arg(long)]
        note: Option<String>,
    },
    Remove { content_id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json);

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(base) = &cli.api_base {
        config.api_base = Config::with_base(base)?.api_base;
    }
    tracing::debug!(api_base = %config.api_base, "Using API base");

    let client = ApiClient::from_config(&config).context("Failed to build API client")?;
    run(&client, cli.command).await
}

async fn run(client: &ApiClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Health => print_json(&client.health().await?),
        Command::List {
            module,
            subcategory,
            skip,
            limit,
        } => {
            let query = ContentQuery {
                module,
                subcategory,
                skip,
                limit,
            };
            print_json(&client.list_contents(&query).await?)
        }
        Command::Show { id } => print_json(&client.get_content(id).await?),
        Command::Search {
            query,
            module,
            skip,
            limit,
        } => {
            let query = SearchQuery {
                query,
                module,
                skip,
                limit,
            };
            print_json(&client.search(&query).await?)
        }
        Command::Register {
            username,
            email,
            password,
        } => print_json(&client.register(&username, &email, &password).await?),
        Command::Login { username, password } => {
            let pair = client.login(&username, &password).await?;
            print_json(&serde_json::json!({ "token_type": pair.token_type, "logged_in": true }))
        }
        Command::Logout => {
            client.logout();
            print_json(&serde_json::json!({ "logged_in": false }))
        }
        Command::Refresh => {
            let pair = client.refresh().await?;
            print_json(&serde_json::json!({ "token_type": pair.token_type, "refreshed": true }))
        }
        Command::Me => print_json(&client.me().await?),
        Command::Profile { action: None } => print_json(&client.get_profile().await?),
        Command::Profile {
            action:
                Some(ProfileAction::Set {
                    nickname,
                    avatar_url,
                    bio,
                }),
        } => {
            let update = ProfileUpdate {
                nickname,
                avatar_url,
                bio,
            };
            if update.is_empty() {
                anyhow::bail!("nothing to update: pass --nickname, --avatar-url or --bio");
            }
            print_json(&client.update_profile(&update).await?)
        }
        Command::Favorites { with_content: true } => {
            print_json(&client.list_favorites_with_content().await?)
        }
        Command::Favorites {
            with_content: false,
        } => print_json(&client.list_favorites().await?),
        Command::Favorite {
            action: FavoriteAction::Add { content_id, note },
        } => print_json(&client.add_favorite(content_id, note.as_deref()).await?),
        Command::Favorite {
            action: FavoriteAction::Remove { content_id },
        } => print_json(&client.remove_favorite(content_id).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize logging to stderr; JSON if requested, compact otherwise.
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mlcontent_client=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
