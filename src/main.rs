// Lafayette
// A Discord bot that rolls dice and remembers per-server preferences

mod commands;
mod dice;
mod features;
mod models;
mod utils;

use std::env;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::features::settings_store::SettingsStore;
use crate::utils::config::BotConfig;

/// User data shared across all commands
#[derive(Debug)]
pub struct Data {
    pub settings: Arc<SettingsStore>,
    pub config: Arc<BotConfig>,
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Register all slash commands
fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        commands::roll::roll(),
        commands::settings::settings(),
        commands::ping::ping(),
        commands::echo::echo(),
        commands::help::help(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error executing command {}: {:?}", ctx.command().name, error);
            let _ = ctx
                .send(
                    poise::CreateReply::default()
                        .content(format!("❌ Error: {}", error))
                        .ephemeral(true),
                )
                .await;
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            let _ = ctx
                .send(
                    poise::CreateReply::default()
                        .content("You need the \"Manage Guild\" permission to change server-wide settings.")
                        .ephemeral(true),
                )
                .await;
        }
        err => {
            if let Err(e) = poise::builtins::on_error(err).await {
                error!("Error while handling framework error: {:?}", e);
            }
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {:?}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "lafayette=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BotConfig::from_env().context("Invalid configuration")?;
    if config.guild_id.is_none() {
        warn!("GUILD_ID is not set. Slash commands will be registered globally (can take up to an hour to propagate).");
    }
    if config.owner_id.is_none() {
        warn!("BOT_OWNER_ID is not set. Owner-only commands will not function.");
    }

    info!("Starting Lafayette...");

    let settings = Arc::new(SettingsStore::load(config.settings_path.clone()).await);
    let config = Arc::new(config);
    let token = config.token.clone();

    // Setup framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: get_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("l!".into()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(features::events::handle_event(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                let commands = &framework.options().commands;
                match config.guild_id {
                    Some(guild_id) => {
                        info!("Registering {} commands in guild {}", commands.len(), guild_id);
                        poise::builtins::register_in_guild(ctx, commands, guild_id).await?;
                    }
                    None => {
                        info!("Registering {} commands globally", commands.len());
                        poise::builtins::register_globally(ctx, commands).await?;
                    }
                }
                info!("Commands registered successfully!");

                Ok(Data { settings, config })
            })
        })
        .build();

    // MESSAGE_CONTENT is privileged, enable it in the Discord Dev Portal for prefix commands
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Failed to create client")?;

    // Run with graceful shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Lafayette is shutting down...");
        shard_manager.shutdown_all().await;
    });

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    info!("Goodbye!");
    Ok(())
}
