// Echo command - send a message as the bot (owner only)

use poise::serenity_prelude as serenity;
use tracing::error;

use crate::utils::config::colors;
use crate::utils::formatters::normalize_newlines;
use crate::{Context, Error};

/// Sends a message as the bot (Owner only)
#[poise::command(slash_command)]
pub async fn echo(
    ctx: Context<'_>,
    #[description = "The message content to send"] message: String,
    #[description = "Optional title for the embed"] title: Option<String>,
    #[description = "Channel to send to (defaults to current channel)"]
    #[channel_types("Text", "News")]
    channel: Option<serenity::Channel>,
) -> Result<(), Error> {
    let Some(owner_id) = ctx.data().config.owner_id else {
        error!("BOT_OWNER_ID is not configured, refusing /echo");
        ephemeral(ctx, "Without knowing who my maker is I can't run this command.").await?;
        return Ok(());
    };

    if ctx.author().id != owner_id {
        ephemeral(ctx, "Permission denied. You are neither my mother nor my coder.").await?;
        return Ok(());
    }

    let target = match channel {
        Some(channel) => match channel.guild() {
            Some(gc) if is_text_channel(gc.kind) => gc,
            _ => {
                ephemeral(
                    ctx,
                    "⚠️ Invalid channel type. Please select a text or announcement channel.",
                )
                .await?;
                return Ok(());
            }
        },
        None => match ctx.guild_channel().await {
            Some(gc) if is_text_channel(gc.kind) => gc,
            _ => {
                ephemeral(
                    ctx,
                    "⚠️ Cannot determine a valid text channel to send the message to.",
                )
                .await?;
                return Ok(());
            }
        },
    };

    let mut embed = serenity::CreateEmbed::new()
        .color(colors::ECHO)
        .description(normalize_newlines(&message));
    if let Some(title) = title {
        embed = embed.title(title);
    }

    match target
        .id
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
        .await
    {
        Ok(_) => {
            ephemeral(ctx, &format!("✅ Message sent to <#{}>.", target.id)).await?;
        }
        Err(e) => {
            error!("Error in /echo by owner {}: {:?}", ctx.author().id, e);
            ephemeral(
                ctx,
                &format!("❌ An error occurred while trying to send the message: {}", e),
            )
            .await?;
        }
    }

    Ok(())
}

async fn ephemeral(ctx: Context<'_>, content: &str) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Echo only targets text and announcement channels
fn is_text_channel(kind: serenity::ChannelType) -> bool {
    matches!(kind, serenity::ChannelType::Text | serenity::ChannelType::News)
}
