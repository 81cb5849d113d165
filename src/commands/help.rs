// Help command - show usage guide

use poise::serenity_prelude as serenity;
use crate::{Context, Error};
use crate::utils::config::{colors, MAX_ROLLS_PER_REQUEST};

/// Show help and usage guide
#[poise::command(slash_command, prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .title("📚 Lafayette - Help")
        .description("Dice, and a few preferences to go with them")
        .color(colors::PRIMARY)
        .field(
            "🎲 Dice",
            format!(
                "`/roll` - Roll dice, e.g. `2d6+3` or `1d20, 1d8+4`\n\
                Up to {} rolls at once, separated by commas or semicolons.\n\
                Dice that land on their highest face are marked with `!`.",
                MAX_ROLLS_PER_REQUEST
            ),
            false,
        )
        .field(
            "⚙️ Settings",
            "`/settings guild` - Toggle max-face marking for the server\n\
            `/settings me` - Pick the embed color for your rolls\n\
            `/settings view` - Show current settings",
            false,
        )
        .field(
            "🔧 Utility",
            "`/ping` - Check latency\n\
            `/echo` - Send a message as the bot (owner only)",
            false,
        )
        .footer(serenity::CreateEmbedFooter::new(
            "Built with Serenity & Poise",
        ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
