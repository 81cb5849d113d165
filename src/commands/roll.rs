// Roll command - roll one or more dice notations

use poise::serenity_prelude as serenity;
use tracing::{error, warn};

use crate::features::roll_formatter::{roll_all, roll_error_message, split_notations};
use crate::models::settings::EmbedColor;
use crate::utils::color_parser::resolve_colour;
use crate::utils::config::{colors, DEFAULT_ROLL_EMBED_COLOR, DEFAULT_ROLL_NOTATION};
use crate::utils::formatters::{truncate, EMBED_FIELD_LIMIT};
use crate::{Context, Error};

/// Roll dice using standard notation (e.g. 2d6, 1d20+5)
#[poise::command(slash_command)]
pub async fn roll(
    ctx: Context<'_>,
    #[description = "Dice to roll, up to 5 separated by commas (e.g. 3d10, 2d6+3). Default: 1d6"]
    dice: Option<String>,
) -> Result<(), Error> {
    let input = dice.unwrap_or_else(|| DEFAULT_ROLL_NOTATION.to_string());

    let notations = match split_notations(&input) {
        Ok(notations) => notations,
        Err(e) => {
            warn!("Rejected roll request {:?}: {}", input, e);
            ctx.send(poise::CreateReply::default().content(e.to_string()).ephemeral(true))
                .await?;
            return Ok(());
        }
    };

    let settings = &ctx.data().settings;
    let (explode_info_enabled, color) = match ctx.guild_id() {
        Some(guild_id) => {
            let guild_id = guild_id.to_string();
            let user_id = ctx.author().id.to_string();
            (
                settings.dice_explode(&guild_id).await,
                settings.roll_embed_color(&guild_id, &user_id).await,
            )
        }
        None => (false, EmbedColor::Text(DEFAULT_ROLL_EMBED_COLOR.to_string())),
    };

    let outcome = {
        let mut rng = rand::rng();
        roll_all(&notations, explode_info_enabled, &mut rng)
    };

    let summary = match outcome {
        Ok(summary) => summary,
        Err(failure) => {
            error!(
                "Error during dice roll with input {:?} (notation {:?}): {:?}",
                input, failure.notation, failure.error
            );
            ctx.send(
                poise::CreateReply::default()
                    .content(roll_error_message(&failure.notation, &failure.error))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    };

    let colour = match summary.natural_d20 {
        Some(1) => serenity::Colour::new(colors::NATURAL_ONE),
        Some(20) => serenity::Colour::new(colors::NATURAL_TWENTY),
        _ => resolve_colour(&color),
    };

    let user = ctx.author();
    let embed = serenity::CreateEmbed::new()
        .title("🎲 Dice Roll!")
        .description(format!("**{}** rolls", user.name))
        .color(colour)
        .field("Request", truncate(&summary.request, EMBED_FIELD_LIMIT), true)
        .field("Rolls", truncate(&summary.rolls, EMBED_FIELD_LIMIT), true)
        .field("Result", truncate(&summary.totals, EMBED_FIELD_LIMIT), true)
        .footer(serenity::CreateEmbedFooter::new(format!("Rolled by {}", user.tag())))
        .timestamp(serenity::Timestamp::now());

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_is_slash_only() {
        let command = roll();
        assert!(command.slash_action.is_some());
        assert!(command.prefix_action.is_none());
    }
}
