use std::time::Duration;

use futures::StreamExt;
use poise::serenity_prelude as serenity;
use tracing::{error, warn};

use crate::models::settings::EmbedColor;
use crate::utils::color_parser::{
    parse_color_string, resolve_colour, PredefinedColor, PREDEFINED_COLORS,
};
use crate::utils::config::{COLORS_PER_PAGE, COLOR_PICKER_TIMEOUT_SECS};
use crate::utils::formatters::enabled_label;
use crate::{Context, Error};

/// Manage server-wide and personal bot settings
#[poise::command(slash_command, subcommands("guild", "me", "view"))]
pub async fn settings(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Guild ID as a string, or an ephemeral notice when used outside a server
async fn require_guild(ctx: Context<'_>) -> Result<Option<String>, Error> {
    match ctx.guild_id() {
        Some(id) => Ok(Some(id.to_string())),
        None => {
            ctx.send(
                poise::CreateReply::default()
                    .content("This command can only be used in a server.")
                    .ephemeral(true),
            )
            .await?;
            Ok(None)
        }
    }
}

/// Configure server-wide settings (requires Manage Guild)
#[poise::command(slash_command, required_permissions = "MANAGE_GUILD")]
pub async fn guild(
    ctx: Context<'_>,
    #[description = "Mark dice that roll their highest face in this server"] dice_explode: bool,
) -> Result<(), Error> {
    let Some(guild_id) = require_guild(ctx).await? else {
        return Ok(());
    };

    if let Err(e) = ctx.data().settings.set_dice_explode(&guild_id, dice_explode).await {
        warn!("Dice explode for guild {} not persisted: {}", guild_id, e);
    }

    ctx.send(
        poise::CreateReply::default()
            .content(format!(
                "🎲 Server-wide dice explosion has been **{}**.",
                if dice_explode { "ENABLED" } else { "DISABLED" }
            ))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

/// Manage your personal settings for this server
#[poise::command(slash_command)]
pub async fn me(
    ctx: Context<'_>,
    #[description = "Embed color for your rolls (#FF0000, Red, or leave blank for options)"]
    roll_color: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = require_guild(ctx).await? else {
        return Ok(());
    };
    let user_id = ctx.author().id.to_string();

    let prompt = match roll_color.as_deref() {
        Some(input) => match parse_color_string(input) {
            Some(color) => {
                save_color(ctx, &guild_id, &user_id, color.clone()).await;
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!(
                            "🎨 Your dice roll embed color has been set to `{}`.",
                            color
                        ))
                        .ephemeral(true),
                )
                .await?;
                return Ok(());
            }
            None => format!(
                "🤔 I couldn't understand \"{}\" as a color. Choose from the options below or try a hex code (e.g., #RRGGBB) or a basic color name.",
                input
            ),
        },
        None => "🎨 Choose a color for your dice roll embeds:".to_string(),
    };

    let prefix = format!("roll_color_{}_", ctx.id());
    let reply = ctx
        .send(
            poise::CreateReply::default()
                .content(prompt)
                .components(color_picker_rows(&prefix, 0))
                .ephemeral(true),
        )
        .await?;

    let filter_prefix = prefix.clone();
    let mut collector = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
        .author_id(ctx.author().id)
        .filter(move |i| i.data.custom_id.starts_with(&filter_prefix))
        .timeout(Duration::from_secs(COLOR_PICKER_TIMEOUT_SECS))
        .stream();

    let mut finished = false;
    while let Some(interaction) = collector.next().await {
        let action = interaction
            .data
            .custom_id
            .strip_prefix(&prefix)
            .and_then(parse_picker_action);

        let response = match action {
            Some(PickerAction::Page(page)) => serenity::CreateInteractionResponseMessage::new()
                .components(color_picker_rows(&prefix, page)),
            Some(PickerAction::Pick(index)) if index < PREDEFINED_COLORS.len() => {
                let selected = PREDEFINED_COLORS[index];
                save_color(ctx, &guild_id, &user_id, selected.value()).await;
                finished = true;
                serenity::CreateInteractionResponseMessage::new()
                    .content(format!(
                        "✅ Your dice roll embed color has been set to **{}** (`{}`).",
                        selected.name, selected.hex
                    ))
                    .components(vec![])
            }
            _ => {
                finished = true;
                serenity::CreateInteractionResponseMessage::new()
                    .content("Invalid selection. Please try again.")
                    .components(vec![])
            }
        };

        if let Err(e) = interaction
            .create_response(
                ctx.http(),
                serenity::CreateInteractionResponse::UpdateMessage(response),
            )
            .await
        {
            error!("Failed to update color picker: {:?}", e);
        }

        if finished {
            break;
        }
    }

    if !finished {
        let _ = reply
            .edit(
                ctx,
                poise::CreateReply::default()
                    .content("🎨 Color selection timed out. No changes made.")
                    .components(vec![]),
            )
            .await;
    }

    Ok(())
}

/// View current server and personal settings
#[poise::command(slash_command)]
pub async fn view(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = require_guild(ctx).await? else {
        return Ok(());
    };
    let user = ctx.author();
    let settings = &ctx.data().settings;

    let dice_explode = settings.dice_explode(&guild_id).await;
    let roll_color = settings
        .roll_embed_color(&guild_id, &user.id.to_string())
        .await;
    let guild_name = ctx
        .guild()
        .map(|g| g.name.clone())
        .unwrap_or_else(|| "Server".to_string());

    let embed = serenity::CreateEmbed::new()
        .title(format!("{} Bot Settings", guild_name))
        .description(format!(
            "Showing settings for **{}** on this server.",
            user.name
        ))
        .color(resolve_colour(&roll_color))
        .field(
            "Server-Wide Settings",
            format!("Dice Explode: **{}**", enabled_label(dice_explode)),
            false,
        )
        .field(
            "Your Personal Settings",
            format!("Dice Roll Embed Color: `{}`", roll_color),
            false,
        );

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

async fn save_color(ctx: Context<'_>, guild_id: &str, user_id: &str, color: EmbedColor) {
    if let Err(e) = ctx
        .data()
        .settings
        .set_roll_embed_color(guild_id, user_id, color)
        .await
    {
        warn!(
            "Roll color for user {} in guild {} not persisted: {}",
            user_id, guild_id, e
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerAction {
    Page(usize),
    Pick(usize),
}

/// Button IDs end in `page-N` or a color index
fn parse_picker_action(action: &str) -> Option<PickerAction> {
    match action.strip_prefix("page-") {
        Some(page) => page.parse().ok().map(PickerAction::Page),
        None => action.parse().ok().map(PickerAction::Pick),
    }
}

/// Colors shown on `page`, with their index in PREDEFINED_COLORS
fn picker_page(page: usize) -> impl Iterator<Item = (usize, &'static PredefinedColor)> {
    PREDEFINED_COLORS
        .iter()
        .enumerate()
        .skip(page * COLORS_PER_PAGE)
        .take(COLORS_PER_PAGE)
}

fn has_next_page(page: usize) -> bool {
    (page + 1) * COLORS_PER_PAGE < PREDEFINED_COLORS.len()
}

fn color_picker_rows(prefix: &str, page: usize) -> Vec<serenity::CreateActionRow> {
    let mut rows = Vec::new();

    let buttons: Vec<serenity::CreateButton> = picker_page(page)
        .map(|(index, color)| {
            serenity::CreateButton::new(format!("{}{}", prefix, index))
                .label(color.name)
                .style(serenity::ButtonStyle::Primary)
        })
        .collect();
    if !buttons.is_empty() {
        rows.push(serenity::CreateActionRow::Buttons(buttons));
    }

    let mut navigation = Vec::new();
    if page > 0 {
        navigation.push(
            serenity::CreateButton::new(format!("{}page-{}", prefix, page - 1))
                .label("⬅️ Previous")
                .style(serenity::ButtonStyle::Secondary),
        );
    }
    if has_next_page(page) {
        navigation.push(
            serenity::CreateButton::new(format!("{}page-{}", prefix, page + 1))
                .label("Next ➡️")
                .style(serenity::ButtonStyle::Secondary),
        );
    }
    if !navigation.is_empty() {
        rows.push(serenity::CreateActionRow::Buttons(navigation));
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_picker_action() {
        assert_eq!(parse_picker_action("page-2"), Some(PickerAction::Page(2)));
        assert_eq!(parse_picker_action("3"), Some(PickerAction::Pick(3)));
        assert_eq!(parse_picker_action("page-x"), None);
        assert_eq!(parse_picker_action("blue"), None);
    }

    #[test]
    fn test_picker_pages() {
        let first: Vec<usize> = picker_page(0).map(|(i, _)| i).collect();
        assert_eq!(first, vec![0, 1, 2, 3]);
        let second: Vec<usize> = picker_page(1).map(|(i, _)| i).collect();
        assert_eq!(second, vec![4, 5, 6]);
        assert_eq!(picker_page(2).count(), 0);

        assert!(has_next_page(0));
        assert!(!has_next_page(1));
    }

    #[test]
    fn test_picker_rows() {
        // colors plus Next on the first page
        assert_eq!(color_picker_rows("p_", 0).len(), 2);
        // colors plus Previous on the last page
        assert_eq!(color_picker_rows("p_", 1).len(), 2);
    }
}
