// Gateway event handler

use poise::serenity_prelude as serenity;
use tracing::info;

use crate::utils::config::PRESENCE;
use crate::{Data, Error};

pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    _data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Ready { data_about_bot } = event {
        info!("Ready! Logged in as {}", data_about_bot.user.tag());
        info!("Lafayette is serving {} guilds.", data_about_bot.guilds.len());
        ctx.set_presence(
            Some(serenity::ActivityData::playing(PRESENCE)),
            serenity::OnlineStatus::Online,
        );
    }
    Ok(())
}
