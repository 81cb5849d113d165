use std::time::Instant;

use crate::{Context, Error};

/// Replies with Pong! Checks bot latency.
#[poise::command(slash_command, prefix_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    let reply = ctx.say("Pinging...").await?;
    let roundtrip = started.elapsed().as_millis();
    let heartbeat = ctx.ping().await.as_millis();

    reply
        .edit(
            ctx,
            poise::CreateReply::default().content(format!(
                "Pong! 🏓\nRoundtrip latency: {}ms\nWebSocket heartbeat: {}ms",
                roundtrip, heartbeat
            )),
        )
        .await?;

    Ok(())
}
