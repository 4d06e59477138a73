//! Uptime command.

use crate::types::{Context, Error};

/// Show how long the bot has been running.
#[poise::command(prefix_command, slash_command)]
pub async fn uptime(context: Context<'_>) -> Result<(), Error> {
    let elapsed = context.data().uptime.elapsed();
    context.say(format!("Uptime: **{}**", elapsed)).await?;
    Ok(())
}
