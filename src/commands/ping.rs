//! Latency check.

use crate::types::{Context, Error};

/// Report the shard's gateway heartbeat latency.
#[poise::command(prefix_command, slash_command)]
pub async fn ping(context: Context<'_>) -> Result<(), Error> {
    context.say(latency_reply(context.ping().await)).await?;
    Ok(())
}

/// Zero means no heartbeat has been acknowledged yet.
fn latency_reply(latency: std::time::Duration) -> String {
    if latency.is_zero() {
        "Pong! No heartbeat acknowledged yet.".to_string()
    } else {
        format!("Pong! Gateway latency: {} ms", latency.as_millis())
    }
}
