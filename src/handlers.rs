//! Lifecycle event handlers.
//!
//! The framework delivers gateway events, command hooks and command errors
//! here. The policies themselves (support reminder cadence, bot-farm
//! detection, error replies) are plain functions so they can be tested
//! without a gateway connection.

use crate::config::PRESENCE_TEXT;
use crate::counters::Counters;
use crate::stats_api;
use crate::types::{Context, Data, Error};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::fmt::Display;
use std::sync::Arc;

/// A support reminder is sent every time a guild's command count reaches a
/// multiple of this.
pub const SUPPORT_REMINDER_INTERVAL: u64 = 50;

pub const SUPPORT_REMINDER: &str = "This bot costs $130/yr to run. If you like the utilities it provides, consider buying me a coffee https://ko-fi.com/henrys";

pub const DEPARTURE_NOTICE: &str =
    "This server has too many bots! I'm just going to leave if thats alright";

/// Result of counting one command invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Total uses of this command
    pub command_count: u64,
    /// Total commands in the invoking guild, if any
    pub guild_count: Option<u64>,
    /// Whether the support reminder should be sent
    pub support_reminder: bool,
}

/// Count a command invocation, per command and per guild.
pub async fn record_command(
    counters: &Counters,
    command: &str,
    guild_id: Option<u64>,
) -> CommandOutcome {
    let command_count = counters.record_command(command).await;
    let guild_count = match guild_id {
        Some(guild_id) => Some(counters.record_guild_command(guild_id).await),
        None => None,
    };

    CommandOutcome {
        command_count,
        guild_count,
        support_reminder: guild_count.is_some_and(is_support_milestone),
    }
}

/// True for every nonzero multiple of the reminder interval.
pub fn is_support_milestone(guild_count: u64) -> bool {
    guild_count != 0 && guild_count % SUPPORT_REMINDER_INTERVAL == 0
}

/// Whether a freshly joined guild is mostly automated accounts.
///
/// The threshold is inclusive: exactly three quarters leaves.
pub fn should_leave(automated: u64, total: u64) -> bool {
    total > 0 && automated.saturating_mul(4) >= total.saturating_mul(3)
}

/// Reply sent back to the channel for a failed command.
///
/// When the framework error wraps an error raised by the command, its
/// argument parser or its check, that error is echoed. Every other kind is
/// echoed through the framework error's own string form.
pub fn command_error_reply(inner: Option<&dyn Display>, framework_error: &dyn Display) -> String {
    inner.unwrap_or(framework_error).to_string()
}

/// Text channel with the lowest position, ties broken by id.
pub fn first_text_channel(
    channels: impl IntoIterator<Item = (serenity::ChannelId, serenity::ChannelType, u16)>,
) -> Option<serenity::ChannelId> {
    channels
        .into_iter()
        .filter(|(_, kind, _)| *kind == serenity::ChannelType::Text)
        .min_by_key(|(id, _, position)| (*position, *id))
        .map(|(id, _, _)| id)
}

/// Framework hook run before every command.
pub async fn on_command(context: Context<'_>) {
    let command = &context.command().qualified_name;
    let guild_id = context.guild_id().map(|id| id.get());

    let outcome = record_command(&context.data().counters, command, guild_id).await;
    tracing::debug!(
        command = %command,
        count = outcome.command_count,
        guild_count = ?outcome.guild_count,
        "Command invoked"
    );

    if outcome.support_reminder {
        if let Err(e) = context.say(SUPPORT_REMINDER).await {
            tracing::warn!("Failed to send support reminder: {}", e);
        }
    }
}

/// Error wrapped by a command-scoped framework error, if any.
fn inner_error<'e>(error: &'e poise::FrameworkError<'_, Data, Error>) -> Option<&'e dyn Display> {
    use poise::FrameworkError;

    match error {
        FrameworkError::Command { error, .. } => Some(error as &dyn Display),
        FrameworkError::ArgumentParse { error, .. } => Some(error as &dyn Display),
        FrameworkError::CommandCheckFailed {
            error: Some(error), ..
        } => Some(error as &dyn Display),
        _ => None,
    }
}

/// Framework error hook.
///
/// Command failures of every kind are logged and echoed back to the invoking
/// channel. Errors outside a command are only logged.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    if let Some(context) = error.ctx() {
        let text = command_error_reply(inner_error(&error), &error);
        tracing::info!(
            command = %context.command().qualified_name,
            channel = %context.channel_id(),
            guild = ?context.guild_id(),
            "Exception in command: {}",
            text
        );
        if let Err(e) = context.say(text).await {
            tracing::warn!("Failed to report command error: {}", e);
        }
        return;
    }

    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Startup failed: {}", error);
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            tracing::error!(
                event = event.snake_case_name(),
                "Event handler failed: {}",
                error
            );
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Framework event hook.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            on_ready(ctx, data_about_bot, data);
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if *is_new == Some(true) {
                on_guild_join(ctx, guild).await?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Runs on every gateway ready, including reconnects.
fn on_ready(ctx: &serenity::Context, ready: &serenity::Ready, data: &Data) {
    tracing::info!(
        "Logged in as {} ({}) in {} servers",
        ready.user.name,
        ready.user.id,
        ready.guilds.len()
    );

    ctx.set_activity(Some(serenity::ActivityData::playing(PRESENCE_TEXT)));

    let client = data.http_client.clone();
    let base_url = data.config.stats_api_base_url.clone();
    let token = data.credentials.stats_api_token.clone();
    let client_id = ready.user.id.get();
    let server_count = ready.guilds.len();

    // Fire and forget: a failed heartbeat is logged and never retried.
    tokio::spawn(async move {
        match stats_api::post_server_count(&client, &base_url, client_id, &token, server_count)
            .await
        {
            Ok(()) => tracing::info!(server_count, "Posted server count"),
            Err(e) => tracing::warn!("Failed to post server count: {}", e),
        }
    });
}

async fn on_guild_join(ctx: &serenity::Context, guild: &serenity::Guild) -> Result<(), Error> {
    let automated = guild.members.values().filter(|member| member.user.bot).count() as u64;
    if !should_leave(automated, guild.member_count) {
        return Ok(());
    }

    tracing::info!(
        guild = %guild.id,
        automated,
        total = guild.member_count,
        "Leaving guild with too many bots"
    );

    let channels = guild
        .channels
        .values()
        .map(|channel| (channel.id, channel.kind, channel.position));
    if let Some(channel_id) = first_text_channel(channels) {
        if let Err(e) = channel_id.say(&ctx.http, DEPARTURE_NOTICE).await {
            tracing::warn!(guild = %guild.id, "Failed to send departure notice: {}", e);
        }
    }

    guild.id.leave(&ctx.http).await?;
    Ok(())
}

/// Counts every gateway frame by event type.
pub struct SocketCounter {
    counters: Arc<Counters>,
}

impl SocketCounter {
    pub fn new(counters: Arc<Counters>) -> Self {
        Self { counters }
    }
}

#[async_trait]
impl serenity::RawEventHandler for SocketCounter {
    async fn raw_event(&self, _ctx: serenity::Context, event: serenity::Event) {
        let name = event.name();
        self.counters.record_socket_event(name.as_deref()).await;
    }
}
