//! Help command.

use crate::types::{Context, Error};

/// Shown under every help listing.
pub const ABOUT: &str = "RPGBot, a little discord bot by Henry#6174\n\
**Add to your server**: https://discordapp.com/oauth2/authorize?client_id=305177429612298242&scope=bot&permissions=322625\n\
**Support Server**: https://discord.gg/UYJb8fQ\n\
**Source**: https://github.com/henry232323/RPGBot";

/// Show the command list, or help about one command.
#[poise::command(prefix_command, slash_command)]
pub async fn help(
    context: Context<'_>,
    #[description = "Command to show help about"] command: Option<String>,
) -> Result<(), Error> {
    let config = poise::builtins::HelpConfiguration {
        extra_text_at_bottom: ABOUT,
        ephemeral: true,
        ..Default::default()
    };
    poise::builtins::help(context, command.as_deref(), config).await?;
    Ok(())
}
