//! Usage statistics command.
//!
//! Summarizes the in-memory counters (commands used since startup and the
//! most frequent gateway events) along with the process's resident memory.

use crate::types::{Context, Error};
use crate::uptime::Elapsed;

const TOP_ENTRIES: usize = 5;

/// Show command and gateway event statistics since startup.
#[poise::command(prefix_command, slash_command)]
pub async fn stats(context: Context<'_>) -> Result<(), Error> {
    let data = context.data();

    let (total_commands, top_commands) = {
        let commands = data.counters.commands_used.read().await;
        (commands.total(), commands.most_common(TOP_ENTRIES))
    };
    let top_events = data
        .counters
        .socket_stats
        .read()
        .await
        .most_common(TOP_ENTRIES);

    let report = StatsReport {
        guild_count: context.cache().guild_count(),
        uptime: data.uptime.elapsed(),
        total_commands,
        top_commands,
        top_events,
        memory_mb: data.process.memory_mb(),
    };

    context.say(report.render()).await?;
    Ok(())
}

/// Snapshot of the counters rendered by the stats command.
struct StatsReport {
    guild_count: usize,
    uptime: Elapsed,
    total_commands: u64,
    top_commands: Vec<(String, u64)>,
    top_events: Vec<(String, u64)>,
    memory_mb: Option<f64>,
}

impl StatsReport {
    fn render(&self) -> String {
        let mut out = format!(
            "**Bot Statistics** 📊\n\
            **Servers:** {}\n\
            **Uptime:** {}\n\
            **Commands used:** {}",
            self.guild_count, self.uptime, self.total_commands
        );

        if let Some(memory_mb) = self.memory_mb {
            out.push_str(&format!("\n**RAM usage:** {:.2} MB", memory_mb));
        }

        if !self.top_commands.is_empty() {
            out.push_str("\n**Top commands:** ");
            out.push_str(&render_entries(&self.top_commands));
        }

        if !self.top_events.is_empty() {
            out.push_str("\n**Top gateway events:** ");
            out.push_str(&render_entries(&self.top_events));
        }

        out
    }
}

fn render_entries(entries: &[(String, u64)]) -> String {
    entries
        .iter()
        .map(|(name, count)| format!("`{}` ({})", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_full_report() {
        let report = StatsReport {
            guild_count: 3,
            uptime: Elapsed::from_secs(3661),
            total_commands: 7,
            top_commands: vec![("ping".to_string(), 5), ("stats".to_string(), 2)],
            top_events: vec![("MESSAGE_CREATE".to_string(), 40)],
            memory_mb: Some(48.5),
        };

        let rendered = report.render();
        assert!(rendered.contains("**Servers:** 3"));
        assert!(rendered.contains("1 hours, 1 minutes, and 1 seconds"));
        assert!(rendered.contains("`ping` (5), `stats` (2)"));
        assert!(rendered.contains("`MESSAGE_CREATE` (40)"));
        assert!(rendered.contains("**RAM usage:** 48.50 MB"));
    }

    #[test]
    fn test_render_empty_counters() {
        let report = StatsReport {
            guild_count: 0,
            uptime: Elapsed::from_secs(0),
            total_commands: 0,
            top_commands: Vec::new(),
            top_events: Vec::new(),
            memory_mb: None,
        };

        let rendered = report.render();
        assert!(rendered.contains("**Commands used:** 0"));
        assert!(!rendered.contains("Top commands"));
        assert!(!rendered.contains("Top gateway events"));
        assert!(!rendered.contains("RAM usage"));
    }
}
