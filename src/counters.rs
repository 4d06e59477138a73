//! Operational counters.
//!
//! Three frequency tables live for the whole process: commands used, commands
//! per guild, and gateway frames per event type. Counts only ever grow and
//! are dropped at exit.

use std::collections::HashMap;
use std::hash::Hash;
use tokio::sync::RwLock;

/// Key used for gateway frames that carry no event type.
pub const UNTYPED_EVENT: &str = "untyped";

/// Frequency table from a key to a non-negative count.
#[derive(Debug, Clone, Default)]
pub struct CounterTable<K> {
    counts: HashMap<K, u64>,
}

impl<K: Eq + Hash + Ord + Clone> CounterTable<K> {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Increase the count for `key` by one and return the new count.
    pub fn increment(&mut self, key: K) -> u64 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// Current count for `key`, 0 if it was never seen.
    pub fn get(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// The `n` highest counts, ties broken by key order.
    pub fn most_common(&self, n: usize) -> Vec<(K, u64)> {
        let mut entries: Vec<(K, u64)> = self
            .counts
            .iter()
            .map(|(key, count)| (key.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }
}

/// The shell's counters, shared between the command hooks and the gateway
/// listener.
#[derive(Debug, Default)]
pub struct Counters {
    /// Invocations per command name
    pub commands_used: RwLock<CounterTable<String>>,
    /// Invocations per guild id
    pub guild_commands: RwLock<CounterTable<u64>>,
    /// Gateway frames per event type
    pub socket_stats: RwLock<CounterTable<String>>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one invocation of `command`.
    pub async fn record_command(&self, command: &str) -> u64 {
        self.commands_used
            .write()
            .await
            .increment(command.to_string())
    }

    /// Count one invocation in `guild_id` and return the guild's new total.
    pub async fn record_guild_command(&self, guild_id: u64) -> u64 {
        self.guild_commands.write().await.increment(guild_id)
    }

    /// Count one gateway frame, grouping frames without a type tag.
    pub async fn record_socket_event(&self, event_type: Option<&str>) -> u64 {
        let key = event_type.unwrap_or(UNTYPED_EVENT).to_string();
        self.socket_stats.write().await.increment(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_get() {
        let mut table = CounterTable::new();
        assert_eq!(table.get(&"ping".to_string()), 0);

        assert_eq!(table.increment("ping".to_string()), 1);
        assert_eq!(table.increment("ping".to_string()), 2);
        assert_eq!(table.increment("stats".to_string()), 1);

        assert_eq!(table.get(&"ping".to_string()), 2);
        assert_eq!(table.get(&"stats".to_string()), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_most_common() {
        let mut table = CounterTable::new();
        for _ in 0..3 {
            table.increment("MESSAGE_CREATE".to_string());
        }
        table.increment("TYPING_START".to_string());
        table.increment("GUILD_CREATE".to_string());

        let top = table.most_common(2);
        assert_eq!(
            top,
            vec![
                ("MESSAGE_CREATE".to_string(), 3),
                ("GUILD_CREATE".to_string(), 1),
            ]
        );
        assert_eq!(table.most_common(10).len(), 3);
    }

    #[tokio::test]
    async fn test_socket_count_is_independent_of_interleaving() {
        let counters = Counters::new();
        let frames = [
            Some("MESSAGE_CREATE"),
            None,
            Some("PRESENCE_UPDATE"),
            Some("MESSAGE_CREATE"),
            None,
            Some("MESSAGE_CREATE"),
        ];
        for frame in frames {
            counters.record_socket_event(frame).await;
        }

        let stats = counters.socket_stats.read().await;
        assert_eq!(stats.get(&"MESSAGE_CREATE".to_string()), 3);
        assert_eq!(stats.get(&UNTYPED_EVENT.to_string()), 2);
        assert_eq!(stats.get(&"PRESENCE_UPDATE".to_string()), 1);
    }

    #[tokio::test]
    async fn test_guild_commands_are_per_guild() {
        let counters = Counters::new();
        assert_eq!(counters.record_guild_command(1).await, 1);
        assert_eq!(counters.record_guild_command(1).await, 2);
        assert_eq!(counters.record_guild_command(2).await, 1);
        assert_eq!(counters.guild_commands.read().await.get(&1), 2);
    }
}
