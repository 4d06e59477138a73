//! Bot housekeeping commands.

use super::{help, ping, stats, uptime, FeatureModule};
use crate::types::Command;

/// Help, latency, uptime and usage statistics.
pub struct Meta;

impl FeatureModule for Meta {
    fn name(&self) -> &'static str {
        "Meta"
    }

    fn commands(&self) -> Vec<Command> {
        vec![help(), ping(), uptime(), stats()]
    }
}
