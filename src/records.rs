//! Fallback payloads served when no record is stored for an id.
//!
//! These mirror the shape the feature modules store in `userdata` and
//! `servdata`, so consumers of the status service can parse a default the same
//! way they parse a stored record.

use crate::database::RecordTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultUser {
    pub money: i64,
    pub level: u32,
    pub exp: u64,
    pub items: BTreeMap<String, u64>,
    pub characters: Vec<String>,
    #[serde(rename = "box")]
    pub pokemon_box: Vec<serde_json::Value>,
    pub guild: Option<String>,
}

/// Default guild record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultGuild {
    pub currency: String,
    pub start_money: i64,
    pub items: BTreeMap<String, serde_json::Value>,
    pub characters: BTreeMap<String, serde_json::Value>,
    pub shop_items: BTreeMap<String, serde_json::Value>,
    pub market_items: BTreeMap<String, serde_json::Value>,
    pub lootboxes: BTreeMap<String, serde_json::Value>,
    pub hide_inventories: bool,
}

impl Default for DefaultGuild {
    fn default() -> Self {
        Self {
            currency: "dollars".to_string(),
            start_money: 0,
            items: BTreeMap::new(),
            characters: BTreeMap::new(),
            shop_items: BTreeMap::new(),
            market_items: BTreeMap::new(),
            lootboxes: BTreeMap::new(),
            hide_inventories: false,
        }
    }
}

/// Serialized default payload for `table`.
pub fn default_payload(table: RecordTable) -> String {
    let payload = match table {
        RecordTable::UserData => serde_json::to_value(DefaultUser::default()),
        RecordTable::ServData => serde_json::to_value(DefaultGuild::default()),
    };
    // Plain structs of maps and scalars always serialize.
    payload.map(|value| value.to_string()).unwrap_or_else(|_| "{}".to_string())
}
