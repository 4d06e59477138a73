//! rpgbot library.
//!
//! This library provides the runtime shell for the RPG bot: configuration and
//! secrets, operational counters, uptime tracking, the persistence gateway,
//! the feature module registry, gateway event handlers and the read-only
//! status service.

pub mod bot;
pub mod commands;
pub mod config;
pub mod counters;
pub mod database;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod process;
pub mod records;
pub mod stats_api;
pub mod status;
pub mod types;
pub mod uptime;

pub use config::{Config, Credentials};
pub use error::{Result, ShellError};
