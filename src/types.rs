//! Type definitions and aliases for the bot.
//!
//! This module contains shared types used throughout the application.

use crate::commands::ModuleRegistry;
use crate::config::{Config, Credentials};
use crate::counters::Counters;
use crate::database::RecordStore;
use crate::process::ProcessInfo;
use crate::uptime::Uptime;
use std::sync::Arc;

/// Bot application data shared across all commands and event handlers.
///
/// Built once at startup and owned by the framework for the process lifetime.
pub struct Data {
    /// Secrets loaded from the credentials file
    pub credentials: Credentials,
    /// Environment settings
    pub config: Config,
    /// Operational counters, also shared with the gateway listener
    pub counters: Arc<Counters>,
    /// Start mark for uptime reporting
    pub uptime: Uptime,
    /// Persistence gateway
    pub store: Arc<dyn RecordStore>,
    /// HTTP client for outbound API requests
    pub http_client: reqwest::Client,
    /// Feature modules in registration order
    pub modules: Arc<ModuleRegistry>,
    /// Resident memory lookups for the stats command
    pub process: ProcessInfo,
}

/// Error type for bot commands (maintains compatibility with poise).
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type alias for easier usage.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// A command as registered with the framework.
pub type Command = poise::Command<Data, Error>;
