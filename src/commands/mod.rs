//! Feature modules and their registration.
//!
//! Each feature module contributes a group of commands. The registry keeps
//! the modules in a fixed order, which is also the order their commands are
//! registered in.

pub mod help;
pub mod meta;
pub mod ping;
pub mod stats;
pub mod uptime;

pub use help::help;
pub use meta::Meta;
pub use ping::ping;
pub use stats::stats;
pub use uptime::uptime;

use crate::error::{Result, ShellError};
use crate::types::Command;
use poise::serenity_prelude as serenity;
use std::sync::atomic::{AtomicBool, Ordering};

/// A themed group of commands attached to the shared client at startup.
pub trait FeatureModule: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Fresh instances of every command this module provides.
    fn commands(&self) -> Vec<Command>;
}

/// Fixed, ordered set of feature modules.
///
/// Modules are never removed, swapped or reloaded once the registry is built.
pub struct ModuleRegistry {
    modules: Vec<Box<dyn FeatureModule>>,
    registered: AtomicBool,
}

impl ModuleRegistry {
    pub fn new(modules: Vec<Box<dyn FeatureModule>>) -> Self {
        Self {
            modules,
            registered: AtomicBool::new(false),
        }
    }

    /// The modules shipped with the shell.
    pub fn standard() -> Self {
        Self::new(vec![Box::new(Meta)])
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|module| module.name()).collect()
    }

    /// Every module's commands, in module order.
    pub fn commands(&self) -> Vec<Command> {
        self.modules
            .iter()
            .flat_map(|module| module.commands())
            .collect()
    }

    /// Take the one-time registration slot.
    ///
    /// Returns `false` if registration already happened (or is in progress).
    fn claim_registration(&self) -> bool {
        !self.registered.swap(true, Ordering::AcqRel)
    }

    fn release_registration(&self) {
        self.registered.store(false, Ordering::Release);
    }

    /// Register the application commands with the platform.
    ///
    /// Runs at most once per process: later calls, such as after a gateway
    /// reconnect, are no-ops. A failure releases the slot and is returned as
    /// `ShellError::Registration`.
    ///
    /// # Arguments
    ///
    /// * `http` - HTTP handle of the connected client
    /// * `commands` - The framework's command list
    pub async fn register_all(
        &self,
        http: impl AsRef<serenity::Http>,
        commands: &[Command],
    ) -> Result<()> {
        if !self.claim_registration() {
            tracing::debug!("Feature modules already registered, skipping");
            return Ok(());
        }

        if let Err(e) = poise::builtins::register_globally(http, commands).await {
            self.release_registration();
            return Err(ShellError::Registration(format!(
                "Failed to register commands: {}",
                e
            )));
        }

        tracing::info!(
            modules = ?self.module_names(),
            commands = commands.len(),
            "Registered feature modules"
        );
        Ok(())
    }
}
