//! Resident memory of the bot process.

use parking_lot::Mutex;
use sysinfo::{Pid, System};

const BYTES_PER_MB: f64 = 1_000_000.0;

/// Process table handle used by the stats command.
pub struct ProcessInfo {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl ProcessInfo {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!("Cannot resolve own process id: {}", e);
                None
            }
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
        }
    }

    /// Current resident set size in megabytes, if the platform reports it.
    pub fn memory_mb(&self) -> Option<f64> {
        let pid = self.pid?;
        let mut system = self.system.lock();
        if !system.refresh_process(pid) {
            return None;
        }
        system
            .process(pid)
            .map(|process| process.memory() as f64 / BYTES_PER_MB)
    }
}

impl Default for ProcessInfo {
    fn default() -> Self {
        Self::new()
    }
}
