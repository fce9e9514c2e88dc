use sysinfo::System;
use tracing::debug;

/// Chat library reported in `!stats`
pub const LIBRARY: &str = "serenity 0.12";

/// Process-level runtime figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Resident memory in bytes
    pub memory_used: u64,
    /// Virtual memory reserved by the process in bytes
    pub memory_reserved: u64,
    /// Tasks currently alive on the tokio runtime
    pub tasks: usize,
}

/// Guild totals from the chat session cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuildSummary {
    pub servers: usize,
    pub channels: usize,
    pub users: u64,
}

impl RuntimeStats {
    pub fn collect() -> Self {
        let (memory_used, memory_reserved) = process_memory().unwrap_or_default();
        let tasks = tokio::runtime::Handle::try_current()
            .map(|handle| handle.metrics().num_alive_tasks())
            .unwrap_or(0);

        Self {
            memory_used,
            memory_reserved,
            tasks,
        }
    }

    pub fn memory_display(&self) -> String {
        format!(
            "{} / {}",
            format_bytes(self.memory_used),
            format_bytes(self.memory_reserved)
        )
    }
}

fn process_memory() -> Option<(u64, u64)> {
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(e) => {
            debug!("Cannot resolve current pid: {}", e);
            return None;
        }
    };

    let mut system = System::new();
    if !system.refresh_process(pid) {
        return None;
    }
    system
        .process(pid)
        .map(|process| (process.memory(), process.virtual_memory()))
}

/// Human-readable SI byte count, e.g. `12 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

    if bytes < 10 {
        return format!("{} B", bytes);
    }

    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1000 && exponent < UNITS.len() - 1 {
        scaled /= 1000;
        exponent += 1;
    }
    // One decimal place, rounded half up, before picking the format.
    let value = bytes as f64 / 1000f64.powi(exponent as i32);
    let value = (value * 10.0 + 0.5).floor() / 10.0;

    if value < 10.0 && exponent > 0 {
        format!("{:.1} {}", value, UNITS[exponent])
    } else {
        format!("{:.0} {}", value, UNITS[exponent])
    }
}
