//! Process metrics sampled with sysinfo

use std::sync::Mutex;

use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::warn;

pub(super) struct ProcessSample {
    pub rss_bytes: u64,
    pub virtual_bytes: u64,
    pub cpu_seconds: f64,
}

pub(super) struct ProcessSampler {
    system: Mutex<System>,
    pid: Pid,
}

impl ProcessSampler {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            pid: Pid::from_u32(std::process::id()),
        }
    }

    /// Refresh only the current process.
    pub fn sample(&self) -> Option<ProcessSample> {
        let mut sys = match self.system.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("System metrics mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        };

        sys.refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        sys.process(self.pid).map(|process| ProcessSample {
            rss_bytes: process.memory(),
            virtual_bytes: process.virtual_memory(),
            // accumulated in milliseconds
            cpu_seconds: process.accumulated_cpu_time() as f64 / 1000.0,
        })
    }
}
