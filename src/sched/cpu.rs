/*!
 * CPU Sampling
 * Windowed aggregate utilization measurements that also pace the loop
 */

use std::num::NonZeroUsize;
use std::time::Duration;
use sysinfo::System;

/// Samples aggregate CPU utilization over a fixed window
///
/// A sample takes `window` wall time, so the scheduling loop needs no
/// separate idle sleep between ticks.
#[derive(Debug)]
pub struct CpuSampler {
    sys: System,
    window: Duration,
}

impl CpuSampler {
    /// Create a sampler; windows below the backend's minimum refresh
    /// interval are clamped up to it
    pub fn new(window: Duration) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        Self {
            sys,
            window: window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Utilization across all cores over one window, in percent
    pub async fn sample(&mut self) -> f32 {
        tokio::time::sleep(self.window).await;
        self.sys.refresh_cpu_usage();
        self.sys.global_cpu_info().cpu_usage()
    }

    /// Logical core count, used for the one-core headroom check
    pub fn logical_cores(&self) -> usize {
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }
}
