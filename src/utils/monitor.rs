use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// 單一階段結束時的快照
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub memory_mb: u64,
    pub cpu_usage: f32,
    pub elapsed: Duration,
}

/// 記錄每個階段的耗時與行程記憶體，停用時只記時間
pub struct RunMonitor {
    #[cfg(feature = "cli")]
    system: Option<Mutex<(System, Pid)>>,
    started: Instant,
    peak_memory_mb: std::sync::atomic::AtomicU64,
    enabled: bool,
}

impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        #[cfg(feature = "cli")]
        let system = if enabled {
            sysinfo::get_current_pid()
                .ok()
                .map(|pid| Mutex::new((System::new(), pid)))
        } else {
            None
        };

        Self {
            #[cfg(feature = "cli")]
            system,
            started: Instant::now(),
            peak_memory_mb: std::sync::atomic::AtomicU64::new(0),
            enabled,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[cfg(feature = "cli")]
    fn sample(&self) -> Option<(u64, f32)> {
        let guard = self.system.as_ref()?;
        let mut guard = guard.lock().ok()?;
        let (system, pid) = &mut *guard;
        let pid = *pid;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        let process = system.process(pid)?;
        Some((process.memory() / 1024 / 1024, process.cpu_usage()))
    }

    #[cfg(not(feature = "cli"))]
    fn sample(&self) -> Option<(u64, f32)> {
        None
    }

    pub fn snapshot(&self, phase: &str) -> Option<PhaseStats> {
        if !self.enabled {
            return None;
        }
        let (memory_mb, cpu_usage) = self.sample().unwrap_or((0, 0.0));
        self.peak_memory_mb
            .fetch_max(memory_mb, std::sync::atomic::Ordering::Relaxed);
        Some(PhaseStats {
            phase: phase.to_string(),
            memory_mb,
            cpu_usage,
            elapsed: self.elapsed(),
        })
    }

    pub fn log_phase(&self, phase: &str) {
        if let Some(stats) = self.snapshot(phase) {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Time: {:?}",
                stats.phase,
                stats.cpu_usage,
                stats.memory_mb,
                stats.elapsed
            );
        }
    }

    pub fn log_final_stats(&self) {
        if self.enabled {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                self.elapsed(),
                self.peak_memory_mb
                    .load(std::sync::atomic::Ordering::Relaxed)
            );
        }
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_has_no_snapshots() {
        let monitor = RunMonitor::disabled();
        assert!(!monitor.is_enabled());
        assert!(monitor.snapshot("extract").is_none());
    }

    #[test]
    fn test_enabled_monitor_reports_phase_name() {
        let monitor = RunMonitor::new(true);
        let stats = monitor.snapshot("prepare").unwrap();
        assert_eq!(stats.phase, "prepare");
    }
}
