use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use cisrun_core::executor::traits::{ConcurrencyContext, ConcurrencyStrategyPlugin};
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};

/// Always the same limit: the configured one, or the base the orchestrator offers.
pub struct FixedConcurrencyPlugin {
    fixed: Option<usize>,
}

impl FixedConcurrencyPlugin {
    pub fn new(fixed: Option<usize>) -> Self {
        Self { fixed }
    }
}

#[async_trait]
impl ConcurrencyStrategyPlugin for FixedConcurrencyPlugin {
    fn name(&self) -> &str {
        "fixed"
    }

    fn calculate_concurrency(&self, context: &ConcurrencyContext) -> usize {
        self.fixed.unwrap_or(context.base_concurrency).max(1)
    }
}

#[derive(Debug, Clone)]
pub struct AdaptiveLimits {
    pub min_concurrency: usize,
    pub max_concurrency: usize,
    pub cpu_threshold_low: f32,
    pub cpu_threshold_high: f32,
}

impl Default for AdaptiveLimits {
    fn default() -> Self {
        let cpus = num_cpus::get().max(1);
        Self {
            min_concurrency: 1,
            max_concurrency: cpus * 2,
            cpu_threshold_low: 30.0,
            cpu_threshold_high: 80.0,
        }
    }
}

/// Scales the base limit by current CPU load: halve when busy, double when idle.
///
/// `sysinfo` derives usage from the difference between two refreshes, which must be at
/// least `MINIMUM_CPU_UPDATE_INTERVAL` apart. `observe` waits that out; without a valid
/// reading the base limit is used unchanged.
pub struct AdaptiveConcurrencyPlugin {
    limits: AdaptiveLimits,
    sampler: Mutex<CpuSampler>,
}

struct CpuSampler {
    sys: System,
    refreshed_at: Instant,
    usage: Option<f32>,
}

impl CpuSampler {
    fn refresh(&mut self) {
        self.sys.refresh_cpu();
        self.refreshed_at = Instant::now();
        self.usage = Some(self.sys.global_cpu_info().cpu_usage());
    }
}

impl AdaptiveConcurrencyPlugin {
    pub fn new(limits: AdaptiveLimits) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        Self {
            limits,
            sampler: Mutex::new(CpuSampler {
                sys,
                refreshed_at: Instant::now(),
                usage: None,
            }),
        }
    }

    /// Latest valid reading, refreshed if the last one is old enough.
    fn cpu_usage(&self) -> Option<f32> {
        let mut sampler = self.sampler.lock().ok()?;
        if sampler.refreshed_at.elapsed() >= MINIMUM_CPU_UPDATE_INTERVAL {
            sampler.refresh();
        }
        sampler.usage
    }

    fn adjust(&self, base: usize, cpu_usage: f32) -> usize {
        let limits = &self.limits;
        let mut desired = base;

        if cpu_usage >= limits.cpu_threshold_high {
            desired = desired.saturating_div(2);
        } else if cpu_usage <= limits.cpu_threshold_low {
            desired = desired.saturating_mul(2);
        }

        self.clamp(desired)
    }

    fn clamp(&self, desired: usize) -> usize {
        let limits = &self.limits;
        desired
            .clamp(limits.min_concurrency, limits.max_concurrency.max(limits.min_concurrency))
            .max(1)
    }
}

impl Default for AdaptiveConcurrencyPlugin {
    fn default() -> Self {
        Self::new(AdaptiveLimits::default())
    }
}

#[async_trait]
impl ConcurrencyStrategyPlugin for AdaptiveConcurrencyPlugin {
    fn name(&self) -> &str {
        "adaptive"
    }

    async fn observe(&self) {
        let wait = match self.sampler.lock() {
            Ok(sampler) => MINIMUM_CPU_UPDATE_INTERVAL.saturating_sub(sampler.refreshed_at.elapsed()),
            Err(_) => return,
        };
        tokio::time::sleep(wait).await;
        if let Ok(mut sampler) = self.sampler.lock() {
            sampler.refresh();
        }
    }

    fn calculate_concurrency(&self, context: &ConcurrencyContext) -> usize {
        let base = context.base_concurrency;
        match self.cpu_usage() {
            Some(cpu) => {
                let limit = self.adjust(base, cpu);
                tracing::debug!(cpu_usage = cpu, base, limit, "adaptive concurrency");
                limit
            }
            None => {
                tracing::debug!(base, "no CPU reading yet, keeping base concurrency");
                self.clamp(base)
            }
        }
    }
}
