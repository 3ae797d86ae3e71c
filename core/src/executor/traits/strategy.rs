use async_trait::async_trait;

/// Picks the background concurrency limit for one batch.
#[async_trait]
pub trait ConcurrencyStrategyPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Sample whatever the strategy needs from the host. Awaited once per batch,
    /// right before `calculate_concurrency`.
    async fn observe(&self) {}

    fn calculate_concurrency(&self, context: &ConcurrencyContext) -> usize;
}

#[derive(Debug, Clone)]
pub struct ConcurrencyContext {
    pub available_cpus: usize,
    /// Limit from config or flags, before the strategy adjusts it.
    pub base_concurrency: usize,
    pub pending_scripts: usize,
}
