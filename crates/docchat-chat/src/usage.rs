use async_trait::async_trait;
use chrono::NaiveDate;
use docchat_types::{ProviderId, UsageSnapshot};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// Per-provider daily request counters
///
/// Every operation takes the caller's notion of `today`; a store whose
/// counters belong to another date zeroes them first. Reads and increments
/// are independent calls, so the quota they enforce is approximate.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Requests `provider` has served today
    async fn count(&self, provider: &ProviderId, today: NaiveDate) -> u64;

    /// Record one more served request, returning the new count
    async fn increment(&self, provider: &ProviderId, today: NaiveDate) -> u64;

    async fn snapshot(&self, today: NaiveDate) -> UsageSnapshot;
}

#[derive(Debug)]
struct UsageState {
    last_reset: NaiveDate,
    counts: BTreeMap<ProviderId, u64>,
}

impl UsageState {
    fn roll_over(&mut self, today: NaiveDate) {
        if self.last_reset != today {
            tracing::info!(previous = %self.last_reset, today = %today, "resetting daily usage counters");
            for count in self.counts.values_mut() {
                *count = 0;
            }
            self.last_reset = today;
        }
    }
}

/// Process-local usage store; counters are lost on restart
#[derive(Debug)]
pub struct InMemoryUsageStore {
    state: Mutex<UsageState>,
}

impl InMemoryUsageStore {
    /// Create a store whose snapshot lists `providers` (at zero) from the start
    pub fn new(providers: impl IntoIterator<Item = ProviderId>, today: NaiveDate) -> Self {
        Self {
            state: Mutex::new(UsageState {
                last_reset: today,
                counts: providers.into_iter().map(|id| (id, 0)).collect(),
            }),
        }
    }
}

#[async_trait]
impl UsageStore for InMemoryUsageStore {
    async fn count(&self, provider: &ProviderId, today: NaiveDate) -> u64 {
        let mut state = self.state.lock().await;
        state.roll_over(today);
        state.counts.get(provider).copied().unwrap_or(0)
    }

    async fn increment(&self, provider: &ProviderId, today: NaiveDate) -> u64 {
        let mut state = self.state.lock().await;
        state.roll_over(today);
        let count = state.counts.entry(provider.clone()).or_insert(0);
        *count += 1;
        *count
    }

    async fn snapshot(&self, today: NaiveDate) -> UsageSnapshot {
        let mut state = self.state.lock().await;
        state.roll_over(today);
        UsageSnapshot {
            last_reset: state.last_reset,
            counts: state.counts.clone(),
        }
    }
}
