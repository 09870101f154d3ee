//! Step counters.
//!
//! The platform pedometer lives outside this crate. [`StepSource`] is the view
//! the progression engine needs of it; [`ManualStepSource`] is a counter driven
//! by hand, used by the CLI, the simulator and tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::utils::persistence::{load_json, save_json_logged, KeyValueStore};

/// Store key for the manual counter's lifetime total.
pub const LIFETIME_KEY: &str = "lifetimeSteps";

/// Payload of a step `update` notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepUpdate {
    pub today: u64,
    /// Cumulative steps since install or the last reset.
    pub lifetime: u64,
}

/// A source of cumulative step counts.
pub trait StepSource: Send + Sync {
    fn today(&self) -> u64;
    fn lifetime(&self) -> u64;
    fn reset(&self);

    fn snapshot(&self) -> StepUpdate {
        StepUpdate {
            today: self.today(),
            lifetime: self.lifetime(),
        }
    }
}

/// A step counter advanced by [`walk`](ManualStepSource::walk).
///
/// When backed by a store, the lifetime total survives restarts.
#[derive(Default)]
pub struct ManualStepSource {
    today: AtomicU64,
    lifetime: AtomicU64,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl ManualStepSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter starting at `lifetime` steps.
    pub fn starting_at(lifetime: u64) -> Self {
        Self {
            lifetime: AtomicU64::new(lifetime),
            ..Self::default()
        }
    }

    /// Counter whose lifetime total is read from and written to `store`.
    pub fn persistent(store: Arc<dyn KeyValueStore>) -> Self {
        let lifetime = load_json::<u64>(store.as_ref(), LIFETIME_KEY).unwrap_or(0);
        Self {
            today: AtomicU64::new(0),
            lifetime: AtomicU64::new(lifetime),
            store: Some(store),
        }
    }

    /// Records `steps` more steps and returns the resulting update.
    pub fn walk(&self, steps: u64) -> StepUpdate {
        let today = self.today.fetch_add(steps, Ordering::SeqCst) + steps;
        let lifetime = self.lifetime.fetch_add(steps, Ordering::SeqCst) + steps;
        self.persist(lifetime);
        StepUpdate { today, lifetime }
    }

    fn persist(&self, lifetime: u64) {
        if let Some(store) = &self.store {
            save_json_logged(store.as_ref(), LIFETIME_KEY, &lifetime);
        }
    }
}

impl StepSource for ManualStepSource {
    fn today(&self) -> u64 {
        self.today.load(Ordering::SeqCst)
    }

    fn lifetime(&self) -> u64 {
        self.lifetime.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.today.store(0, Ordering::SeqCst);
        self.lifetime.store(0, Ordering::SeqCst);
        self.persist(0);
    }
}
