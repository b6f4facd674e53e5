//! Application state for the Result Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::calculation::StatsCache;
use crate::config::ConfigLoader;
use crate::store::InMemoryStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded institution configuration, the record store, and the cohort
/// statistics cache. Handlers that need both locks take the store first.
#[derive(Clone)]
pub struct AppState {
    /// The loaded institution configuration.
    config: Arc<ConfigLoader>,
    /// Registrations, courses, students and summaries.
    store: Arc<RwLock<InMemoryStore>>,
    /// Cohort statistics, invalidated whenever scores change.
    stats_cache: Arc<Mutex<StatsCache>>,
}

impl AppState {
    /// Creates a new application state with an empty store.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_store(config, InMemoryStore::new())
    }

    /// Creates a new application state over an existing store.
    pub fn with_store(config: ConfigLoader, store: InMemoryStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(RwLock::new(store)),
            stats_cache: Arc::new(Mutex::new(StatsCache::new())),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shared store.
    pub fn store(&self) -> &RwLock<InMemoryStore> {
        &self.store
    }

    /// Returns the shared cohort statistics cache.
    pub fn stats_cache(&self) -> &Mutex<StatsCache> {
        &self.stats_cache
    }
}
