use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info};

use super::Configuration;

/// Holds the current configuration snapshot and publishes replacements.
///
/// Readers get an `Arc` to a complete snapshot; a swap replaces the pointer
/// under a write lock held only for the assignment, so a lookup in progress
/// keeps using the snapshot it started with.
#[derive(Debug)]
pub struct ConfigStore {
    current: RwLock<Arc<Configuration>>,
}

impl ConfigStore {
    pub fn new(config: Configuration) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// The snapshot in effect right now
    pub fn load(&self) -> Arc<Configuration> {
        Arc::clone(&self.current.read())
    }

    /// Publish a new snapshot, returning the one it replaced
    pub fn replace(&self, config: Configuration) -> Arc<Configuration> {
        let next = Arc::new(config);
        std::mem::replace(&mut *self.current.write(), next)
    }

    /// Build a replacement with `loader` and publish it only on success.
    ///
    /// On error the current snapshot stays in place untouched.
    pub fn reload<E, F>(&self, loader: F) -> Result<(), E>
    where
        E: std::fmt::Display,
        F: FnOnce() -> Result<Configuration, E>,
    {
        match loader() {
            Ok(config) => {
                info!(
                    modes = config.mode_count(),
                    bindings = config.binding_count(),
                    "configuration reloaded"
                );
                self.replace(config);
                Ok(())
            }
            Err(err) => {
                error!("configuration reload rejected, keeping previous: {}", err);
                Err(err)
            }
        }
    }

    /// Derive a new snapshot from the current one and publish it.
    ///
    /// The write lock is held across `f`, so concurrent updates cannot lose
    /// each other's changes.
    pub fn update<F>(&self, f: F) -> Arc<Configuration>
    where
        F: FnOnce(&Configuration) -> Configuration,
    {
        let mut guard = self.current.write();
        let next = Arc::new(f(&guard));
        *guard = Arc::clone(&next);
        next
    }
}
