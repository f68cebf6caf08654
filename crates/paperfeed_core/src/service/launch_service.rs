//! Launch flag: whether onboarding has been completed.

use crate::repo::kv_repo::{KeyValueStore, StorageResult, HAS_LAUNCHED_KEY};
use log::{info, warn};

const LAUNCHED_VALUE: &str = "true";

/// Persisted first-launch flag.
pub struct LaunchService<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> LaunchService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns `true` once the flag was written; `false` on absence or error.
    pub fn has_launched(&self) -> bool {
        match self.store.get(HAS_LAUNCHED_KEY) {
            Ok(value) => value.as_deref() == Some(LAUNCHED_VALUE),
            Err(err) => {
                warn!(
                    "event=launch_flag_read module=launch status=fallback error={}",
                    err
                );
                false
            }
        }
    }

    /// Records that onboarding has been completed.
    pub fn mark_launched(&self) -> StorageResult<()> {
        self.store.set(HAS_LAUNCHED_KEY, LAUNCHED_VALUE)?;
        info!("event=launch_flag_set module=launch status=ok");
        Ok(())
    }

    /// Startup check: returns `true` until onboarding has been completed.
    ///
    /// Read-only; the flag is written by `mark_launched` at the end of
    /// onboarding. Any stored value counts as launched, not just `"true"`.
    ///
    /// # Errors
    /// Propagates read failures; the caller picks the fallback screen.
    pub fn check_first_launch(&self) -> StorageResult<bool> {
        Ok(self.store.get(HAS_LAUNCHED_KEY)?.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::LaunchService;
    use crate::repo::kv_repo::MemoryKeyValueStore;

    #[test]
    fn startup_check_does_not_write_the_flag() {
        let store = MemoryKeyValueStore::new();
        let service = LaunchService::new(&store);
        assert!(service.check_first_launch().unwrap());
        assert!(service.check_first_launch().unwrap());
        assert!(store.is_empty());
        assert!(!service.has_launched());

        service.mark_launched().unwrap();
        assert!(!service.check_first_launch().unwrap());
        assert!(service.has_launched());
    }
}
