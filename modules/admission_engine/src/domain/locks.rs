//! Per-primary advisory locks
//!
//! Referral submissions read capacity, check it and write; two submissions
//! against the same primary must not interleave inside this process.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct PrimaryLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl PrimaryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `primary_id`; released when the guard drops
    pub async fn acquire(&self, primary_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            // Entries nobody holds or waits on are only referenced by the map.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(primary_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of primaries currently tracked
    pub fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_primary_is_serialized() {
        let locks = Arc::new(PrimaryLocks::new());
        let primary = Uuid::new_v4();

        let guard = locks.acquire(primary).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(primary).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_primaries_do_not_block() {
        let locks = PrimaryLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        let _b = locks.acquire(Uuid::new_v4()).await;

        assert_eq!(locks.tracked(), 2);
    }

    #[tokio::test]
    async fn test_released_entries_are_pruned() {
        let locks = PrimaryLocks::new();
        drop(locks.acquire(Uuid::new_v4()).await);
        let _held = locks.acquire(Uuid::new_v4()).await;

        assert_eq!(locks.tracked(), 1);
    }
}
