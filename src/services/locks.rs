use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Per-round mutual exclusion for matchmaking invocations
///
/// The engine's read-compute-insert sequence is not transactional across
/// its phases, so two concurrent invocations against the same round could
/// both see an interviewer/slot as free. Holding the round's lock across
/// the whole pass serializes invocations; the store's uniqueness
/// constraints remain as a second line of defense across processes.
#[derive(Debug, Default)]
pub struct RoundLocks {
    inner: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl RoundLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a round, waiting if another invocation holds it
    pub async fn acquire(&self, round_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry = self.inner.lock().await;
            registry
                .entry(round_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_round_serializes() {
        let locks = Arc::new(RoundLocks::new());
        let round_id = Uuid::new_v4();

        let guard = locks.acquire(round_id).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(round_id).await;
            })
        };

        // The contender cannot finish while the lock is held
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_rounds_do_not_block() {
        let locks = RoundLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        // A different round acquires immediately
        let _b = locks.acquire(Uuid::new_v4()).await;
    }
}
