//! Single Flight Module
//!
//! Collapses concurrent identical loads into one execution. The first
//! caller for a key becomes the leader and runs the load; callers that
//! arrive while it is in flight wait for and share the leader's result.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::{watch, Mutex};

use crate::cache::ByteView;
use crate::error::{CacheError, Result};

type FlightResult = Result<ByteView>;
type FlightReceiver = watch::Receiver<Option<FlightResult>>;

enum Role {
    Leader(watch::Sender<Option<FlightResult>>),
    Follower(FlightReceiver),
}

// == Single Flight ==
/// Per-key deduplication of in-flight loads.
///
/// Only the map of in-flight call records is guarded by the lock; the
/// load itself runs outside it, so a slow load blocks followers on its
/// own key and nothing else. Records are removed as soon as the leader
/// publishes: this deduplicates overlapping calls only, it is not a
/// result cache.
pub struct SingleFlight {
    calls: Mutex<HashMap<String, FlightReceiver>>,
}

impl SingleFlight {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    // == Run ==
    /// Executes `load` for `key`, unless a load for the same key is
    /// already in flight, in which case the caller waits for that one.
    ///
    /// Followers wait unboundedly; there is no timeout or cancellation.
    pub async fn run<F, Fut>(&self, key: &str, load: F) -> FlightResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FlightResult>,
    {
        let role = {
            let mut calls = self.calls.lock().await;
            match calls.get(key) {
                Some(rx) => Role::Follower(rx.clone()),
                None => {
                    let (tx, rx) = watch::channel(None);
                    calls.insert(key.to_string(), rx);
                    Role::Leader(tx)
                }
            }
        };

        match role {
            Role::Follower(rx) => Self::wait(rx).await,
            Role::Leader(tx) => {
                let result = load().await;
                // Publish before dropping the record so every waiter
                // observes the result; callers arriving after this point
                // start a fresh load.
                let _ = tx.send(Some(result.clone()));
                self.calls.lock().await.remove(key);
                result
            }
        }
    }

    async fn wait(mut rx: FlightReceiver) -> FlightResult {
        loop {
            {
                let published = rx.borrow_and_update();
                if let Some(result) = published.as_ref() {
                    return result.clone();
                }
            }
            if rx.changed().await.is_err() {
                return Err(CacheError::Internal(
                    "in-flight load dropped before publishing".to_string(),
                ));
            }
        }
    }
}

impl Default for SingleFlight {
    fn default() -> Self {
        Self::new()
    }
}
