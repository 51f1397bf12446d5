//! Cross-process fingerprint ledger
//!
//! Records contact address → last built content fingerprint in a durable store so a
//! secondary process can find a bitmap on disk without resolving photos or initials.
//! Writes are detached tasks; nothing waits for them and failures only reach the log.

use std::{collections::HashMap, sync::Arc};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, trace};

use crate::{config::defaults::LEDGER_KEY_PREFIX, models::Address, services::traits::KeyValueStore};

pub fn ledger_key(address: &Address) -> String {
    format!("{LEDGER_KEY_PREFIX}{address}")
}

pub struct FingerprintLedger {
    store: Arc<dyn KeyValueStore>,
    /// Last value this process wrote or saw per address
    known: HashMap<Address, String>,
    pending: Vec<JoinHandle<()>>,
}

impl FingerprintLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            known: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Record a fingerprint for an address without waiting for the write.
    ///
    /// Skipped when this process already recorded the same value; the spawned task
    /// also compares against the stored value before writing.
    pub fn record(&mut self, address: &Address, content_fingerprint: &str) {
        if self.known.get(address).is_some_and(|known| known == content_fingerprint) {
            return;
        }

        let Ok(runtime) = Handle::try_current() else {
            debug!("No async runtime; skipping ledger write for {}", address);
            return;
        };

        self.known
            .insert(address.clone(), content_fingerprint.to_string());
        self.pending.retain(|handle| !handle.is_finished());

        let store = Arc::clone(&self.store);
        let key = ledger_key(address);
        let value = content_fingerprint.to_string();
        self.pending.push(runtime.spawn(async move {
            match store.get(&key).await {
                Ok(Some(current)) if current == value => {
                    trace!("Ledger already current for {}", key);
                    return;
                }
                Ok(_) => {}
                Err(e) => debug!("Ledger read for {} failed, writing anyway: {}", key, e),
            }
            match store.set(&key, &value).await {
                Ok(()) => trace!("Ledger updated {} -> {}", key, value),
                Err(e) => debug!("Dropped ledger write for {}: {}", key, e),
            }
        }));
    }

    /// Stored fingerprint for an address; store errors read as absent
    pub async fn lookup(&self, address: &Address) -> Option<String> {
        let key = ledger_key(address);
        match self.store.get(&key).await {
            Ok(value) => value,
            Err(e) => {
                debug!("Ledger lookup for {} failed: {}", key, e);
                None
            }
        }
    }

    /// Number of writes not yet observed as finished
    pub fn pending_writes(&self) -> usize {
        self.pending.iter().filter(|handle| !handle.is_finished()).count()
    }

    /// Wait for outstanding writes. Used at shutdown so a short-lived process does
    /// not exit before its ledger is durable.
    pub async fn flush(&mut self) {
        for handle in self.pending.drain(..) {
            if let Err(e) = handle.await {
                debug!("Ledger write task ended abnormally: {}", e);
            }
        }
    }
}
