//! Reload fan-out to connected browser tabs.
//!
//! Each subscriber owns a single-slot mailbox. Broadcasting is a non-blocking
//! `try_send`: a tab that has not drained its previous signal simply misses
//! this one, and a stalled tab never holds up the others.

use crate::debug;
use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Signal delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reload;

/// Registry of open reload mailboxes.
#[derive(Debug, Default)]
pub struct Subscribers {
    next_id: AtomicU64,
    queues: Mutex<FxHashMap<u64, Sender<Reload>>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mailbox. Dropping the returned [`Subscription`] removes it.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = channel::bounded(1);
        self.queues.lock().insert(id, tx);
        debug!("reload"; "subscriber {} connected", id);

        Subscription {
            id,
            rx,
            registry: Arc::clone(self),
        }
    }

    /// Offer a reload to every subscriber. Returns how many accepted it.
    pub fn broadcast(&self) -> usize {
        let queues = self.queues.lock();
        let mut delivered = 0;
        for (id, tx) in queues.iter() {
            match tx.try_send(Reload) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => debug!("reload"; "subscriber {} busy, dropped", id),
                Err(TrySendError::Disconnected(_)) => {}
            }
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.queues.lock().len()
    }

    /// Drop every sender so all mailboxes report disconnection.
    pub fn close_all(&self) {
        let closed = std::mem::take(&mut *self.queues.lock());
        if !closed.is_empty() {
            debug!("reload"; "closed {} subscribers", closed.len());
        }
    }

    fn remove(&self, id: u64) {
        if self.queues.lock().remove(&id).is_some() {
            debug!("reload"; "subscriber {} disconnected", id);
        }
    }
}

/// One tab's mailbox. Unregisters itself on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: Receiver<Reload>,
    registry: Arc<Subscribers>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Select on this; `Err` means the registry closed the mailbox.
    pub fn receiver(&self) -> &Receiver<Reload> {
        &self.rx
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}
