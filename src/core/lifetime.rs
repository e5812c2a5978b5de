//! Cancellation token shared by long-running serve tasks.
//!
//! A [`Lifetime`] wraps the receiving end of a channel nobody ever sends on.
//! Cancelling drops the only sender, which disconnects every clone at once,
//! so a task can wait for cancellation inside a `select!` next to its other
//! channels.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Create a linked canceller/lifetime pair.
pub fn lifetime() -> (Canceller, Lifetime) {
    let (tx, rx) = channel::bounded(0);
    (
        Canceller {
            tx: Arc::new(Mutex::new(Some(tx))),
        },
        Lifetime { rx },
    )
}

/// Ends a [`Lifetime`]. Cloneable; cancelling more than once is a no-op.
#[derive(Debug, Clone)]
pub struct Canceller {
    tx: Arc<Mutex<Option<Sender<()>>>>,
}

impl Canceller {
    pub fn cancel(&self) {
        self.tx.lock().take();
    }
}

/// Observes cancellation.
#[derive(Debug, Clone)]
pub struct Lifetime {
    rx: Receiver<()>,
}

impl Lifetime {
    /// Becomes ready (with `Err`) once cancelled; use as a `select!` arm.
    pub fn done(&self) -> &Receiver<()> {
        &self.rx
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_cancel_reaches_all_clones() {
        let (canceller, lifetime) = lifetime();
        let other = lifetime.clone();
        assert!(!lifetime.is_cancelled());

        canceller.clone().cancel();
        assert!(lifetime.is_cancelled());
        assert!(other.is_cancelled());

        canceller.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn test_done_unblocks_after_cancel() {
        let (canceller, lifetime) = lifetime();
        let waiter = thread::spawn(move || lifetime.done().recv().is_err());

        thread::sleep(Duration::from_millis(20));
        canceller.cancel();
        assert!(waiter.join().unwrap());
    }
}
