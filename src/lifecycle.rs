//! View lifecycle scopes
//!
//! Every view that triggers network calls owns a [`Scope`]. Ending the scope
//! (the view being torn down) makes pending and later results come back as
//! [`Completion::Discarded`] instead of being applied to a dead view.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Result of work run inside a scope
#[derive(Debug, Clone, PartialEq)]
pub enum Completion<T> {
    /// The scope was still alive when the work finished
    Applied(T),
    /// The scope ended first; the result was dropped
    Discarded,
}

impl<T> Completion<T> {
    pub fn is_discarded(&self) -> bool {
        matches!(self, Completion::Discarded)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Completion::Applied(value) => Some(value),
            Completion::Discarded => None,
        }
    }
}

/// Cancellation scope tied to a view's lifetime
#[derive(Clone)]
pub struct Scope {
    active: Arc<watch::Sender<bool>>,
    discarded: Arc<AtomicUsize>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            active: Arc::new(watch::Sender::new(true)),
            discarded: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// End the scope. Idempotent.
    pub fn end(&self) {
        self.active.send_if_modified(|active| std::mem::replace(active, false));
    }

    /// Number of results dropped because the scope had ended
    pub fn discarded(&self) -> usize {
        self.discarded.load(Ordering::SeqCst)
    }

    /// Run `work` unless the scope ends first
    pub async fn run<F>(&self, work: F) -> Completion<F::Output>
    where
        F: Future,
    {
        let mut rx = self.active.subscribe();
        if !*rx.borrow_and_update() {
            return self.discard();
        }

        tokio::select! {
            output = work => {
                if self.is_active() {
                    Completion::Applied(output)
                } else {
                    self.discard()
                }
            }
            _ = rx.wait_for(|active| !*active) => self.discard(),
        }
    }

    fn discard<T>(&self) -> Completion<T> {
        let count = self.discarded.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Scope ended, discarding result ({} so far)", count);
        Completion::Discarded
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
