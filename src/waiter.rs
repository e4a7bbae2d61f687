//! The waiter registry couples a channel's state changes to blocked `select`
//! calls.
//!
//! Every `select` call owns exactly one [`Notifier`], registers it in the
//! relevant registry of every channel it spans, and waits on it when no op
//! is immediately ready. A send, receive, or close that changes a channel's
//! state notifies every token currently registered in that channel's
//! registries, so a selector can never sleep through a change that would
//! have made it ready.
//!
//! Registration is keyed on `Arc` pointer identity rather than equality: a
//! `select` call that lists the same channel twice (e.g. selecting both a
//! send and a receive on it) must not register its token twice, and the
//! registry must not be fooled into thinking two distinct tokens are the
//! same because their contents happen to match.

use std::collections::HashMap;

use crate::loom_exports::sync::{Arc, Condvar, Mutex};

/// A one-shot, per-`select`-call signal.
///
/// Registered in the waiter registries of every channel a `select` call
/// spans. A channel notifies it whenever that channel's state changes in a
/// way that could make a pending op ready.
pub struct Notifier {
    signalled: Mutex<bool>,
    cvar: Condvar,
}

impl Notifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            signalled: Mutex::new(false),
            cvar: Condvar::new(),
        })
    }

    /// Marks this notifier signalled and wakes any thread waiting on it.
    pub fn notify(&self) {
        let mut signalled = self.signalled.lock().unwrap();
        *signalled = true;
        self.cvar.notify_all();
    }

    /// Blocks until `notify` is called at least once since the last `wait`.
    pub fn wait(&self) {
        let mut signalled = self.signalled.lock().unwrap();
        while !*signalled {
            signalled = self.cvar.wait(signalled).unwrap();
        }
        *signalled = false;
    }
}

/// An identity-keyed set of blocked selectors' notification tokens.
///
/// Keyed on `Arc::as_ptr` rather than `Eq`/`Hash` on `Notifier` itself, since
/// `Notifier` carries no meaningful equality of its own: two different
/// `select` calls are different waiters even if their internal state
/// happens to coincide.
pub struct WaiterList {
    waiters: Mutex<HashMap<usize, Arc<Notifier>>>,
}

impl WaiterList {
    pub fn new() -> Self {
        Self {
            waiters: Mutex::new(HashMap::new()),
        }
    }

    fn key(token: &Arc<Notifier>) -> usize {
        Arc::as_ptr(token) as usize
    }

    /// Inserts `token` if it is not already registered. Idempotent.
    pub fn insert(&self, token: &Arc<Notifier>) {
        let mut waiters = self.waiters.lock().unwrap();
        waiters.entry(Self::key(token)).or_insert_with(|| token.clone());
    }

    /// Removes `token` if present. A no-op if it was never registered.
    pub fn remove(&self, token: &Arc<Notifier>) {
        let mut waiters = self.waiters.lock().unwrap();
        waiters.remove(&Self::key(token));
    }

    /// Notifies every currently-registered token.
    pub fn notify_all(&self) {
        let waiters = self.waiters.lock().unwrap();
        for token in waiters.values() {
            token.notify();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent_by_identity() {
        let list = WaiterList::new();
        let token = Notifier::new();

        list.insert(&token);
        list.insert(&token);

        assert_eq!(list.waiters.lock().unwrap().len(), 1);
    }

    #[test]
    fn distinct_tokens_are_distinct_entries() {
        let list = WaiterList::new();
        let a = Notifier::new();
        let b = Notifier::new();

        list.insert(&a);
        list.insert(&b);

        assert_eq!(list.waiters.lock().unwrap().len(), 2);
    }

    #[test]
    fn remove_drops_only_the_named_token() {
        let list = WaiterList::new();
        let a = Notifier::new();
        let b = Notifier::new();

        list.insert(&a);
        list.insert(&b);
        list.remove(&a);

        let remaining = list.waiters.lock().unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.contains_key(&(Arc::as_ptr(&b) as usize)));
    }

    #[test]
    fn notify_all_wakes_every_registered_token() {
        let list = WaiterList::new();
        let a = Notifier::new();
        let b = Notifier::new();

        list.insert(&a);
        list.insert(&b);
        list.notify_all();

        // Both must return immediately; a lack of notification would hang
        // the test (caught by the surrounding test-runner timeout).
        a.wait();
        b.wait();
    }
}
