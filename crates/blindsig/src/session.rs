//! Signer-side per-session secret storage.
//!
//! Secrets are keyed by the hashed token exactly as it appears on the
//! wire. `take` removes the entry, so a stored nonce can answer at most
//! one sign request; reusing an ECDSA nonce across two signatures would
//! leak the private key. Entries expire after a TTL to bound memory
//! growth and the replay window.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(120);

#[derive(Debug)]
struct Entry<S> {
    secret: S,
    created_at: Instant,
}

#[derive(Debug)]
pub struct SessionStore<S> {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<S>>>,
}

impl<S> SessionStore<S> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stores a fresh secret for `hashed_token`. A re-init for the same
    /// token replaces the previous secret; the lock serializes concurrent
    /// inserts so the stored value is always one caller's intact secret.
    pub fn insert(&self, hashed_token: &str, secret: S) {
        let mut entries = self.entries.lock().expect("session store mutex poisoned");
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.created_at.elapsed() < ttl);
        entries.insert(
            hashed_token.to_owned(),
            Entry {
                secret,
                created_at: Instant::now(),
            },
        );
    }

    /// Removes and returns the secret for `hashed_token`, if present and
    /// not expired. At most one caller can ever obtain a given secret.
    pub fn take(&self, hashed_token: &str) -> Option<S> {
        let mut entries = self.entries.lock().expect("session store mutex poisoned");
        match entries.remove(hashed_token) {
            Some(entry) if entry.created_at.elapsed() < self.ttl => Some(entry.secret),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("session store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S> Default for SessionStore<S> {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn take_consumes_the_secret() {
        let store = SessionStore::default();
        store.insert("token", 42u32);
        assert_eq!(store.take("token"), Some(42));
        assert_eq!(store.take("token"), None);
    }

    #[test]
    fn unknown_token_yields_nothing() {
        let store = SessionStore::<u32>::default();
        assert_eq!(store.take("unknown"), None);
    }

    #[test]
    fn reinit_replaces_the_secret() {
        let store = SessionStore::default();
        store.insert("token", 1u32);
        store.insert("token", 2u32);
        assert_eq!(store.take("token"), Some(2));
    }

    #[test]
    fn expired_entries_are_gone() {
        let store = SessionStore::new(Duration::ZERO);
        store.insert("token", 1u32);
        assert_eq!(store.take("token"), None);
    }

    #[test]
    fn insert_sweeps_expired_entries() {
        let store = SessionStore::new(Duration::ZERO);
        store.insert("a", 1u32);
        store.insert("b", 2u32);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_inits_leave_one_intact_secret() {
        let store = Arc::new(SessionStore::default());

        let handles: Vec<_> = (0..16u64)
            .map(|value| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    // Every writer stores a pair whose halves must stay
                    // together; a torn write would break the invariant.
                    store.insert("token", (value, value.wrapping_mul(31)));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let (a, b) = store.take("token").expect("one secret survives");
        assert_eq!(b, a.wrapping_mul(31));
        assert!(store.take("token").is_none());
    }

    #[test]
    fn concurrent_takes_yield_at_most_one_secret() {
        let store = Arc::new(SessionStore::default());
        store.insert("token", 7u32);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.take("token"))
            })
            .collect();

        let winners = handles
            .into_iter()
            .filter_map(|handle| handle.join().unwrap())
            .count();
        assert_eq!(winners, 1);
    }
}
