//! Keyed fetch cache - lazy loading with explicit refresh
//!
//! The cache never performs I/O. Issuing a fetch records the request and
//! hands back a [`FetchTicket`]; whoever runs the producer reports the outcome
//! through [`FetchCache::complete`].

use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::{DateTime, Utc};

use crate::core::FetchError;
use crate::store::tab_state::{transition, FetchSeq, TabEvent, TabState};

/// Proof that a fetch was issued, carried to the producer and back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket<K> {
    pub key: K,
    pub seq: FetchSeq,
    pub issued_at: DateTime<Utc>,
}

/// Outcome of reporting a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer fetch was issued for the key after this one
    Stale,
    UnknownKey,
}

/// Request state for a fixed set of keys
#[derive(Debug)]
pub struct FetchCache<K, T> {
    entries: BTreeMap<K, TabState<T>>,
    next_seq: u64,
}

impl<K, T> FetchCache<K, T>
where
    K: Copy + Ord + Debug,
{
    /// Create a cache with every key in the empty state.
    pub fn new(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            entries: keys.into_iter().map(|key| (key, TabState::default())).collect(),
            next_seq: 1,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.keys().copied()
    }

    pub fn state(&self, key: K) -> Option<&TabState<T>> {
        self.entries.get(&key)
    }

    /// Issue a fetch unless the key already has usable data or a request in
    /// flight.
    pub fn ensure(&mut self, key: K) -> Option<FetchTicket<K>> {
        let state = self.entries.get(&key)?;
        if !state.needs_fetch() {
            tracing::debug!(event = "cache.ensure.hit", key = ?key, loading = state.loading);
            return None;
        }
        self.issue(key)
    }

    /// Issue a fetch regardless of the current state. Returns `None` only for
    /// keys outside the cache.
    pub fn refresh(&mut self, key: K) -> Option<FetchTicket<K>> {
        self.issue(key)
    }

    pub fn is_any_loading(&self) -> bool {
        self.entries.values().any(|state| state.loading)
    }

    /// Record the outcome of a previously issued fetch.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket<K>,
        result: Result<Vec<T>, FetchError>,
    ) -> Completion {
        let Some(state) = self.entries.get_mut(&ticket.key) else {
            tracing::warn!(event = "cache.complete.unknown_key", key = ?ticket.key);
            return Completion::UnknownKey;
        };
        if state.is_stale(ticket.seq) {
            tracing::info!(
                event = "cache.fetch.discarded_stale",
                key = ?ticket.key,
                seq = ticket.seq.0,
                latest = state.latest_issue().map(|seq| seq.0),
            );
            return Completion::Stale;
        }

        let event = match result {
            Ok(data) => {
                tracing::info!(
                    event = "cache.fetch.succeeded",
                    key = ?ticket.key,
                    seq = ticket.seq.0,
                    rows = data.len(),
                );
                TabEvent::Succeeded {
                    seq: ticket.seq,
                    issued_at: ticket.issued_at,
                    data,
                }
            }
            Err(err) => {
                tracing::warn!(
                    event = "cache.fetch.failed",
                    key = ?ticket.key,
                    seq = ticket.seq.0,
                    error = %err,
                );
                TabEvent::Failed {
                    seq: ticket.seq,
                    issued_at: ticket.issued_at,
                    message: err.into_message(),
                }
            }
        };
        *state = transition(std::mem::take(state), event);
        Completion::Applied
    }

    fn issue(&mut self, key: K) -> Option<FetchTicket<K>> {
        let state = self.entries.get_mut(&key)?;
        let issued_at = Utc::now();
        let seq = FetchSeq(self.next_seq);
        self.next_seq += 1;

        *state = transition(std::mem::take(state), TabEvent::Started { seq });
        tracing::info!(
            event = "cache.fetch.issued",
            key = ?key,
            seq = seq.0,
            has_data = state.data.is_some(),
        );
        Some(FetchTicket {
            key,
            seq,
            issued_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TabStatus;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Key {
        A,
        B,
        C,
    }

    fn cache() -> FetchCache<Key, &'static str> {
        FetchCache::new([Key::A, Key::B])
    }

    #[test]
    fn test_starts_with_all_keys_empty() {
        let cache = cache();
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec![Key::A, Key::B]);
        for key in [Key::A, Key::B] {
            assert_eq!(cache.state(key).unwrap().status(), TabStatus::Empty);
        }
        assert!(cache.state(Key::C).is_none());
        assert!(!cache.is_any_loading());
    }

    #[test]
    fn test_double_ensure_issues_once() {
        let mut cache = cache();
        let first = cache.ensure(Key::A);
        let second = cache.ensure(Key::A);
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(cache.is_any_loading());
    }

    #[test]
    fn test_ensure_after_success_is_cache_hit() {
        let mut cache = cache();
        let ticket = cache.ensure(Key::A).unwrap();
        assert_eq!(cache.complete(&ticket, Ok(vec!["x"])), Completion::Applied);

        for _ in 0..5 {
            assert!(cache.ensure(Key::A).is_none());
        }
        let state = cache.state(Key::A).unwrap();
        assert_eq!(state.data, Some(vec!["x"]));
        assert_eq!(state.last_fetched_at, Some(ticket.issued_at));
        assert!(!cache.is_any_loading());
    }

    #[test]
    fn test_keys_are_independent() {
        let mut cache = cache();
        let a = cache.ensure(Key::A).unwrap();
        assert_eq!(cache.state(Key::B).unwrap().status(), TabStatus::Empty);
        let b = cache.ensure(Key::B).unwrap();
        assert_ne!(a.seq, b.seq);

        cache.complete(&b, Ok(vec!["b"]));
        assert_eq!(cache.state(Key::B).unwrap().status(), TabStatus::Ready);
        assert_eq!(cache.state(Key::A).unwrap().status(), TabStatus::Loading);
        assert!(cache.is_any_loading());
    }

    #[test]
    fn test_refresh_always_issues() {
        let mut cache = cache();
        let first = cache.refresh(Key::A).unwrap();
        let second = cache.refresh(Key::A).unwrap();
        assert!(second.seq > first.seq);
        assert!(cache.refresh(Key::C).is_none());
    }

    #[test]
    fn test_latest_issue_wins_when_earlier_completes_last() {
        let mut cache = cache();
        let lazy = cache.ensure(Key::A).unwrap();
        let forced = cache.refresh(Key::A).unwrap();

        assert_eq!(cache.complete(&forced, Ok(vec!["new"])), Completion::Applied);
        assert_eq!(cache.complete(&lazy, Ok(vec!["old"])), Completion::Stale);

        let state = cache.state(Key::A).unwrap();
        assert_eq!(state.data, Some(vec!["new"]));
        assert_eq!(state.last_fetched_at, Some(forced.issued_at));
        assert!(!state.loading);
    }

    #[test]
    fn test_stale_completion_does_not_end_loading() {
        let mut cache = cache();
        let lazy = cache.ensure(Key::A).unwrap();
        let _forced = cache.refresh(Key::A).unwrap();

        assert_eq!(
            cache.complete(&lazy, Err(FetchError::new("old failure"))),
            Completion::Stale
        );
        let state = cache.state(Key::A).unwrap();
        assert!(state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_failed_refresh_keeps_data() {
        let mut cache = cache();
        let ticket = cache.ensure(Key::A).unwrap();
        cache.complete(&ticket, Ok(vec!["kept"]));

        let refresh = cache.refresh(Key::A).unwrap();
        assert_eq!(cache.state(Key::A).unwrap().data, Some(vec!["kept"]));
        cache.complete(&refresh, Err(FetchError::new("timeout")));

        let state = cache.state(Key::A).unwrap();
        assert_eq!(state.data, Some(vec!["kept"]));
        assert_eq!(state.error.as_deref(), Some("timeout"));
        assert_eq!(state.last_fetched_at, Some(refresh.issued_at));
        assert_eq!(state.status(), TabStatus::Errored);
    }

    #[test]
    fn test_ensure_retries_after_failure() {
        let mut cache = cache();
        let ticket = cache.ensure(Key::A).unwrap();
        cache.complete(&ticket, Err(FetchError::new("down")));
        assert!(cache.ensure(Key::A).is_some());
        assert_eq!(cache.state(Key::A).unwrap().error, None);
    }

    #[test]
    fn test_unknown_key() {
        let mut cache = cache();
        assert!(cache.ensure(Key::C).is_none());
        let ticket = FetchTicket {
            key: Key::C,
            seq: FetchSeq(1),
            issued_at: Utc::now(),
        };
        assert_eq!(cache.complete(&ticket, Ok(vec![])), Completion::UnknownKey);
    }
}
