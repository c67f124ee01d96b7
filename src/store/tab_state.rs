//! Per-key request state and its transition function

use chrono::{DateTime, Utc};

/// Issue order of a fetch. Strictly increasing per cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchSeq(pub u64);

/// Logical state of a key, derived from the attribute bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStatus {
    Empty,
    Loading,
    Ready,
    Errored,
}

/// Cached collection plus request bookkeeping for one key
#[derive(Debug, Clone, PartialEq)]
pub struct TabState<T> {
    /// Last successfully fetched collection
    pub data: Option<Vec<T>>,
    pub loading: bool,
    /// Message of the most recent failure, cleared on the next request
    pub error: Option<String>,
    /// Issue time of the most recent fetch that has completed
    pub last_fetched_at: Option<DateTime<Utc>>,
    latest_issue: Option<FetchSeq>,
}

impl<T> Default for TabState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            last_fetched_at: None,
            latest_issue: None,
        }
    }
}

impl<T> TabState<T> {
    pub fn status(&self) -> TabStatus {
        if self.loading {
            TabStatus::Loading
        } else if self.error.is_some() {
            TabStatus::Errored
        } else if self.data.is_some() {
            TabStatus::Ready
        } else {
            TabStatus::Empty
        }
    }

    /// Whether a lazy load should issue a fetch: nothing in flight and no
    /// usable data.
    pub fn needs_fetch(&self) -> bool {
        !self.loading && (self.data.is_none() || self.error.is_some())
    }

    /// Sequence of the newest fetch issued for this key, if any
    pub fn latest_issue(&self) -> Option<FetchSeq> {
        self.latest_issue
    }

    /// A completion is stale unless it belongs to the newest issued fetch.
    pub fn is_stale(&self, seq: FetchSeq) -> bool {
        self.latest_issue != Some(seq)
    }

    pub fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }
}

/// Inputs to the per-key state machine
#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent<T> {
    Started {
        seq: FetchSeq,
    },
    Succeeded {
        seq: FetchSeq,
        issued_at: DateTime<Utc>,
        data: Vec<T>,
    },
    Failed {
        seq: FetchSeq,
        issued_at: DateTime<Utc>,
        message: String,
    },
}

impl<T> TabEvent<T> {
    pub fn seq(&self) -> FetchSeq {
        match self {
            TabEvent::Started { seq }
            | TabEvent::Succeeded { seq, .. }
            | TabEvent::Failed { seq, .. } => *seq,
        }
    }
}

/// Apply `event` to `state`.
///
/// Completions that do not belong to the newest issued fetch are dropped, as
/// are starts older than the newest one, so the most recently issued fetch
/// always determines the final state. Data is only ever replaced by a
/// successful completion.
pub fn transition<T>(state: TabState<T>, event: TabEvent<T>) -> TabState<T> {
    match event {
        TabEvent::Started { seq } => {
            if state.latest_issue.is_some_and(|latest| seq <= latest) {
                return state;
            }
            TabState {
                loading: true,
                error: None,
                latest_issue: Some(seq),
                ..state
            }
        }
        TabEvent::Succeeded {
            seq,
            issued_at,
            data,
        } => {
            if state.is_stale(seq) {
                return state;
            }
            TabState {
                data: Some(data),
                loading: false,
                error: None,
                last_fetched_at: Some(issued_at),
                ..state
            }
        }
        TabEvent::Failed {
            seq,
            issued_at,
            message,
        } => {
            if state.is_stale(seq) {
                return state;
            }
            TabState {
                loading: false,
                error: Some(message),
                last_fetched_at: Some(issued_at),
                ..state
            }
        }
    }
}
