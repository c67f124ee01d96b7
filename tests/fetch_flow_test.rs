//! End-to-end fetch flow through the runtime bridge
//!
//! These tests drive the real Tokio worker thread and verify that:
//! 1. The most recently issued fetch wins even when an older one finishes last
//! 2. The JSON directory producer feeds every tab
//! 3. A failing dataset leaves the tab in the error state while others load

use std::fs;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;

use talentboard::app::App;
use talentboard::config::ListSettings;
use talentboard::domain::{DashboardTab, Record, Row};
use talentboard::infrastructure::producer::generate_candidates;
use talentboard::infrastructure::{
    DataProducer, JsonDirProducer, MockProducer, ProducerError, RuntimeBridge, RuntimeCommand,
    RuntimeEvent,
};
use talentboard::store::{Completion, TabStatus};

/// Answers the n-th call after `delays[n]` with `sizes[n]` candidates
struct ScriptedProducer {
    delays: Vec<Duration>,
    sizes: Vec<usize>,
    calls: AtomicUsize,
}

impl ScriptedProducer {
    fn new(script: &[(u64, usize)]) -> Self {
        Self {
            delays: script.iter().map(|(ms, _)| Duration::from_millis(*ms)).collect(),
            sizes: script.iter().map(|(_, size)| *size).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataProducer for ScriptedProducer {
    async fn fetch(&self, _tab: DashboardTab) -> Result<Vec<Record>, ProducerError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.get(call).copied().unwrap_or_default();
        let size = self.sizes.get(call).copied().unwrap_or_default();
        tokio::time::sleep(delay).await;
        Ok(generate_candidates(size, Utc::now()))
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

fn settings() -> ListSettings {
    ListSettings {
        row_height: NonZeroU32::MIN,
        overscan: 4,
    }
}

fn dispatch(app: &mut App, bridge: &RuntimeBridge) {
    for ticket in app.take_fetch_requests() {
        bridge.send(RuntimeCommand::Fetch { ticket }).unwrap();
    }
}

/// Apply completions until nothing is loading
fn drain(app: &mut App, bridge: &RuntimeBridge) -> Vec<Completion> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut completions = Vec::new();
    while app.is_refreshing() {
        assert!(Instant::now() < deadline, "fetches did not finish in time");
        if let Some(RuntimeEvent::FetchFinished { ticket, result }) =
            bridge.recv_timeout(Duration::from_millis(100))
        {
            completions.push(app.apply_fetch_result(ticket, result));
        }
    }
    completions
}

fn wait_until(mut ready: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !ready() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_latest_issued_fetch_wins_out_of_order() {
    let producer = Arc::new(ScriptedProducer::new(&[(400, 2), (10, 7)]));
    let bridge = RuntimeBridge::new(producer.clone()).unwrap();
    let mut app = App::new(settings(), "scripted");

    dispatch(&mut app, &bridge);
    wait_until(|| producer.calls() == 1);

    let forced = app.cache.refresh(DashboardTab::Candidates).unwrap();
    bridge.send(RuntimeCommand::Fetch { ticket: forced }).unwrap();

    let mut completions = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    while completions.len() < 2 {
        assert!(Instant::now() < deadline, "fetches did not finish in time");
        if let Some(RuntimeEvent::FetchFinished { ticket, result }) =
            bridge.recv_timeout(Duration::from_millis(100))
        {
            completions.push(app.apply_fetch_result(ticket, result));
        }
    }

    assert_eq!(completions, vec![Completion::Applied, Completion::Stale]);
    let state = app.current_state().unwrap();
    assert_eq!(state.data.as_ref().map(Vec::len), Some(7));
    assert_eq!(state.last_fetched_at, Some(forced.issued_at));
    assert!(!state.loading);
}

#[test]
fn test_json_directory_feeds_every_tab() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("candidates.json"),
        r#"[
            {"id":"c-1","name":"Ada","email":"ada@example.com","score":91,
             "status":"completed","appliedOn":"2024-03-01T10:00:00Z"},
            {"id":"c-2","name":"Linus","email":"linus@example.com","score":40,
             "status":"invited","appliedOn":"2024-03-02T10:00:00Z"}
        ]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("assessments.json"),
        r#"[{"id":"a-1","title":"Backend","clientName":"Acme","averageScore":72.5,
             "submissions":14,"status":"active","createdAt":"2024-02-01T09:00:00Z"}]"#,
    )
    .unwrap();

    let bridge = RuntimeBridge::new(Arc::new(JsonDirProducer::new(dir.path()))).unwrap();
    let mut app = App::new(settings(), "json");

    dispatch(&mut app, &bridge);
    drain(&mut app, &bridge);
    assert_eq!(app.current_state().unwrap().status(), TabStatus::Ready);
    assert_eq!(app.current_rows()[1].row_id(), "c-2");

    app.select_tab(DashboardTab::Assessments);
    dispatch(&mut app, &bridge);
    drain(&mut app, &bridge);
    assert_eq!(app.current_rows().len(), 1);
    assert_eq!(app.current_rows()[0].cells()[2], "72.5");

    app.select_tab(DashboardTab::Clients);
    dispatch(&mut app, &bridge);
    drain(&mut app, &bridge);
    let clients = app.current_state().unwrap();
    assert_eq!(clients.status(), TabStatus::Errored);
    assert!(clients.data.is_none());
    assert!(clients.error.as_deref().unwrap().contains("clients.json"));

    // Earlier tabs are untouched by the failure
    assert_eq!(
        app.state(DashboardTab::Candidates).unwrap().status(),
        TabStatus::Ready
    );
}

#[test]
fn test_failed_refresh_keeps_rows_end_to_end() {
    let producer = Arc::new(MockProducer::new(Duration::from_millis(5), NonZeroU32::new(2)));
    let bridge = RuntimeBridge::new(producer).unwrap();
    let mut app = App::new(settings(), "mock");

    dispatch(&mut app, &bridge);
    drain(&mut app, &bridge);
    let loaded = app.current_rows().len();
    assert!(loaded > 0);

    app.refresh_active();
    dispatch(&mut app, &bridge);
    drain(&mut app, &bridge);

    let state = app.current_state().unwrap();
    assert_eq!(state.status(), TabStatus::Errored);
    assert_eq!(app.current_rows().len(), loaded);
    assert!(state.error.as_deref().unwrap().contains("simulated"));
}

#[tokio::test]
async fn test_concurrent_mock_fetches_share_failure_schedule() {
    let producer = MockProducer::new(Duration::from_millis(5), NonZeroU32::new(3));
    let results =
        futures::future::join_all(DashboardTab::ALL.iter().map(|tab| producer.fetch(*tab))).await;

    assert_eq!(producer.requests(), 3);
    assert_eq!(results.iter().filter(|result| result.is_err()).count(), 1);
}
