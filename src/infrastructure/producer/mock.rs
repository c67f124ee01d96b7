//! In-process producer with generated datasets and simulated latency

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};

use super::{DataProducer, ProducerError};
use crate::domain::{
    Assessment, AssessmentStatus, Candidate, CandidateStatus, Client, DashboardTab, Record,
};

pub const CANDIDATE_COUNT: usize = 1500;
pub const ASSESSMENT_COUNT: usize = 300;
pub const CLIENT_COUNT: usize = 200;

const ACCOUNT_MANAGERS: [&str; 5] = ["Alice", "Bob", "Carol", "David", "Eve"];

/// Serves pre-generated datasets after a fixed delay.
///
/// With `fail_every = Some(n)`, every n-th request fails, which makes the
/// error and retry paths reachable without a real backend.
pub struct MockProducer {
    candidates: Arc<Vec<Record>>,
    assessments: Arc<Vec<Record>>,
    clients: Arc<Vec<Record>>,
    latency: Duration,
    fail_every: Option<NonZeroU32>,
    requests: AtomicU64,
}

impl MockProducer {
    pub fn new(latency: Duration, fail_every: Option<NonZeroU32>) -> Self {
        let now = Utc::now();
        Self {
            candidates: Arc::new(generate_candidates(CANDIDATE_COUNT, now)),
            assessments: Arc::new(generate_assessments(ASSESSMENT_COUNT, now)),
            clients: Arc::new(generate_clients(CLIENT_COUNT, now)),
            latency,
            fail_every,
            requests: AtomicU64::new(0),
        }
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    fn dataset(&self, tab: DashboardTab) -> &Arc<Vec<Record>> {
        match tab {
            DashboardTab::Candidates => &self.candidates,
            DashboardTab::Assessments => &self.assessments,
            DashboardTab::Clients => &self.clients,
        }
    }
}

#[async_trait]
impl DataProducer for MockProducer {
    async fn fetch(&self, tab: DashboardTab) -> Result<Vec<Record>, ProducerError> {
        let request = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(every) = self.fail_every {
            if request % u64::from(every.get()) == 0 {
                return Err(ProducerError::Simulated { request });
            }
        }
        Ok(self.dataset(tab).as_ref().clone())
    }

    fn describe(&self) -> String {
        format!("mock ({}ms)", self.latency.as_millis())
    }
}

pub fn generate_candidates(count: usize, now: DateTime<Utc>) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let status = CandidateStatus::ALL[i % CandidateStatus::ALL.len()];
            let score_base = match status {
                CandidateStatus::Completed => 50,
                CandidateStatus::InProgress => 30,
                _ => 10,
            };
            let n = i + 1;
            Record::Candidate(Candidate {
                id: format!("cand-{n}"),
                name: format!("Candidate {n}"),
                email: format!("candidate{n}@example.com"),
                score: (score_base + (i % 50) as u32).min(100),
                status,
                applied_on: now - ChronoDuration::days(i as i64),
            })
        })
        .collect()
}

pub fn generate_assessments(count: usize, now: DateTime<Utc>) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let n = i + 1;
            Record::Assessment(Assessment {
                id: format!("assess-{n}"),
                title: format!("Full Stack Assessment {n}"),
                client_name: format!("Client {}", 1 + i % 20),
                average_score: (40 + i % 60) as f64,
                submissions: (50 + (i * 7) % 500) as u32,
                status: AssessmentStatus::ALL[i % AssessmentStatus::ALL.len()],
                created_at: now - ChronoDuration::days(2 * i as i64),
            })
        })
        .collect()
}

pub fn generate_clients(count: usize, now: DateTime<Utc>) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let n = i + 1;
            Record::Client(Client {
                id: format!("client-{n}"),
                name: format!("Client {n}"),
                active_assessments: ((i * 3) % 15) as u32,
                total_candidates: (100 + (i * 23) % 2000) as u32,
                last_active_at: now - ChronoDuration::days(3 * i as i64),
                account_manager: ACCOUNT_MANAGERS[i % ACCOUNT_MANAGERS.len()].to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Row;

    #[test]
    fn test_candidate_generation() {
        let now = Utc::now();
        let rows = generate_candidates(8, now);
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].row_id(), "cand-1");
        match &rows[2] {
            Record::Candidate(c) => {
                assert_eq!(c.status, CandidateStatus::Completed);
                assert_eq!(c.score, 52);
                assert_eq!(c.applied_on, now - ChronoDuration::days(2));
            }
            other => panic!("unexpected row {other:?}"),
        }
    }

    #[test]
    fn test_scores_are_capped() {
        let rows = generate_candidates(200, Utc::now());
        for row in rows {
            if let Record::Candidate(c) = row {
                assert!(c.score <= 100);
            }
        }
    }

    #[test]
    fn test_client_managers_rotate() {
        let rows = generate_clients(6, Utc::now());
        let managers: Vec<_> = rows
            .iter()
            .map(|row| match row {
                Record::Client(c) => c.account_manager.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(managers, ["Alice", "Bob", "Carol", "David", "Eve", "Alice"]);
    }

    #[test]
    fn test_assessment_fields() {
        let rows = generate_assessments(25, Utc::now());
        match &rows[21] {
            Record::Assessment(a) => {
                assert_eq!(a.client_name, "Client 2");
                assert_eq!(a.average_score, 61.0);
                assert_eq!(a.submissions, 50 + 147);
                assert_eq!(a.status, AssessmentStatus::Draft);
            }
            other => panic!("unexpected row {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_dataset_for_tab() {
        let producer = MockProducer::new(Duration::ZERO, None);
        let rows = producer.fetch(DashboardTab::Clients).await.unwrap();
        assert_eq!(rows.len(), CLIENT_COUNT);
        assert!(matches!(rows[0], Record::Client(_)));
        assert_eq!(producer.requests(), 1);
    }

    #[tokio::test]
    async fn test_fail_every_is_deterministic() {
        let producer = MockProducer::new(Duration::ZERO, NonZeroU32::new(2));
        assert!(producer.fetch(DashboardTab::Candidates).await.is_ok());
        let err = producer.fetch(DashboardTab::Candidates).await.unwrap_err();
        assert!(matches!(err, ProducerError::Simulated { request: 2 }));
        assert!(producer.fetch(DashboardTab::Assessments).await.is_ok());
    }
}
