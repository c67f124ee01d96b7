//! Row types listed by the dashboard

use chrono::{DateTime, Local, Utc};
use serde::Deserialize;

/// An item of a displayed collection. Only a stable identity is required;
/// it keys rendered rows and is never interpreted otherwise.
pub trait Row {
    fn row_id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Invited,
    InProgress,
    Completed,
    Rejected,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 4] = [
        CandidateStatus::Invited,
        CandidateStatus::InProgress,
        CandidateStatus::Completed,
        CandidateStatus::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CandidateStatus::Invited => "Invited",
            CandidateStatus::InProgress => "In progress",
            CandidateStatus::Completed => "Completed",
            CandidateStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Draft,
    Active,
    Archived,
}

impl AssessmentStatus {
    pub const ALL: [AssessmentStatus; 3] = [
        AssessmentStatus::Draft,
        AssessmentStatus::Active,
        AssessmentStatus::Archived,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AssessmentStatus::Draft => "Draft",
            AssessmentStatus::Active => "Active",
            AssessmentStatus::Archived => "Archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub score: u32,
    pub status: CandidateStatus,
    pub applied_on: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub title: String,
    pub client_name: String,
    pub average_score: f64,
    pub submissions: u32,
    pub status: AssessmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub active_assessments: u32,
    pub total_candidates: u32,
    pub last_active_at: DateTime<Utc>,
    pub account_manager: String,
}

/// A row of any dashboard tab
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Candidate(Candidate),
    Assessment(Assessment),
    Client(Client),
}

impl Record {
    /// Cell text in column order (see `DashboardTab::columns`)
    pub fn cells(&self) -> Vec<String> {
        match self {
            Record::Candidate(c) => vec![
                c.name.clone(),
                c.email.clone(),
                c.score.to_string(),
                c.status.label().to_string(),
                local_date(&c.applied_on),
            ],
            Record::Assessment(a) => vec![
                a.title.clone(),
                a.client_name.clone(),
                format!("{:.1}", a.average_score),
                a.submissions.to_string(),
                a.status.label().to_string(),
                local_date(&a.created_at),
            ],
            Record::Client(c) => vec![
                c.name.clone(),
                c.account_manager.clone(),
                c.active_assessments.to_string(),
                c.total_candidates.to_string(),
                local_date(&c.last_active_at),
            ],
        }
    }
}

impl Row for Record {
    fn row_id(&self) -> &str {
        match self {
            Record::Candidate(c) => &c.id,
            Record::Assessment(a) => &a.id,
            Record::Client(c) => &c.id,
        }
    }
}

impl From<Candidate> for Record {
    fn from(value: Candidate) -> Self {
        Record::Candidate(value)
    }
}

impl From<Assessment> for Record {
    fn from(value: Assessment) -> Self {
        Record::Assessment(value)
    }
}

impl From<Client> for Record {
    fn from(value: Client) -> Self {
        Record::Client(value)
    }
}

fn local_date(value: &DateTime<Utc>) -> String {
    value.with_timezone(&Local).format("%Y-%m-%d").to_string()
}
