//! Domain models for the dashboard
//!
//! The caching and windowing cores are generic; this layer supplies the
//! concrete keys (tabs) and rows (candidates, assessments, clients).

mod records;
mod tab;

pub use records::{
    Assessment, AssessmentStatus, Candidate, CandidateStatus, Client, Record, Row,
};
pub use tab::{Column, DashboardTab};
