//! Producer reading `<dir>/<dataset>.json` files
//!
//! Each file holds a JSON array in the camelCase shape used by the
//! dashboard API (`candidates.json`, `assessments.json`, `clients.json`).

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{DataProducer, ProducerError};
use crate::domain::{Assessment, Candidate, Client, DashboardTab, Record};

pub struct JsonDirProducer {
    dir: PathBuf,
}

impl JsonDirProducer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dataset_path(&self, tab: DashboardTab) -> PathBuf {
        self.dir.join(format!("{}.json", tab.dataset_name()))
    }
}

#[async_trait]
impl DataProducer for JsonDirProducer {
    async fn fetch(&self, tab: DashboardTab) -> Result<Vec<Record>, ProducerError> {
        let path = self.dataset_path(tab);
        tokio::task::spawn_blocking(move || load_dataset(tab, &path))
            .await
            .map_err(|err| ProducerError::Task {
                message: err.to_string(),
            })?
    }

    fn describe(&self) -> String {
        format!("json {}", self.dir.display())
    }
}

fn load_dataset(tab: DashboardTab, path: &Path) -> Result<Vec<Record>, ProducerError> {
    let content = fs::read_to_string(path).map_err(|source| ProducerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match tab {
        DashboardTab::Candidates => parse_rows::<Candidate>(&content, path),
        DashboardTab::Assessments => parse_rows::<Assessment>(&content, path),
        DashboardTab::Clients => parse_rows::<Client>(&content, path),
    }
}

fn parse_rows<T>(content: &str, path: &Path) -> Result<Vec<Record>, ProducerError>
where
    T: DeserializeOwned + Into<Record>,
{
    let rows: Vec<T> = serde_json::from_str(content).map_err(|source| ProducerError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(rows.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Row;

    #[test]
    fn test_dataset_path_uses_tab_name() {
        let producer = JsonDirProducer::new("/data");
        assert_eq!(
            producer.dataset_path(DashboardTab::Assessments),
            PathBuf::from("/data/assessments.json")
        );
    }

    #[test]
    fn test_load_dataset_parses_clients() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clients.json");
        fs::write(
            &path,
            r#"[{"id":"client-9","name":"Client 9","activeAssessments":3,
                "totalCandidates":120,"lastActiveAt":"2024-05-01T08:00:00Z",
                "accountManager":"Carol"}]"#,
        )
        .unwrap();

        let rows = load_dataset(DashboardTab::Clients, &path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_id(), "client-9");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(DashboardTab::Candidates, &dir.path().join("nope.json"))
            .unwrap_err();
        assert!(matches!(err, ProducerError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("candidates.json");
        fs::write(&path, r#"{"not":"an array"}"#).unwrap();
        let err = load_dataset(DashboardTab::Candidates, &path).unwrap_err();
        assert!(matches!(err, ProducerError::Parse { .. }));
    }
}
