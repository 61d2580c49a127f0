use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    /// Percentage of rows processed.
    InProgress(u32),
    Completed(String),
    Failed(String),
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Completed(_) | JobStatus::Failed(_))
    }
}

/// Completion message of a merge job that wrote `rows` documents.
pub fn merge_summary(rows: usize) -> String {
    format!("{} documents generated", rows)
}

/// Number of documents reported by a [`merge_summary`] message.
pub fn merge_summary_rows(summary: &str) -> Option<usize> {
    summary.split_whitespace().next()?.parse().ok()
}
