// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Download outcome types.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of one entry's transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    /// The whole file was written.
    Succeeded { bytes: u64 },
    /// The transfer was abandoned; no file is left behind.
    Failed { error: String },
}

impl EntryStatus {
    /// Whether the file was written.
    pub fn is_success(&self) -> bool {
        matches!(self, EntryStatus::Succeeded { .. })
    }
}

/// One attempted entry of a download run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryOutcome {
    pub tag: u32,
    pub name: String,
    /// Source URL the file was requested from.
    pub url: String,
    /// Destination path, whether or not it was written.
    pub path: PathBuf,
    pub status: EntryStatus,
}

/// Completion summary of a download run.
///
/// Holds one outcome per attempted entry, in the order they were attempted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadSummary {
    pub outcomes: Vec<EntryOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DownloadSummary {
    /// Empty summary stamped with the current time.
    pub(crate) fn start() -> Self {
        let now = Utc::now();
        Self {
            outcomes: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Names of every attempted entry, successful or not.
    pub fn names(&self) -> Vec<&str> {
        self.outcomes.iter().map(|o| o.name.as_str()).collect()
    }

    /// Outcomes whose file was written.
    pub fn succeeded(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_success())
    }

    /// Outcomes whose transfer failed.
    pub fn failed(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes.iter().filter(|o| !o.status.is_success())
    }

    /// Number of entries attempted.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of failed entries.
    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// Whether every attempted entry was written.
    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// Bytes written across all successful entries.
    pub fn total_bytes(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                EntryStatus::Succeeded { bytes } => bytes,
                EntryStatus::Failed { .. } => 0,
            })
            .sum()
    }

    /// One-line summary naming every attempted entry.
    pub fn completion_message(&self) -> String {
        format!("Finished downloading entries: {}", self.names().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(tag: u32, name: &str, status: EntryStatus) -> EntryOutcome {
        EntryOutcome {
            tag,
            name: name.to_string(),
            url: format!("http://x.test/c{:06}.cat", tag),
            path: PathBuf::from(format!("c{:06}.cat", tag)),
            status,
        }
    }

    #[test]
    fn test_summary_partitions_outcomes() {
        let mut summary = DownloadSummary::start();
        summary.outcomes.push(outcome(18003, "H2O", EntryStatus::Succeeded { bytes: 10 }));
        summary.outcomes.push(outcome(28503, "CO", EntryStatus::Failed { error: "HTTP 404".into() }));
        summary.outcomes.push(outcome(17002, "NH3", EntryStatus::Succeeded { bytes: 5 }));

        assert_eq!(summary.names(), vec!["H2O", "CO", "NH3"]);
        assert_eq!(summary.attempted(), 3);
        assert_eq!(summary.failure_count(), 1);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.total_bytes(), 15);
        assert_eq!(summary.failed().next().map(|o| o.tag), Some(28503));
        assert_eq!(
            summary.completion_message(),
            "Finished downloading entries: H2O, CO, NH3"
        );
    }

    #[test]
    fn test_status_serializes_tagged() {
        let json = serde_json::to_value(EntryStatus::Succeeded { bytes: 3 }).unwrap();
        assert_eq!(json["status"], "succeeded");
        assert_eq!(json["bytes"], 3);
    }
}
