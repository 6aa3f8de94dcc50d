//! Run record: metadata describing one extraction run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::ExtractionSummary;
use crate::scanner::{LanguageFilter, ScanSummary};
use crate::unit::{Authority, UnitKind};

/// One extraction run over a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRun {
    pub id: String,
    pub repo_root: String,
    pub commit_sha: Option<String>,
    pub branch: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub unit: UnitKind,
    /// Language filter, as given on the command line
    pub language: String,
    pub authority: Authority,
    pub scan: ScanSummary,
    pub extraction: ExtractionSummary,
}

impl ExtractionRun {
    /// Create a new run record
    #[must_use]
    pub fn new(repo_root: impl Into<String>, unit: UnitKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            repo_root: repo_root.into(),
            commit_sha: None,
            branch: None,
            started_at: Utc::now(),
            finished_at: None,
            unit,
            language: LanguageFilter::All.to_string(),
            authority: Authority::default(),
            scan: ScanSummary::default(),
            extraction: ExtractionSummary::default(),
        }
    }

    /// Set the commit SHA
    #[must_use]
    pub fn with_commit(mut self, sha: impl Into<String>) -> Self {
        self.commit_sha = Some(sha.into());
        self
    }

    /// Set the branch
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Set the language filter
    #[must_use]
    pub fn with_language(mut self, language: LanguageFilter) -> Self {
        self.language = language.to_string();
        self
    }

    /// Set the authority tag
    #[must_use]
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = authority;
        self
    }

    /// Try to populate git info from the repository containing the root
    #[must_use]
    pub fn with_git_info(mut self) -> Self {
        if let Ok(repo) = git2::Repository::discover(&self.repo_root) {
            if let Ok(head) = repo.head() {
                if let Some(oid) = head.target() {
                    self.commit_sha = Some(oid.to_string());
                }
                if let Some(name) = head.shorthand() {
                    self.branch = Some(name.to_string());
                }
            }
        }
        self
    }

    /// Record the scan and extraction counters and stamp the finish time
    #[must_use]
    pub fn finish(mut self, scan: ScanSummary, extraction: ExtractionSummary) -> Self {
        self.scan = scan;
        self.extraction = extraction;
        self.finished_at = Some(Utc::now());
        self
    }
}

#[cfg(test)]
mod tests;
