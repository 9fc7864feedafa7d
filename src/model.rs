//! Build metadata handed over by the CI system

use serde::{Deserialize, Serialize};

use crate::message::CommitMessage;

/// Length of the abbreviated commit hash shown in notifications
pub const SHORT_COMMIT_LEN: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

impl Repo {
    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub username: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

/// One CI pipeline execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Build {
    pub tag: String,
    pub event: String,
    pub number: u64,
    pub commit: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub branch: String,
    pub author: Author,
    pub pull: String,
    pub message: CommitMessage,
    pub deploy_to: String,
    pub status: String,
    pub link: String,
    /// Unix timestamp (seconds)
    pub started: i64,
    /// Unix timestamp (seconds)
    pub created: i64,
}

impl Build {
    /// First eight characters of the commit hash
    pub fn short_commit(&self) -> String {
        truncate_chars(&self.commit, SHORT_COMMIT_LEN)
    }

    pub fn is_success(&self) -> bool {
        is_success_status(&self.status)
    }

    pub fn is_failure(&self) -> bool {
        is_failure_status(&self.status)
    }
}

pub fn is_success_status(status: &str) -> bool {
    status == "success"
}

pub fn is_failure_status(status: &str) -> bool {
    matches!(status, "failure" | "error" | "killed")
}

/// Character-based prefix, safe on multi-byte input
pub(crate) fn truncate_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}
