//! Commit message parsing

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A commit message split into its title line and body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitMessage {
    raw: String,
    pub title: String,
    pub body: String,
}

impl CommitMessage {
    /// Split a raw commit message on its first newline.
    ///
    /// A single blank line between title and body is dropped; any further
    /// blank lines are kept as part of the body.
    pub fn parse(raw: &str) -> Self {
        let (title, body) = match raw.split_once('\n') {
            Some((title, rest)) => (title, rest.strip_prefix('\n').unwrap_or(rest)),
            None => (raw, ""),
        };

        Self {
            raw: raw.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    /// The message exactly as it was committed
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl From<&str> for CommitMessage {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for CommitMessage {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl std::fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

// Fixtures carry the message as a plain string; title and body are derived.
impl Serialize for CommitMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for CommitMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
