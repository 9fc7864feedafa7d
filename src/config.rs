use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::model::{Build, Repo};
use crate::template::Template;

/// Notification settings. Empty strings fall back to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Main message template
    pub template: String,
    /// Plain-text fallback template
    pub fallback: String,
    /// Template producing a JSON array of attachment fields
    pub fields_template: String,
    /// Delivery endpoint. Carried for the sender and shown by `preview`;
    /// it does not affect the payload.
    pub webhook: String,
    pub channel: String,
    /// Direct message target; takes precedence over `channel`
    pub recipient: String,
    pub username: String,
    pub icon_url: String,
    pub icon_emoji: String,
    pub image_url: String,
    /// Attachment color; derived from the build status when empty
    pub color: String,
    pub link_names: bool,
}

impl NotificationConfig {
    /// Parse every configured template so mistakes surface before a build
    /// result is ever rendered
    pub fn validate(&self) -> Result<()> {
        for (key, text) in [
            ("template", &self.template),
            ("fallback", &self.fallback),
            ("fields_template", &self.fields_template),
        ] {
            if !text.is_empty() {
                Template::parse(text).with_context(|| format!("Invalid config.{}", key))?;
            }
        }

        Ok(())
    }
}

/// A captured build result: what the CI system would hand over at run time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    pub repo: Repo,
    pub build: Build,
    #[serde(default)]
    pub config: NotificationConfig,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;

        let fixture: Fixture = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        fixture.config.validate()?;

        Ok(fixture)
    }
}
