//! Slack incoming-webhook payload
//!
//! Wraps the composed texts into the attachment shape the webhook accepts.
//! Sending the payload is left to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::compose::{compose, Composed};
use crate::config::NotificationConfig;
use crate::model::{Build, Repo};
use crate::template::TemplateError;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Invalid fields JSON: {0}")]
    FieldsJson(#[source] serde_json::Error),
}

/// Result type for payload construction
pub type PayloadResult<T> = Result<T, PayloadError>;

/// One `{title, short, value}` entry of an attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    #[serde(default)]
    pub short: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub text: String,
    pub fallback: String,
    pub color: String,
    pub mrkdwn_in: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon_emoji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_names: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl Payload {
    /// Compose the notification texts and assemble the webhook payload
    pub fn build(repo: &Repo, build: &Build, config: &NotificationConfig) -> PayloadResult<Self> {
        let composed = compose(repo, build, config)?;
        Self::from_composed(composed, build, config)
    }

    pub fn from_composed(
        composed: Composed,
        build: &Build,
        config: &NotificationConfig,
    ) -> PayloadResult<Self> {
        let fields = match composed.fields {
            Some(json) => parse_fields(&json)?,
            None => Vec::new(),
        };

        let attachment = Attachment {
            text: composed.message,
            fallback: composed.fallback,
            color: color(build, config),
            mrkdwn_in: vec!["text".to_string(), "fallback".to_string()],
            image_url: config.image_url.clone(),
            fields,
        };

        let channel = if !config.recipient.is_empty() {
            prepend("@", &config.recipient)
        } else if !config.channel.is_empty() {
            prepend("#", &config.channel)
        } else {
            String::new()
        };
        debug!(channel = %channel, color = %attachment.color, "built webhook payload");

        Ok(Self {
            channel,
            username: config.username.clone(),
            icon_url: config.icon_url.clone(),
            icon_emoji: config.icon_emoji.clone(),
            link_names: config.link_names.then(|| "1".to_string()),
            attachments: vec![attachment],
        })
    }
}

/// Parse rendered fields text into attachment fields
pub fn parse_fields(json: &str) -> PayloadResult<Vec<AttachmentField>> {
    serde_json::from_str(json).map_err(PayloadError::FieldsJson)
}

/// Attachment color: explicit config wins, otherwise derived from status
pub fn color(build: &Build, config: &NotificationConfig) -> String {
    if !config.color.is_empty() {
        return config.color.clone();
    }

    if build.is_success() {
        "good".to_string()
    } else if build.is_failure() {
        "danger".to_string()
    } else {
        "warning".to_string()
    }
}

fn prepend(prefix: &str, s: &str) -> String {
    if s.starts_with(prefix) {
        s.to_string()
    } else {
        format!("{}{}", prefix, s)
    }
}
