//! Notification text composition
//!
//! Each output (message, fallback, fields) comes either from its configured
//! template or from the built-in format, never a mix of both.

use tracing::debug;

use crate::config::NotificationConfig;
use crate::model::{Build, Repo};
use crate::template::{self, RenderContext, TemplateResult};

/// The rendered text outputs of one notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    pub message: String,
    pub fallback: String,
    /// JSON array of `{title, short, value}` objects, only when a fields
    /// template is configured. Not validated here.
    pub fields: Option<String>,
}

/// Default rich message, Slack markup
pub fn message(repo: &Repo, build: &Build) -> String {
    format!(
        "*{}* <{}|{}/{}#{}> ({}) by {}",
        build.status,
        build.link,
        repo.owner,
        repo.name,
        build.short_commit(),
        build.branch,
        build.author.username,
    )
}

/// Default plain-text fallback
pub fn fallback(repo: &Repo, build: &Build) -> String {
    format!(
        "{} {}/{}#{} ({}) by {}",
        build.status,
        repo.owner,
        repo.name,
        build.short_commit(),
        build.branch,
        build.author.username,
    )
}

pub fn compose(repo: &Repo, build: &Build, config: &NotificationConfig) -> TemplateResult<Composed> {
    let ctx = RenderContext::new(repo, build);

    let message = match non_empty(&config.template) {
        Some(text) => {
            debug!("rendering message from template");
            template::render(text, &ctx)?
        }
        None => message(repo, build),
    };

    let fallback = match non_empty(&config.fallback) {
        Some(text) => {
            debug!("rendering fallback from template");
            template::render(text, &ctx)?
        }
        None => fallback(repo, build),
    };

    let fields = match non_empty(&config.fields_template) {
        Some(text) => {
            debug!("rendering fields from template");
            Some(template::render(text, &ctx)?)
        }
        None => None,
    };

    Ok(Composed {
        message,
        fallback,
        fields,
    })
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
