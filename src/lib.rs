//! build-notify - CI build chat notifications
//!
//! A library for turning a CI build result into a chat notification:
//! - Commit message parsing into title and body
//! - Jinja-style templates over build metadata
//! - Default message and fallback formats
//! - Slack webhook payload assembly with attachment fields

pub mod compose;
pub mod config;
pub mod message;
pub mod model;
pub mod payload;
pub mod template;

#[cfg(test)]
mod testing;

pub use compose::{compose, fallback, message, Composed};
pub use config::{Fixture, NotificationConfig};
pub use message::CommitMessage;
pub use model::{Author, Build, Repo};
pub use payload::{Attachment, AttachmentField, Payload, PayloadError};
pub use template::{render, RenderContext, Template, TemplateError};
