//! Field paths a template may reference
//!
//! The set is closed: every path maps to exactly one accessor over
//! [`RenderContext`]. Anything not listed here is an undefined field.

use std::fmt;
use std::sync::Arc;

use minijinja::value::{Object, Value};

use crate::model::{Build, Repo};

/// Read-only view of the data a template is rendered against
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub repo: &'a Repo,
    pub build: &'a Build,
}

impl<'a> RenderContext<'a> {
    pub fn new(repo: &'a Repo, build: &'a Build) -> Self {
        Self { repo, build }
    }

    /// Engine-side root object exposing `repo` and `build`
    pub(crate) fn to_value(self) -> Value {
        let snapshot = Snapshot {
            repo: self.repo.clone(),
            build: self.build.clone(),
        };
        Value::from_object(Scope {
            data: Arc::new(snapshot),
            path: "",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    RepoOwner,
    RepoName,
    Tag,
    Event,
    Number,
    Commit,
    ShortCommit,
    Ref,
    Branch,
    AuthorUsername,
    AuthorName,
    AuthorEmail,
    AuthorAvatar,
    Pull,
    Message,
    MessageTitle,
    MessageBody,
    DeployTo,
    Status,
    Link,
    Started,
    Created,
}

const FIELDS: &[(&str, Field)] = &[
    ("repo.owner", Field::RepoOwner),
    ("repo.name", Field::RepoName),
    ("build.tag", Field::Tag),
    ("build.event", Field::Event),
    ("build.number", Field::Number),
    ("build.commit", Field::Commit),
    ("build.shortCommit", Field::ShortCommit),
    ("build.ref", Field::Ref),
    ("build.branch", Field::Branch),
    ("build.author", Field::AuthorUsername),
    ("build.author.username", Field::AuthorUsername),
    ("build.author.name", Field::AuthorName),
    ("build.author.email", Field::AuthorEmail),
    ("build.author.avatar", Field::AuthorAvatar),
    ("build.pull", Field::Pull),
    ("build.message", Field::Message),
    ("build.message.title", Field::MessageTitle),
    ("build.message.body", Field::MessageBody),
    ("build.deployTo", Field::DeployTo),
    ("build.status", Field::Status),
    ("build.link", Field::Link),
    ("build.started", Field::Started),
    ("build.created", Field::Created),
];

impl Field {
    pub fn lookup(path: &str) -> Option<Field> {
        FIELDS
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, field)| *field)
    }

    /// Every recognized path, including aliases
    pub fn paths() -> impl Iterator<Item = &'static str> {
        FIELDS.iter().map(|(name, _)| *name)
    }

    /// `path` as the static prefix of some longer field path, if it is one
    fn scope(path: &str) -> Option<&'static str> {
        FIELDS
            .iter()
            .map(|(name, _)| *name)
            .find(|name| name.len() > path.len() && name.starts_with(path) && name.as_bytes()[path.len()] == b'.')
            .map(|name| &name[..path.len()])
    }

    pub fn resolve(self, ctx: &RenderContext<'_>) -> Value {
        let RenderContext { repo, build } = *ctx;

        match self {
            Field::RepoOwner => Value::from(repo.owner.as_str()),
            Field::RepoName => Value::from(repo.name.as_str()),
            Field::Tag => Value::from(build.tag.as_str()),
            Field::Event => Value::from(build.event.as_str()),
            Field::Number => Value::from(build.number),
            Field::Commit => Value::from(build.commit.as_str()),
            Field::ShortCommit => Value::from(build.short_commit()),
            Field::Ref => Value::from(build.git_ref.as_str()),
            Field::Branch => Value::from(build.branch.as_str()),
            Field::AuthorUsername => Value::from(build.author.username.as_str()),
            Field::AuthorName => Value::from(build.author.name.as_str()),
            Field::AuthorEmail => Value::from(build.author.email.as_str()),
            Field::AuthorAvatar => Value::from(build.author.avatar.as_str()),
            Field::Pull => Value::from(build.pull.as_str()),
            Field::Message => Value::from(build.message.raw()),
            Field::MessageTitle => Value::from(build.message.title.as_str()),
            Field::MessageBody => Value::from(build.message.body.as_str()),
            Field::DeployTo => Value::from(build.deploy_to.as_str()),
            Field::Status => Value::from(build.status.as_str()),
            Field::Link => Value::from(build.link.as_str()),
            Field::Started => Value::from(build.started),
            Field::Created => Value::from(build.created),
        }
    }
}

#[derive(Debug)]
struct Snapshot {
    repo: Repo,
    build: Build,
}

impl Snapshot {
    fn ctx(&self) -> RenderContext<'_> {
        RenderContext::new(&self.repo, &self.build)
    }
}

/// A node of the field tree, e.g. `build` or `build.message`.
///
/// A path that is a field and also has children (`build.message`,
/// `build.author`) renders as the field value.
#[derive(Debug)]
struct Scope {
    data: Arc<Snapshot>,
    path: &'static str,
}

impl Scope {
    fn own_value(&self) -> Option<Value> {
        Field::lookup(self.path).map(|field| field.resolve(&self.data.ctx()))
    }
}

impl Object for Scope {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let key = key.as_str()?;
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        };

        if let Some(prefix) = Field::scope(&path) {
            return Some(Value::from_object(Scope {
                data: Arc::clone(&self.data),
                path: prefix,
            }));
        }

        Field::lookup(&path).map(|field| field.resolve(&self.data.ctx()))
    }

    fn is_true(self: &Arc<Self>) -> bool {
        self.own_value().map_or(true, |value| value.is_true())
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.own_value() {
            Some(value) => write!(f, "{}", value),
            None => Ok(()),
        }
    }
}
