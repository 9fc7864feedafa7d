//! Shared fixtures for unit tests

use crate::config::NotificationConfig;
use crate::message::CommitMessage;
use crate::model::{Author, Build, Repo};

pub fn test_repo() -> Repo {
    Repo {
        owner: "octocat".to_string(),
        name: "hello-world".to_string(),
    }
}

pub fn test_build() -> Build {
    let author = Author {
        username: "octocat".to_string(),
        name: "The Octocat".to_string(),
        email: "octocat@github.com".to_string(),
        avatar: "https://avatars0.githubusercontent.com/u/583231?s=460&v=4".to_string(),
    };

    Build {
        tag: "1.0.0".to_string(),
        event: "push".to_string(),
        number: 1,
        commit: "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d".to_string(),
        git_ref: String::new(),
        branch: "master".to_string(),
        author,
        pull: String::new(),
        message: CommitMessage::parse("Initial commit\n\nMessage body"),
        deploy_to: String::new(),
        status: "success".to_string(),
        link: "http://github.com/octocat/hello-world".to_string(),
        started: 1546340400, // 2019-01-01 11:00:00 UTC
        created: 1546340400,
    }
}

pub fn test_config() -> NotificationConfig {
    NotificationConfig {
        template: "Message Template:\n{{build.message}}\n{{build.message.title}}\n{{build.message.body}}"
            .to_string(),
        fallback: "Message Template Fallback:\n{{build.message.title}}\n{{build.branch}}\n{{build.status}}"
            .to_string(),
        fields_template: r#"[{"title": "{{build.status}}", "short": true, "value": "{{build.branch}}"}]"#
            .to_string(),
        ..Default::default()
    }
}
