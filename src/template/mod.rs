//! Template rendering
//!
//! Provides:
//! - Jinja-style `{{ path }}` syntax over build metadata
//! - Filters (`truncate`, `datetime`, ...) and status tests
//!   (`is success`, `is failure`)
//! - Typed errors for syntax problems and undefined fields
//!
//! Rendering never escapes or trims: the output is fed straight into a chat
//! payload, sometimes as JSON text.

mod error;
mod fields;
mod helpers;

pub use error::{TemplateError, TemplateResult};
pub use fields::{Field, RenderContext};
pub use helpers::{filters, tests};

use minijinja::{AutoEscape, Environment, UndefinedBehavior};

const NAME: &str = "notification";

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);
    helpers::register(&mut env);
    env
}

/// A parsed template, ready to render any number of times
#[derive(Debug, Clone)]
pub struct Template {
    env: Environment<'static>,
}

impl Template {
    /// Compile `text` and check every referenced path against the field table
    pub fn parse(text: &str) -> TemplateResult<Self> {
        let mut env = environment();
        env.add_template_owned(NAME, text.to_string())?;

        let mut paths: Vec<String> = env
            .get_template(NAME)?
            .undeclared_variables(true)
            .into_iter()
            .collect();
        paths.sort();

        if let Some(path) = paths.into_iter().find(|p| Field::lookup(p).is_none()) {
            return Err(TemplateError::UndefinedField { path });
        }

        Ok(Self { env })
    }

    pub fn render(&self, ctx: &RenderContext<'_>) -> TemplateResult<String> {
        let out = self.env.get_template(NAME)?.render(ctx.to_value())?;
        Ok(out)
    }
}

/// Parse and render in one step
pub fn render(text: &str, ctx: &RenderContext<'_>) -> TemplateResult<String> {
    Template::parse(text)?.render(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Build;
    use crate::testing::{test_build, test_config, test_repo};

    fn render_test(text: &str) -> TemplateResult<String> {
        let repo = test_repo();
        let build = test_build();
        render(text, &RenderContext::new(&repo, &build))
    }

    #[test]
    fn test_message_parts() {
        let out =
            render_test("{{build.message}}\n{{build.message.title}}\n{{build.message.body}}")
                .unwrap();
        assert_eq!(out, "Initial commit\n\nMessage body\nInitial commit\nMessage body");
    }

    #[test]
    fn test_template_message() {
        let out = render_test(&test_config().template).unwrap();
        assert_eq!(
            out,
            "Message Template:\nInitial commit\n\nMessage body\nInitial commit\nMessage body"
        );
    }

    #[test]
    fn test_template_fallback() {
        let out = render_test(&test_config().fallback).unwrap();
        assert_eq!(out, "Message Template Fallback:\nInitial commit\nmaster\nsuccess");
    }

    #[test]
    fn test_template_fields() {
        let out = render_test(&test_config().fields_template).unwrap();
        assert_eq!(out, r#"[{"title": "success", "short": true, "value": "master"}]"#);

        let fields: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(fields[0]["title"], "success");
        assert_eq!(fields[0]["short"], true);
        assert_eq!(fields[0]["value"], "master");
    }

    #[test]
    fn test_short_commit_matches_truncate() {
        let out = render_test("{{build.shortCommit}} {{ build.commit|truncate(8) }}").unwrap();
        assert_eq!(out, "7fd1a60b 7fd1a60b");
    }

    #[test]
    fn test_author_alias() {
        let out = render_test("{{build.author}} {{build.author.username}} {{build.author.name}}")
            .unwrap();
        assert_eq!(out, "octocat octocat The Octocat");
    }

    #[test]
    fn test_no_escaping_or_trimming() {
        let repo = test_repo();
        let build = Build {
            branch: "<b>&\"x\"</b>".to_string(),
            ..test_build()
        };
        let out = render("  {{build.branch}}\n", &RenderContext::new(&repo, &build)).unwrap();
        assert_eq!(out, "  <b>&\"x\"</b>\n");
    }

    #[test]
    fn test_large_build_number() {
        let repo = test_repo();
        let build = Build {
            number: u64::MAX,
            ..test_build()
        };
        let out = render("#{{build.number}}", &RenderContext::new(&repo, &build)).unwrap();
        assert_eq!(out, "#18446744073709551615");
    }

    #[test]
    fn test_status_blocks() {
        let text = "{% if build.status is success %}ok{% else %}bad{% endif %}";
        assert_eq!(render_test(text).unwrap(), "ok");

        let repo = test_repo();
        let build = Build {
            status: "failure".to_string(),
            ..test_build()
        };
        let ctx = RenderContext::new(&repo, &build);
        assert_eq!(render(text, &ctx).unwrap(), "bad");
        assert_eq!(
            render(
                "{% if build.status is failure %}broken by {{build.author}}{% endif %}",
                &ctx
            )
            .unwrap(),
            "broken by octocat"
        );
        assert_eq!(
            render(
                "{% if not build.pull %}no PR{% endif %}{% if build.tag %} {{build.tag}}{% endif %}",
                &ctx
            )
            .unwrap(),
            "no PR 1.0.0"
        );
    }

    #[test]
    fn test_filters_in_template() {
        let out = render_test(
            r#"{{ build.status|uppercasefirst }} #{{build.number}} at {{ build.started|datetime("%Y-%m-%d") }}"#,
        )
        .unwrap();
        assert_eq!(out, "Success #1 at 2019-01-01");
    }

    #[test]
    fn test_undefined_field_fails_without_output() {
        let err = render_test("before {{build.unknown}} after").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedField {
                path: "build.unknown".to_string()
            }
        );
    }

    #[test]
    fn test_undefined_field_inside_block() {
        let err = Template::parse("{% if build.status is success %}{{repo.url}}{% endif %}")
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedField {
                path: "repo.url".to_string()
            }
        );
    }

    #[test]
    fn test_scope_is_not_a_field() {
        assert!(matches!(
            render_test("{{build}}").unwrap_err(),
            TemplateError::UndefinedField { .. }
        ));
    }

    #[test]
    fn test_unknown_filter() {
        assert!(matches!(
            render_test("{{ build.status|since }}").unwrap_err(),
            TemplateError::UnknownHelper { .. }
        ));
    }

    #[test]
    fn test_render_time_type_error() {
        let err = render_test("{{ build.branch|duration(build.created) }}").unwrap_err();
        assert!(matches!(err, TemplateError::HelperArgs { .. }));
    }

    #[test]
    fn test_malformed_template() {
        assert!(matches!(
            render_test("{{build.status").unwrap_err(),
            TemplateError::Parse { .. }
        ));
        assert!(matches!(
            render_test("{% if build.tag %}unclosed").unwrap_err(),
            TemplateError::Parse { .. }
        ));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let template = Template::parse(&test_config().template).unwrap();
        let repo = test_repo();
        let build = test_build();
        let ctx = RenderContext::new(&repo, &build);

        assert_eq!(template.render(&ctx).unwrap(), template.render(&ctx).unwrap());
    }

    #[test]
    fn test_parallel_renders() {
        let template = Template::parse("{{repo.owner}}/{{repo.name}}@{{build.shortCommit}}").unwrap();
        let repo = test_repo();
        let build = test_build();
        let ctx = RenderContext::new(&repo, &build);

        let outputs: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| template.render(&ctx))).collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap())
                .collect()
        });

        assert!(outputs.iter().all(|o| o == "octocat/hello-world@7fd1a60b"));
    }
}
