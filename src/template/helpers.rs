//! Filters and tests registered on the template environment

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::DateTime;
use minijinja::value::Value;
use minijinja::{Environment, Error, ErrorKind};

use crate::model::{is_failure_status, is_success_status, truncate_chars};

const FILTERS: &[(&str, &str)] = &[
    ("truncate", "{{ build.commit|truncate(8) }}"),
    ("uppercase", "{{ build.status|uppercase }}"),
    ("lowercase", "{{ build.branch|lowercase }}"),
    ("uppercasefirst", "{{ build.status|uppercasefirst }}"),
    ("urlencode", "{{ build.branch|urlencode }}"),
    ("datetime", "{{ build.started|datetime(\"%Y-%m-%d %H:%M\") }}"),
    ("duration", "{{ build.started|duration(build.created) }}"),
];

const TESTS: &[(&str, &str)] = &[
    ("success", "{% if build.status is success %}...{% else %}...{% endif %}"),
    ("failure", "{% if build.status is failure %}...{% endif %}"),
];

/// Filter names with a usage example each
pub fn filters() -> impl Iterator<Item = (&'static str, &'static str)> {
    FILTERS.iter().copied()
}

/// Test names with a usage example each
pub fn tests() -> impl Iterator<Item = (&'static str, &'static str)> {
    TESTS.iter().copied()
}

pub(crate) fn register(env: &mut Environment<'_>) {
    env.add_filter("truncate", truncate);
    env.add_filter("uppercase", |value: Value| value.to_string().to_uppercase());
    env.add_filter("lowercase", |value: Value| value.to_string().to_lowercase());
    env.add_filter("uppercasefirst", |value: Value| uppercase_first(&value.to_string()));
    env.add_filter("urlencode", |value: Value| {
        urlencoding::encode(&value.to_string()).into_owned()
    });
    env.add_filter("datetime", datetime);
    env.add_filter("duration", |start: Value, end: Value| -> Result<String, Error> {
        let (start, end) = (timestamp("duration", &start)?, timestamp("duration", &end)?);
        Ok(format_duration(end.saturating_sub(start)))
    });

    env.add_test("success", |value: Value| is_success_status(&value.to_string()));
    env.add_test("failure", |value: Value| is_failure_status(&value.to_string()));
}

fn truncate(value: Value, len: i64) -> Result<String, Error> {
    let len = usize::try_from(len).map_err(|_| {
        Error::new(ErrorKind::InvalidOperation, "truncate length must not be negative")
    })?;
    Ok(truncate_chars(&value.to_string(), len))
}

fn datetime(ts: Value, layout: &str) -> Result<String, Error> {
    format_datetime(timestamp("datetime", &ts)?, layout)
}

fn timestamp(filter: &str, value: &Value) -> Result<i64, Error> {
    i64::try_from(value.clone()).map_err(|_| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("{}: expected integer, got {}", filter, value.kind()),
        )
    })
}

fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format a Unix timestamp in UTC with a strftime layout
fn format_datetime(ts: i64, layout: &str) -> Result<String, Error> {
    let items: Vec<Item<'_>> = StrftimeItems::new(layout).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("datetime: invalid format string {:?}", layout),
        ));
    }

    let dt = DateTime::from_timestamp(ts, 0).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("datetime: timestamp {} out of range", ts),
        )
    })?;

    let mut out = String::new();
    write!(out, "{}", dt.format_with_items(items.into_iter())).map_err(|_| {
        Error::new(ErrorKind::InvalidOperation, "datetime: failed to format timestamp")
    })?;
    Ok(out)
}

/// Render elapsed seconds as `1h2m3s`, `4m5s` or `6s`
fn format_duration(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);

    if h > 0 {
        format!("{}{}h{}m{}s", sign, h, m, s)
    } else if m > 0 {
        format!("{}{}m{}s", sign, m, s)
    } else {
        format!("{}{}s", sign, s)
    }
}
