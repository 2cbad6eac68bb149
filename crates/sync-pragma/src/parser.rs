//! Parsing of `@sync` annotations and setting lines.

use std::sync::LazyLock;

use regex::Regex;
use sync_fs::OsType;

use crate::{Error, Result};

static PRAGMA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*//\s*@sync(?:\s+(.*))?\s*$").expect("Invalid pragma regex")
});

static SETTING_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?://\s*)?"([^"]+)"\s*:"#).expect("Invalid setting key regex")
});

static COMMENTED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)//\s?(.*)$").expect("Invalid comment regex"));

/// Conditions under which the annotated setting is active.
///
/// Every condition that is present must hold. An annotation with no `os`
/// list applies to all operating systems.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pragma {
    pub os: Vec<OsType>,
    pub host: Option<String>,
    pub env: Option<String>,
}

impl Pragma {
    /// Check the conditions against a machine description.
    ///
    /// `env_is_set` reports whether an environment variable is defined.
    pub fn matches(&self, os: OsType, host: Option<&str>, env_is_set: impl Fn(&str) -> bool) -> bool {
        let os_ok = self.os.is_empty() || self.os.contains(&os);
        let host_ok = match (&self.host, host) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual.trim()),
            (Some(_), None) => false,
        };
        let env_ok = self.env.as_deref().is_none_or(&env_is_set);
        os_ok && host_ok && env_ok
    }
}

/// Parse an annotation line.
///
/// Returns `None` when the line is not an annotation at all, and an error
/// when it is one but its conditions cannot be understood. `line` is the
/// 1-based line number used in error messages.
pub fn parse_pragma(text: &str, line: usize) -> Option<Result<Pragma>> {
    let caps = PRAGMA_REGEX.captures(text)?;
    let args = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    Some(parse_conditions(args, line))
}

fn parse_conditions(args: &str, line: usize) -> Result<Pragma> {
    let invalid = |message: String| Error::InvalidPragma { line, message };
    let mut pragma = Pragma::default();
    let mut seen_any = false;

    for token in args.split_whitespace() {
        let token = token.trim_end_matches(',');
        if token.is_empty() {
            continue;
        }
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| invalid(format!("expected key=value, found '{token}'")))?;
        if value.is_empty() {
            return Err(invalid(format!("empty value for '{key}'")));
        }

        match key.to_lowercase().as_str() {
            "os" => {
                for name in value.split(',').filter(|v| !v.is_empty()) {
                    let os = name.parse::<OsType>().map_err(invalid)?;
                    if !pragma.os.contains(&os) {
                        pragma.os.push(os);
                    }
                }
            }
            "host" => pragma.host = Some(value.to_string()),
            "env" => pragma.env = Some(value.to_string()),
            other => return Err(invalid(format!("unknown condition '{other}'"))),
        }
        seen_any = true;
    }

    if !seen_any {
        return Err(invalid("annotation has no conditions".to_string()));
    }
    Ok(pragma)
}

/// Extract the JSON key of a setting line, commented or not.
pub fn setting_key(text: &str) -> Option<&str> {
    SETTING_KEY_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// True when the line is a `//` comment (but not an annotation).
pub(crate) fn is_commented(text: &str) -> bool {
    COMMENTED_REGEX.is_match(text) && !PRAGMA_REGEX.is_match(text)
}

/// Remove one level of `//` comment, keeping indentation.
pub(crate) fn uncomment(text: &str) -> String {
    if !is_commented(text) {
        return text.to_string();
    }
    match COMMENTED_REGEX.captures(text) {
        Some(caps) => format!("{}{}", &caps[1], &caps[2]),
        None => text.to_string(),
    }
}

/// Comment a line out, keeping indentation. Already commented lines are kept.
pub(crate) fn comment(text: &str) -> String {
    if is_commented(text) {
        return text.to_string();
    }
    let indent_len = text.len() - text.trim_start().len();
    format!("{}// {}", &text[..indent_len], &text[indent_len..])
}
