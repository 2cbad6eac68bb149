//! Upload and download rewrites of the primary settings file.

use std::collections::HashSet;

use sync_fs::OsType;
use tracing::{debug, warn};

use crate::Result;
use crate::parser::{Pragma, comment, parse_pragma, setting_key, uncomment};

/// An annotation together with the line it guards (both 0-based).
#[derive(Debug)]
struct Guard {
    pragma_line: usize,
    target_line: usize,
    pragma: Pragma,
}

/// Locate annotated settings. Malformed annotations are an error when
/// `strict`, otherwise they are logged and ignored.
fn collect_guards(lines: &[&str], strict: bool) -> Result<Vec<Guard>> {
    let mut guards = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        let Some(parsed) = parse_pragma(lines[idx], idx + 1) else {
            idx += 1;
            continue;
        };
        let pragma = match parsed {
            Ok(pragma) => pragma,
            Err(e) if strict => return Err(e),
            Err(e) => {
                warn!(error = %e, "ignoring malformed annotation");
                idx += 1;
                continue;
            }
        };

        let target = (idx + 1..lines.len()).find(|&j| !lines[j].trim().is_empty());
        match target {
            Some(j) if parse_pragma(lines[j], j + 1).is_none() => {
                guards.push(Guard {
                    pragma_line: idx,
                    target_line: j,
                    pragma,
                });
                idx = j + 1;
            }
            _ => idx += 1,
        }
    }

    Ok(guards)
}

/// Neutralize the settings file for upload.
///
/// Every annotated setting is uncommented so the remote copy does not depend
/// on the machine it came from. Annotations are kept.
pub fn before_upload(content: &str) -> Result<String> {
    let lines: Vec<&str> = content.split('\n').collect();
    let guards = collect_guards(&lines, true)?;

    let mut out: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    for guard in &guards {
        out[guard.target_line] = uncomment(lines[guard.target_line]);
    }
    debug!(annotated = guards.len(), "prepared settings for upload");
    Ok(out.join("\n"))
}

/// Adapt downloaded settings to this machine, consulting the process
/// environment for `env=` conditions.
pub fn before_write(
    existing_local: Option<&str>,
    incoming: &str,
    os: OsType,
    host: Option<&str>,
) -> String {
    before_write_with_env(existing_local, incoming, os, host, |name| {
        std::env::var_os(name).is_some()
    })
}

/// Same as [`before_write`] with an explicit environment lookup.
///
/// Annotated settings in `incoming` are switched on or off for this machine.
/// Annotated settings that exist only in `existing_local` are carried over,
/// inserted before the closing brace of the top-level object.
pub fn before_write_with_env(
    existing_local: Option<&str>,
    incoming: &str,
    os: OsType,
    host: Option<&str>,
    env_is_set: impl Fn(&str) -> bool,
) -> String {
    let incoming_lines: Vec<&str> = incoming.split('\n').collect();
    // Lenient mode never fails
    let guards = collect_guards(&incoming_lines, false).unwrap_or_default();

    let mut out: Vec<String> = incoming_lines.iter().map(|l| l.to_string()).collect();
    for guard in &guards {
        let line = incoming_lines[guard.target_line];
        out[guard.target_line] = if guard.pragma.matches(os, host, &env_is_set) {
            uncomment(line)
        } else {
            comment(line)
        };
    }

    if let Some(local) = existing_local {
        let incoming_keys: HashSet<&str> = incoming_lines.iter().filter_map(|l| setting_key(l)).collect();
        let local_lines: Vec<&str> = local.split('\n').collect();
        let local_guards = collect_guards(&local_lines, false).unwrap_or_default();

        let mut carried = Vec::new();
        for guard in &local_guards {
            let target = local_lines[guard.target_line];
            let Some(key) = setting_key(target) else {
                continue;
            };
            if incoming_keys.contains(key) {
                continue;
            }
            debug!(key, "keeping local-only annotated setting");
            carried.push(local_lines[guard.pragma_line].to_string());
            carried.push(if guard.pragma.matches(os, host, &env_is_set) {
                uncomment(target)
            } else {
                comment(target)
            });
        }

        if !carried.is_empty() {
            insert_before_closing_brace(&mut out, carried);
        }
    }

    out.join("\n")
}

fn insert_before_closing_brace(lines: &mut Vec<String>, carried: Vec<String>) {
    let Some(close) = lines.iter().rposition(|l| l.trim_start().starts_with('}')) else {
        lines.extend(carried);
        return;
    };

    // The entry before the insertion point needs a separator
    let previous = (0..close).rev().find(|&i| {
        let trimmed = lines[i].trim();
        !trimmed.is_empty() && !trimmed.starts_with("//")
    });
    if let Some(i) = previous {
        let trimmed = lines[i].trim_end();
        if !trimmed.ends_with(',') && !trimmed.ends_with('{') {
            lines[i] = format!("{trimmed},");
        }
    }

    lines.splice(close..close, carried);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    const LOCAL: &str = r#"{
    "editor.tabSize": 4,
    // @sync host=laptop
    "window.zoomLevel": 2,
    // @sync os=mac
    // "terminal.integrated.shell.osx": "/bin/zsh"
}"#;

    #[test]
    fn upload_uncomments_annotated_settings() {
        let out = before_upload(LOCAL).unwrap();
        assert!(out.contains("\n    \"terminal.integrated.shell.osx\": \"/bin/zsh\"\n"));
        assert!(out.contains("// @sync os=mac"));
        assert!(out.contains("\"editor.tabSize\": 4,"));
    }

    #[test]
    fn upload_rejects_malformed_annotation() {
        let content = "{\n  // @sync planet=mars\n  \"a\": 1\n}";
        assert!(matches!(
            before_upload(content),
            Err(Error::InvalidPragma { line: 2, .. })
        ));
    }

    #[test]
    fn unannotated_content_is_unchanged() {
        let content = "{\n  // plain note\n  \"a\": 1\n}\n";
        assert_eq!(before_upload(content).unwrap(), content);
        assert_eq!(
            before_write_with_env(None, content, OsType::Linux, None, |_| false),
            content
        );
    }

    #[test]
    fn write_comments_out_non_matching_settings() {
        let incoming = before_upload(LOCAL).unwrap();
        let out = before_write_with_env(None, &incoming, OsType::Linux, Some("laptop"), |_| false);

        assert!(out.contains("\n    \"window.zoomLevel\": 2,\n"));
        assert!(out.contains("\n    // \"terminal.integrated.shell.osx\": \"/bin/zsh\"\n"));
    }

    #[test]
    fn write_enables_matching_settings() {
        let incoming = before_upload(LOCAL).unwrap();
        let out = before_write_with_env(None, &incoming, OsType::Mac, Some("desktop"), |_| false);

        assert!(out.contains("// \"window.zoomLevel\": 2,"));
        assert!(out.contains("\n    \"terminal.integrated.shell.osx\": \"/bin/zsh\"\n"));
    }

    #[test]
    fn write_keeps_local_only_annotated_settings() {
        let incoming = "{\n    \"editor.tabSize\": 2\n}";
        let out = before_write_with_env(Some(LOCAL), incoming, OsType::Linux, Some("laptop"), |_| false);

        let expected = r#"{
    "editor.tabSize": 2,
    // @sync host=laptop
    "window.zoomLevel": 2,
    // @sync os=mac
    // "terminal.integrated.shell.osx": "/bin/zsh"
}"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn write_prefers_incoming_value_for_shared_keys() {
        let incoming = "{\n    // @sync host=laptop\n    \"window.zoomLevel\": 5\n}";
        let out = before_write_with_env(Some(LOCAL), incoming, OsType::Linux, Some("laptop"), |_| false);

        assert!(out.contains("\"window.zoomLevel\": 5"));
        assert!(!out.contains("\"window.zoomLevel\": 2"));
    }
}
