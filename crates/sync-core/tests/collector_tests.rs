//! Tests for the local file collector

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use sync_core::{DEFAULT_MAX_DEPTH, Error, list_files};
use sync_fs::NormalizedPath;
use sync_test_utils::TestUserDir;

fn default_extensions() -> Vec<String> {
    vec!["json".into(), "code-snippets".into()]
}

fn keys(dir: &TestUserDir, max_depth: usize, allowed: &[String]) -> Vec<String> {
    list_files(&NormalizedPath::new(dir.root()), 0, max_depth, allowed)
        .unwrap()
        .into_iter()
        .map(|f| f.remote_key)
        .collect()
}

#[test]
fn flattens_nested_files_into_pipe_keys() {
    let dir = TestUserDir::new();
    dir.write("settings.json", "{}");
    dir.write("keybindings.json", "[]");
    dir.write("a/b.json", "{}");
    dir.write("snippets/go.code-snippets", "{}");

    let mut collected = keys(&dir, DEFAULT_MAX_DEPTH, &default_extensions());
    collected.sort();

    assert_eq!(
        collected,
        vec!["a|b.json", "keybindings.json", "settings.json", "snippets|go.code-snippets"]
    );
}

#[test]
fn records_carry_name_content_and_source() {
    let dir = TestUserDir::new();
    dir.write("snippets/rust.json", "{\"fn\": {}}");

    let files = list_files(&NormalizedPath::new(dir.root()), 0, 2, &default_extensions()).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].display_name, "rust.json");
    assert_eq!(files[0].content, "{\"fn\": {}}");
    assert_eq!(
        files[0].source_path,
        Some(NormalizedPath::new(dir.root().join("snippets/rust.json")))
    );
}

#[rstest]
#[case("notes.txt", false)]
#[case("SETTINGS.JSON", true)]
#[case("README", false)]
#[case(".htmlhintrc", false)]
fn filters_by_extension(#[case] name: &str, #[case] included: bool) {
    let dir = TestUserDir::new();
    dir.write(name, "x");
    assert_eq!(!keys(&dir, 2, &default_extensions()).is_empty(), included);
}

#[test]
fn empty_extension_allows_extensionless_and_dotfiles() {
    let dir = TestUserDir::new();
    dir.write("README", "x");
    dir.write(".htmlhintrc", "x");

    let mut collected = keys(&dir, 2, &["".to_string()]);
    collected.sort();

    assert_eq!(collected, vec![".htmlhintrc", "README"]);
}

#[test]
fn stops_at_max_depth() {
    let dir = TestUserDir::new();
    dir.write("l0.json", "{}");
    dir.write("a/l1.json", "{}");
    dir.write("a/b/l2.json", "{}");
    dir.write("a/b/c/l3.json", "{}");

    let collected = keys(&dir, 2, &default_extensions());

    assert_eq!(collected, vec!["a|b|l2.json", "a|l1.json", "l0.json"]);
}

#[test]
fn missing_root_is_not_found() {
    let dir = TestUserDir::new();
    let missing = NormalizedPath::new(dir.root().join("nope"));

    let err = list_files(&missing, 0, 2, &default_extensions()).unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }), "got: {err:?}");
}

#[test]
fn empty_root_yields_nothing() {
    let dir = TestUserDir::new();
    assert!(keys(&dir, 2, &default_extensions()).is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn collects_exactly_the_levels_within_bound(max_depth in 0usize..5) {
        let dir = TestUserDir::new();
        let mut relative = String::new();
        for level in 0..=4 {
            dir.write(&format!("{relative}f{level}.json"), "{}");
            relative.push_str(&format!("d{level}/"));
        }

        let collected = keys(&dir, max_depth, &default_extensions());

        prop_assert_eq!(collected.len(), max_depth.min(4) + 1);
    }
}
