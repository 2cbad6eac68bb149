use pretty_assertions::assert_eq;
use rstest::rstest;
use sync_fs::NormalizedPath;

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("foo\\bar\\baz");
    assert_eq!(path.as_str(), "foo/bar/baz");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("foo/bar");
    assert_eq!(base.join("baz").as_str(), "foo/bar/baz");
    assert_eq!(NormalizedPath::new("foo/").join("baz").as_str(), "foo/baz");
}

#[test]
fn test_parent_and_file_name() {
    let path = NormalizedPath::new("foo/bar/baz.txt");
    assert_eq!(path.parent().unwrap().as_str(), "foo/bar");
    assert_eq!(path.file_name(), Some("baz.txt"));
}

#[rstest]
#[case("User/settings.json", Some("json"))]
#[case("User/snippets/go.code-snippets", Some("code-snippets"))]
#[case("home/.htmlhintrc", None)]
#[case("home/Makefile", None)]
fn test_extension(#[case] input: &str, #[case] expected: Option<&str>) {
    assert_eq!(NormalizedPath::new(input).extension(), expected);
}

#[rstest]
#[case("/home/u/.config/Code/User/settings.json", "settings.json")]
#[case("/home/u/.config/Code/User/snippets/go.json", "snippets|go.json")]
#[case("/home/u/.config/Code/User/a/b/c.json", "a|b|c.json")]
fn test_remote_key_flattens_nested_paths(#[case] input: &str, #[case] expected: &str) {
    let root = NormalizedPath::new("/home/u/.config/Code/User");
    let key = NormalizedPath::new(input).remote_key(&root).unwrap();
    assert_eq!(key, expected);
}

#[test]
fn test_remote_key_outside_root_is_none() {
    let root = NormalizedPath::new("/home/u/.config/Code/User");
    assert_eq!(NormalizedPath::new("/home/u/.myrc").remote_key(&root), None);
    // A sibling sharing the prefix is not inside the root
    assert_eq!(
        NormalizedPath::new("/home/u/.config/Code/UserData/x.json").remote_key(&root),
        None
    );
}

#[test]
fn test_from_remote_key_rebuilds_nested_path() {
    let root = NormalizedPath::new("/root/User");
    let path = NormalizedPath::from_remote_key(&root, "a|b.json").unwrap();
    assert_eq!(path.as_str(), "/root/User/a/b.json");
}

#[rstest]
#[case("..|etc|passwd")]
#[case("a||b.json")]
#[case(".|x.json")]
#[case("a/b.json")]
fn test_from_remote_key_rejects_escaping_keys(#[case] key: &str) {
    let root = NormalizedPath::new("/root/User");
    assert_eq!(NormalizedPath::from_remote_key(&root, key), None);
}

#[test]
fn test_exists_false_for_nonexistent() {
    let path = NormalizedPath::new("/nonexistent/path/that/does/not/exist");
    assert!(!path.exists());
}
