use proptest::prelude::*;
use sync_fs::NormalizedPath;

proptest! {
    #[test]
    fn test_normalization_has_no_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));

        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn test_remote_key_roundtrip(segments in prop::collection::vec("[a-zA-Z0-9_-]{1,8}(\\.json)?", 1..4)) {
        let root = NormalizedPath::new("/cfg/User");
        let path = root.join(&segments.join("/"));

        let key = path.remote_key(&root).unwrap();
        prop_assert_eq!(key.split('|').count(), segments.len());

        let rebuilt = NormalizedPath::from_remote_key(&root, &key).unwrap();
        prop_assert_eq!(rebuilt, path);
    }
}
