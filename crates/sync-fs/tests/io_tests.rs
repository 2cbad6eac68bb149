use std::fs;

use sync_fs::{NormalizedPath, io};
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("a/b/test.txt"));

    io::write_atomic(&path, b"hello world").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "original").unwrap();

    io::write_atomic(&NormalizedPath::new(&file_path), b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("test.txt"));

    io::write_text(&path, "content").unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["test.txt".to_string()]);
}

#[test]
fn test_read_text_nonexistent_is_not_found() {
    let path = NormalizedPath::new("/nonexistent/file.txt");
    let err = io::read_text(&path).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_read_text_if_exists() {
    let temp = TempDir::new().unwrap();
    let missing = NormalizedPath::new(temp.path().join("missing.json"));
    assert_eq!(io::read_text_if_exists(&missing).unwrap(), None);

    fs::write(temp.path().join("present.json"), "{}").unwrap();
    let present = NormalizedPath::new(temp.path().join("present.json"));
    assert_eq!(io::read_text_if_exists(&present).unwrap().as_deref(), Some("{}"));
}

#[test]
fn test_read_dir_sorted() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("b.json"), "").unwrap();
    fs::write(temp.path().join("a.json"), "").unwrap();
    fs::create_dir(temp.path().join("c")).unwrap();

    let entries = io::read_dir_sorted(&NormalizedPath::new(temp.path())).unwrap();
    let names: Vec<_> = entries.iter().filter_map(|p| p.file_name()).collect();
    assert_eq!(names, vec!["a.json", "b.json", "c"]);
}

#[test]
fn test_read_dir_missing_is_not_found() {
    let err = io::read_dir_sorted(&NormalizedPath::new("/nonexistent/dir")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_canonical_dir_resolves_dot_segments() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("a/b")).unwrap();

    let dotted = NormalizedPath::new(temp.path().join("a/b/.."));
    let canonical = io::canonical_dir(&dotted).unwrap();

    assert!(!canonical.as_str().contains(".."), "got {canonical}");
    assert_eq!(canonical.file_name(), Some("a"));
}

#[test]
fn test_canonical_dir_missing_is_not_found() {
    let err = io::canonical_dir(&NormalizedPath::new("/nonexistent/dir")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_write_atomic_failure_cleans_up_temp_file() {
    let temp = TempDir::new().unwrap();
    // Renaming a file over a directory fails
    fs::create_dir(temp.path().join("target")).unwrap();

    let result = io::write_atomic(&NormalizedPath::new(temp.path().join("target")), b"data");

    assert!(result.is_err());
    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["target".to_string()]);
}

#[test]
fn test_concurrent_writes_to_one_target() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("settings.json"));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let path = path.clone();
            std::thread::spawn(move || io::write_text(&path, &format!("writer {i}")))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert!(content.starts_with("writer "), "got {content}");
    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["settings.json".to_string()]);
}
