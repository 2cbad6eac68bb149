//! [`TestUserDir`] builder for reconciler test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use sync_core::{CustomSettings, Environment, SyncContext};
use sync_fs::OsType;
use tempfile::TempDir;

/// A temporary editor layout: a `User` folder, an extensions folder and a
/// scratch area for out-of-tree custom files.
///
/// # Example
///
/// ```rust,no_run
/// use sync_test_utils::TestUserDir;
///
/// let dir = TestUserDir::new();
/// dir.write("settings.json", "{}");
/// dir.write_descriptor(&Default::default());
/// dir.assert_file_contains("settings.json", "{}");
/// ```
pub struct TestUserDir {
    temp_dir: TempDir,
}

impl Default for TestUserDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestUserDir {
    /// Create the layout with an empty `User` folder.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("User")).unwrap();
        fs::create_dir_all(temp_dir.path().join("extensions")).unwrap();
        Self { temp_dir }
    }

    /// The configuration root.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("User")
    }

    pub fn extensions_dir(&self) -> PathBuf {
        self.temp_dir.path().join("extensions")
    }

    /// A path outside the configuration root, for custom file mappings.
    pub fn outside(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join("home").join(relative)
    }

    /// Write `content` to `relative` under the root, creating parents.
    pub fn write(&self, relative: &str, content: &str) {
        write_file(&self.root().join(relative), content);
    }

    /// Write `content` to `relative` outside the root and return its path.
    pub fn write_outside(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.outside(relative);
        write_file(&path, content);
        path
    }

    /// Write the sync descriptor into the root.
    pub fn write_descriptor(&self, settings: &CustomSettings) {
        settings.save(&self.env(OsType::current())).unwrap();
    }

    /// Read `relative` under the root.
    pub fn read(&self, relative: &str) -> String {
        let path = self.root().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.root().join(relative).exists()
    }

    /// Environment pointing at this layout for the given OS.
    pub fn env(&self, os: OsType) -> Environment {
        Environment::new(self.root(), self.extensions_dir(), os)
    }

    /// Context with no known identity.
    pub fn context(&self, os: OsType) -> SyncContext {
        SyncContext::new(self.env(os))
    }

    /// Assert that `relative` under the root does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, relative: &str) {
        let full_path = self.root().join(relative);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `relative` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, relative: &str, content: &str) {
        let file_content = self.read(relative);
        assert!(
            file_content.contains(content),
            "File {} does not contain '{}'. Content:\n{}",
            relative,
            content,
            file_content
        );
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
