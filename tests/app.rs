use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use camino::Utf8PathBuf;

use fdroid_repo_maint::app::App;
use fdroid_repo_maint::error::MaintError;
use fdroid_repo_maint::index::RepoIndex;
use fdroid_repo_maint::mirror::MirrorClient;
use fdroid_repo_maint::store::RepoStore;

#[derive(Default)]
struct MockMirror {
    calls: Mutex<Vec<String>>,
    failing: BTreeSet<String>,
}

impl MockMirror {
    fn failing(names: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: names.iter().map(|name| name.to_string()).collect(),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl MirrorClient for &MockMirror {
    fn download_package(&self, apk_name: &str, destination: &Path) -> Result<(), MaintError> {
        self.calls.lock().unwrap().push(apk_name.to_string());
        if self.failing.contains(apk_name) {
            // Simulate a transfer that dies partway through the body.
            fs::write(destination, b"partial").unwrap();
            return Err(MaintError::MirrorStatus {
                status: 404,
                message: "not found".to_string(),
            });
        }
        fs::write(destination, format!("apk bytes for {apk_name}")).unwrap();
        Ok(())
    }
}

fn parse_index(json: &str) -> RepoIndex {
    serde_json::from_str(json).unwrap()
}

fn temp_store(temp: &tempfile::TempDir) -> RepoStore {
    let root = Utf8PathBuf::from_path_buf(temp.path().join("fdroid").join("repo")).unwrap();
    RepoStore::new(root)
}

#[test]
fn restore_downloads_missing_packages_in_sorted_order() {
    let temp = tempfile::tempdir().unwrap();
    let store = temp_store(&temp);
    let mirror = MockMirror::default();
    let index = parse_index(
        r#"{
            "apps": [{"packages": [{"apkName": "b.apk"}]}],
            "packages": {"x": [{"apkName": "a.apk"}, {"apkName": "b.apk"}]}
        }"#,
    );

    let result = App::new(store.clone(), &mirror).restore(&index).unwrap();

    assert_eq!(mirror.calls(), vec!["a.apk".to_string(), "b.apk".to_string()]);
    assert!(store.package_exists("a.apk"));
    assert!(store.package_exists("b.apk"));
    assert!(result.items.iter().all(|item| item.action == "download"));
}

#[test]
fn restore_leaves_present_packages_untouched() {
    let temp = tempfile::tempdir().unwrap();
    let store = temp_store(&temp);
    store.ensure_root().unwrap();
    let sentinel_path = store.package_path("b.apk");
    fs::write(sentinel_path.as_std_path(), b"sentinel").unwrap();

    let mirror = MockMirror::default();
    let index = parse_index(
        r#"{"packages": {"x": [{"apkName": "a.apk"}, {"apkName": "b.apk"}]}}"#,
    );

    let result = App::new(store.clone(), &mirror).restore(&index).unwrap();

    assert_eq!(mirror.calls(), vec!["a.apk".to_string()]);
    assert_eq!(fs::read(sentinel_path.as_std_path()).unwrap(), b"sentinel");
    let actions: Vec<_> = result.items.iter().map(|item| item.action.as_str()).collect();
    assert_eq!(actions, vec!["download", "present"]);
}

#[test]
fn restore_continues_after_download_failure() {
    let temp = tempfile::tempdir().unwrap();
    let store = temp_store(&temp);
    let mirror = MockMirror::failing(&["a.apk"]);
    let index = parse_index(
        r#"{"packages": {"x": [{"apkName": "a.apk"}, {"apkName": "b.apk"}]}}"#,
    );

    let result = App::new(store.clone(), &mirror).restore(&index).unwrap();

    assert_eq!(mirror.calls(), vec!["a.apk".to_string(), "b.apk".to_string()]);
    assert!(!store.package_exists("a.apk"));
    assert!(store.package_exists("b.apk"));
    let actions: Vec<_> = result.items.iter().map(|item| item.action.as_str()).collect();
    assert_eq!(actions, vec!["failed", "download"]);
}

#[test]
fn failed_download_leaves_no_partial_file() {
    let temp = tempfile::tempdir().unwrap();
    let store = temp_store(&temp);
    let mirror = MockMirror::failing(&["a.apk"]);
    let index = parse_index(r#"{"packages": {"x": [{"apkName": "a.apk"}]}}"#);

    App::new(store.clone(), &mirror).restore(&index).unwrap();

    let entries: Vec<_> = fs::read_dir(store.root().as_std_path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert!(entries.is_empty(), "unexpected files: {entries:?}");
}

#[test]
fn restore_with_empty_index_creates_directory() {
    let temp = tempfile::tempdir().unwrap();
    let store = temp_store(&temp);
    let mirror = MockMirror::default();
    let index = parse_index(r#"{"apps": [], "packages": {}}"#);

    let result = App::new(store.clone(), &mirror).restore(&index).unwrap();

    assert!(store.root().as_std_path().is_dir());
    assert!(mirror.calls().is_empty());
    assert!(result.items.is_empty());
}

#[test]
fn restore_twice_downloads_each_package_once() {
    let temp = tempfile::tempdir().unwrap();
    let store = temp_store(&temp);
    let mirror = MockMirror::default();
    let index = parse_index(r#"{"packages": {"x": [{"apkName": "a.apk"}]}}"#);

    let app = App::new(store.clone(), &mirror);
    app.restore(&index).unwrap();
    let second = app.restore(&index).unwrap();

    assert_eq!(mirror.calls(), vec!["a.apk".to_string()]);
    assert_eq!(second.items[0].action, "present");
}

#[test]
fn restore_refuses_names_with_path_separators() {
    let temp = tempfile::tempdir().unwrap();
    let store = temp_store(&temp);
    let mirror = MockMirror::default();
    let index = parse_index(r#"{"packages": {"x": [{"apkName": "../escape.apk"}]}}"#);

    let result = App::new(store.clone(), &mirror).restore(&index).unwrap();

    assert!(mirror.calls().is_empty());
    assert_eq!(result.items[0].action, "failed");
    assert!(!temp.path().join("fdroid").join("escape.apk").exists());
}
