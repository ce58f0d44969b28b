use super::*;
use crate::model::{MergeState, sample_pull};

fn settings() -> ScanSettings {
    ScanSettings {
        repos: vec!["acme/widgets".to_string()],
        title: "Widgets".to_string(),
    }
}

fn populated_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::new(settings());

    let mut a = sample_pull(1, "alice", &["lib/a.py", "docs/a.rst"]);
    a.labels = vec!["bug".to_string()];
    a.merge_commit = true;
    let mut b = sample_pull(2, "bob", &["lib/a.py"]);
    b.mergeable = Some(false);
    b.commit_authors.insert("carol@example.com".to_string());
    let mut c = sample_pull(3, "bob", &["setup.py"]);
    c.merge_state = MergeState::Unstable;

    for pr in [a, b, c] {
        snapshot.index.insert(&pr);
        snapshot.pulls.insert(pr.url.clone(), pr);
    }
    snapshot.complete = true;
    snapshot
}

#[test]
fn file_name_from_repository_list() {
    let repos = vec!["ansible/ansible".to_string(), "ansible/awx".to_string()];
    assert_eq!(cache_file_name(&repos), "ansible_ansible+ansible_awx.json");
    assert_ne!(
        cache_file_name(&repos[..1]),
        cache_file_name(&repos),
        "distinct sets must not collide"
    );
}

#[test]
fn hyphenated_names_do_not_collide() {
    let names = |repos: &[&str]| -> Vec<String> { repos.iter().map(|r| r.to_string()).collect() };
    assert_ne!(
        cache_file_name(&names(&["a/b", "c-x/d"])),
        cache_file_name(&names(&["a/b-c", "x/d"]))
    );
    assert_ne!(
        cache_file_name(&names(&["a/b-c"])),
        cache_file_name(&names(&["a/b", "c"]))
    );
}

#[test]
fn for_repos_creates_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("nested").join("data");
    let store = CacheStore::for_repos(&data, &settings().repos).unwrap();
    assert!(data.is_dir());
    assert_eq!(store.path(), data.join("acme_widgets.json"));
}

#[test]
fn load_without_file_is_cache_miss() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::for_repos(dir.path(), &settings().repos).unwrap();
    match store.load() {
        Err(TriageError::CacheMiss(path)) => assert_eq!(path, store.path()),
        other => panic!("expected cache miss, got {other:?}"),
    }
}

#[test]
fn round_trip_preserves_every_index_family() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::for_repos(dir.path(), &settings().repos).unwrap();
    let snapshot = populated_snapshot();

    store.save(&snapshot).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.index.files, snapshot.index.files);
    assert_eq!(loaded.index.dirs, snapshot.index.dirs);
    assert_eq!(loaded.index.merges, snapshot.index.merges);
    assert_eq!(loaded.index.conflicts, snapshot.index.conflicts);
    assert_eq!(loaded.index.ci_failures, snapshot.index.ci_failures);
    assert_eq!(loaded.index.multi_author, snapshot.index.multi_author);
    assert_eq!(loaded.index.labels, snapshot.index.labels);
    assert_eq!(loaded.index.ranked_users(), snapshot.index.ranked_users());
}

#[test]
fn save_replaces_wholesale_and_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::for_repos(dir.path(), &settings().repos).unwrap();

    let mut partial = Snapshot::new(settings());
    let pr = sample_pull(9, "zed", &["x.py"]);
    partial.index.insert(&pr);
    partial.pulls.insert(pr.url.clone(), pr);
    store.save(&partial).unwrap();

    let full = populated_snapshot();
    store.save(&full).unwrap();

    let loaded = store.load().unwrap();
    assert!(loaded.complete);
    assert_eq!(loaded.pulls.len(), 3);
    assert!(!loaded.index.users.contains_key("zed"));

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "only the cache file should remain");
}

#[test]
fn failed_write_keeps_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::for_repos(dir.path(), &settings().repos).unwrap();
    let snapshot = populated_snapshot();
    store.save(&snapshot).unwrap();

    let err = write_atomic(store.path(), |writer| {
        writer.write_all(b"{\"version\":1,\"settings\":")?;
        Err(TriageError::Cache("serializer gave up".to_string()))
    })
    .unwrap_err();
    assert!(matches!(err, TriageError::Cache(_)));

    assert_eq!(store.load().unwrap(), snapshot);
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "temp file should be cleaned up");
}

#[test]
fn save_onto_a_directory_fails_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::for_repos(dir.path(), &settings().repos).unwrap();
    fs::create_dir(store.path()).unwrap();

    assert!(store.save(&populated_snapshot()).is_err());
    assert!(store.path().is_dir());
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn corrupt_file_is_cache_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::for_repos(dir.path(), &settings().repos).unwrap();
    fs::write(store.path(), b"{ not json").unwrap();
    let err = store.load().unwrap_err();
    assert!(matches!(err, TriageError::Cache(_)), "got {err:?}");
}

#[test]
fn version_mismatch_is_cache_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::for_repos(dir.path(), &settings().repos).unwrap();
    let mut snapshot = populated_snapshot();
    snapshot.version = SNAPSHOT_VERSION + 1;
    store.save(&snapshot).unwrap();
    let err = store.load().unwrap_err();
    assert!(err.to_string().contains("snapshot version"), "got: {err}");
}
