use super::*;
use crate::model::{MergeState, sample_pull};

#[test]
fn parent_dir_of_paths() {
    assert_eq!(parent_dir("lib/ansible/modules/ping.py"), "lib/ansible/modules");
    assert_eq!(parent_dir("lib/foo.py"), "lib");
    assert_eq!(parent_dir("setup.py"), "");
}

#[test]
fn every_file_and_directory_is_indexed() {
    let pr = sample_pull(
        1,
        "alice",
        &["lib/a.py", "lib/b.py", "docs/index.rst", "README.md"],
    );
    let mut index = ForwardIndex::new();
    index.insert(&pr);

    for file in &pr.files {
        assert_eq!(index.files[file], vec![pr.url.clone()], "file {file}");
        assert!(index.dirs[parent_dir(file)].contains(&pr.url), "dir of {file}");
    }
    assert_eq!(index.files.len(), 4);
    assert_eq!(index.dirs.len(), 3, "lib, docs and the root");
}

#[test]
fn flags_land_in_matching_buckets_only() {
    let clean = sample_pull(1, "alice", &["a.py"]);

    let mut conflicted = sample_pull(2, "alice", &["b.py"]);
    conflicted.mergeable = Some(false);

    let mut unstable = sample_pull(3, "bob", &["c.py"]);
    unstable.merge_state = MergeState::Unstable;

    let mut merged = sample_pull(4, "bob", &["d.py"]);
    merged.merge_commit = true;
    merged.commit_authors.insert("carol@example.com".to_string());

    let mut index = ForwardIndex::new();
    for pr in [&clean, &conflicted, &unstable, &merged] {
        index.insert(pr);
    }

    assert_eq!(index.conflicts["alice"], vec![conflicted.url.clone()]);
    assert!(!index.conflicts.contains_key("bob"));
    assert_eq!(index.ci_failures["bob"], vec![unstable.url.clone()]);
    assert!(!index.ci_failures.contains_key("alice"));
    assert_eq!(index.merges["bob"], vec![merged.url.clone()]);
    assert_eq!(index.multi_author["bob"], vec![merged.url.clone()]);
    assert_eq!(index.multi_author.len(), 1);
    assert_eq!(index.pull_count(), 4);
}

#[test]
fn labels_are_indexed() {
    let mut pr = sample_pull(1, "alice", &["a.py"]);
    pr.labels = vec!["bug".to_string(), "needs_review".to_string()];
    let mut index = ForwardIndex::new();
    index.insert(&pr);
    assert_eq!(index.labels["bug"], vec![pr.url.clone()]);
    assert_eq!(index.labels["needs_review"], vec![pr.url.clone()]);
}

#[test]
fn ranked_users_by_count_then_encounter_order() {
    let mut index = ForwardIndex::new();
    index.insert(&sample_pull(1, "zed", &["a"]));
    index.insert(&sample_pull(2, "amy", &["a"]));
    index.insert(&sample_pull(3, "bob", &["a"]));
    index.insert(&sample_pull(4, "bob", &["a"]));
    index.insert(&sample_pull(5, "amy", &["a"]));
    index.insert(&sample_pull(6, "mia", &["a"]));

    let ranked = index.ranked_users();
    let logins: Vec<&str> = ranked.iter().map(|u| u.login.as_str()).collect();
    assert_eq!(logins, vec!["amy", "bob", "zed", "mia"]);
}

#[test]
fn reinsert_replaces_previous_record() {
    let mut index = ForwardIndex::new();
    let mut pr = sample_pull(1, "alice", &["old/file.py"]);
    pr.mergeable = Some(false);
    index.insert(&pr);

    pr.files = vec!["new/file.py".to_string()];
    pr.mergeable = Some(true);
    index.insert(&pr);

    assert!(!index.files.contains_key("old/file.py"));
    assert!(!index.dirs.contains_key("old"));
    assert_eq!(index.files["new/file.py"], vec![pr.url.clone()]);
    assert!(index.conflicts.is_empty());
    assert_eq!(index.users["alice"].len(), 1);
}

#[test]
fn remove_forgets_author_order() {
    let mut index = ForwardIndex::new();
    let pr = sample_pull(1, "alice", &["a.py"]);
    index.insert(&pr);
    index.remove(&pr.url);
    assert!(index.users.is_empty());
    assert!(index.ranked_users().is_empty());
    assert!(!index.contains(&pr.url));
}

#[test]
fn duplicate_file_entries_count_once() {
    let pr = sample_pull(1, "alice", &["a.py", "a.py"]);
    let mut index = ForwardIndex::new();
    index.insert(&pr);
    assert_eq!(index.files["a.py"].len(), 1);
}
