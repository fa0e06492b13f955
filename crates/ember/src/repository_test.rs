// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use tempfile::TempDir;

use super::*;

#[rstest]
fn test_local_repo() {
    let repo = Repo::local("/proj");
    assert_eq!(repo.name(), LOCAL_REPO_NAME);
    assert!(repo.is_local());

    let foreign = Repo::new("core", "/proj/repos/core");
    assert!(!foreign.is_local());
}

#[rstest]
fn test_repo_path_is_normalized() {
    let repo = Repo::local("/proj//x/./y/");
    assert_eq!(repo.path(), "/proj/x/y");
}

#[rstest]
fn test_filtered_search_list_sorts_and_keeps_dirs_only() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("zeta")).unwrap();
    fs::create_dir(tmp.path().join("alpha")).unwrap();
    fs::write(tmp.path().join("stray.txt"), "not a dir").unwrap();

    let repo = Repo::local(&tmp.path().to_string_lossy());
    let mut visited = HashSet::new();
    let names = repo.filtered_search_list("", &mut visited).unwrap();

    assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
}

#[rstest]
fn test_filtered_search_list_deduplicates_visits() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("once")).unwrap();

    let repo = Repo::local(&tmp.path().to_string_lossy());
    let mut visited = HashSet::new();

    let first = repo.filtered_search_list("", &mut visited).unwrap();
    assert_eq!(first, vec!["once".to_string()]);

    // The same directory is never handed out twice.
    let second = repo.filtered_search_list("", &mut visited).unwrap();
    assert!(second.is_empty());
}

#[rstest]
fn test_filtered_search_list_missing_dir_fails() {
    let tmp = TempDir::new().unwrap();
    let repo = Repo::local(&tmp.path().to_string_lossy());
    let mut visited = HashSet::new();

    match repo.filtered_search_list("no/such/dir", &mut visited) {
        Err(Error::ReadFailed { .. }) => {}
        other => panic!("Expected ReadFailed, got: {:?}", other),
    }
}
