// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use std::fs;
use tempfile::TempDir;

use super::*;

fn project_with(tmp: &TempDir, packages: &[(&str, &str)]) -> Project {
    for (rel_dir, manifest) in packages {
        let dir = tmp.path().join(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(crate::PACKAGE_FILENAME), manifest).unwrap();
    }

    let mut project = Project::new(&tmp.path().to_string_lossy());
    project.load_packages().expect("Project should load");
    project
}

#[rstest]
fn test_find_package_local_and_foreign() {
    let tmp = TempDir::new().unwrap();
    // Downloaded repos live under a dot directory, outside the local
    // repo's scan.
    let repo_root = tmp.path().join(".repos/core");
    fs::create_dir_all(repo_root.join("sys/shell")).unwrap();
    fs::write(
        repo_root.join("sys/shell").join(crate::PACKAGE_FILENAME),
        "pkg.name: sys/shell\n",
    )
    .unwrap();

    let mut project = project_with(&tmp, &[("apps/blinky", "pkg.name: apps/blinky\npkg.type: app\n")]);
    project.add_repo(Repo::new("core", &repo_root.to_string_lossy()));
    project.load_packages().unwrap();

    assert!(project.find_package("apps/blinky").is_some());
    assert!(project.find_package("@core/sys/shell").is_some());
    assert!(project.find_package("sys/shell").is_none());
    assert!(project.find_package("@nope/sys/shell").is_none());
}

#[rstest]
fn test_get_target_rejects_non_targets() {
    let tmp = TempDir::new().unwrap();
    let project = project_with(
        &tmp,
        &[
            ("apps/blinky", "pkg.name: apps/blinky\npkg.type: app\n"),
            ("my_t", "pkg.name: my_t\npkg.type: target\n"),
        ],
    );

    assert!(project.get_target("my_t").is_ok());
    match project.get_target("apps/blinky") {
        Err(Error::UnknownTarget(_)) => {}
        other => panic!("Expected UnknownTarget, got: {:?}", other),
    }
    assert!(project.get_target("missing").is_err());
}

#[rstest]
fn test_target_names_filters() {
    let tmp = TempDir::new().unwrap();
    let foreign_root = tmp.path().join(".repos/core");
    fs::create_dir_all(foreign_root.join("their_t")).unwrap();
    fs::write(
        foreign_root.join("their_t").join(crate::PACKAGE_FILENAME),
        "pkg.name: their_t\npkg.type: target\n",
    )
    .unwrap();

    let mut project = project_with(
        &tmp,
        &[
            ("my_t", "pkg.name: my_t\npkg.type: target\n"),
            (
                "pkgs/shell/unittest",
                "pkg.name: pkgs/shell/unittest\npkg.type: target\n",
            ),
        ],
    );
    project.add_repo(Repo::new("core", &foreign_root.to_string_lossy()));
    project.load_packages().unwrap();

    // Internal unittest targets and foreign targets are hidden by
    // default.
    assert_eq!(project.target_names(false), vec!["my_t".to_string()]);
    assert_eq!(
        project.target_names(true),
        vec!["@core/their_t".to_string(), "my_t".to_string()]
    );
}

#[rstest]
fn test_scan_warnings_accumulate() {
    let tmp = TempDir::new().unwrap();
    let project = project_with(
        &tmp,
        &[
            ("ok", "pkg.name: ok\n"),
            ("broken", "pkg.name: [oops\n"),
        ],
    );

    assert_eq!(project.warnings().len(), 1);
    assert!(project
        .packages(crate::repository::LOCAL_REPO_NAME)
        .unwrap()
        .contains_key("ok"));
}
