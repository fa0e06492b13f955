// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[rstest]
#[case("/a/b/c", "/a/b/c")]
#[case("/a//b///c", "/a/b/c")]
#[case("/a/./b/.", "/a/b")]
#[case("/a/b/../c", "/a/c")]
#[case("/a/b/c/", "/a/b/c")]
#[case("a\\b\\c", "a/b/c")]
#[case("../x/./y", "../x/y")]
#[case("/..", "/")]
#[case(".", ".")]
fn test_normalize_path(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize_path(input), expected);
}

#[rstest]
fn test_name_matches_path_suffix() {
    assert!(name_matches_path("foo", "/proj/repo/foo"));
    assert!(name_matches_path("hw/bsp/nrf52dk", "/proj/repo/hw/bsp/nrf52dk"));
    assert!(name_matches_path("foo", "foo"));
}

#[rstest]
fn test_name_matches_path_is_segment_aligned() {
    // The name must align with whole path segments.
    assert!(!name_matches_path("foo", "/proj/repo/myfoo"));
    assert!(!name_matches_path("bsp/nrf52dk", "/proj/hw-bsp/nrf52dk"));
}

#[rstest]
fn test_name_matches_path_rejects_mismatch() {
    assert!(!name_matches_path("foo", "/proj/repo/bar"));
    assert!(!name_matches_path("", "/proj/repo/bar"));
}

#[rstest]
fn test_name_matches_path_normalizes_first() {
    assert!(name_matches_path("foo", "/proj//repo/./foo/"));
}

#[rstest]
fn test_reserved_dir_names() {
    assert!(is_reserved_dir_name("src"));
    assert!(is_reserved_dir_name("include"));
    assert!(is_reserved_dir_name("bin"));
    assert!(!is_reserved_dir_name("srcs"));
    assert!(!is_reserved_dir_name("apps"));
}
