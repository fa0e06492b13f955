// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! Path normalization and package identity rules.
//!
//! Every path entering the package model is normalized here so that
//! downstream string comparisons are total: forward slashes only, no `.`
//! or `..` segments, no duplicate separators.

#[cfg(test)]
#[path = "./paths_test.rs"]
mod paths_test;

/// Directory names that are never descended into and never treated as
/// package candidates.
pub const RESERVED_DIR_NAMES: [&str; 3] = ["src", "include", "bin"];

/// Whether `name` is one of the reserved directory names.
pub fn is_reserved_dir_name(name: &str) -> bool {
    RESERVED_DIR_NAMES.contains(&name)
}

/// Normalize a path to forward slashes with `.`/`..`/duplicate separators
/// collapsed.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|s| *s != "..") {
                    parts.pop();
                } else if !absolute {
                    // Relative paths keep leading `..` segments.
                    parts.push("..");
                }
            }
            segment => parts.push(segment),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Whether the trailing segments of `path` spell out the slash-delimited
/// segments of `name`.  The match is segment-aligned: a package named
/// `foo` does not match a directory named `myfoo`.
pub fn name_matches_path(name: &str, path: &str) -> bool {
    let path = normalize_path(path);
    let name = name.trim_matches('/');
    if name.is_empty() {
        return false;
    }

    path == name || path.ends_with(&format!("/{name}"))
}
