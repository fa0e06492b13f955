// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! Repository descriptors and directory listings for package discovery.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::paths::normalize_path;

#[cfg(test)]
#[path = "./repository_test.rs"]
mod repository_test;

/// Name of the repository rooted at the project itself.
pub const LOCAL_REPO_NAME: &str = "local";

/// One repository of packages.  This is a value descriptor; the project
/// owns the packages discovered under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    name: String,
    path: String,
    local: bool,
}

impl Repo {
    /// Describe a downloaded repository rooted at `path`.
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: normalize_path(path),
            local: name == LOCAL_REPO_NAME,
        }
    }

    /// Describe the project's own repository.
    pub fn local(path: &str) -> Self {
        Self::new(LOCAL_REPO_NAME, path)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_local(&self) -> bool {
        self.local
    }

    /// List the subdirectories of `rel_dir`, sorted lexicographically and
    /// filtered through `visited`.
    ///
    /// `visited` holds canonical paths of directories already handed out;
    /// revisits are dropped, which breaks symlink cycles during the
    /// recursive package scan.
    pub fn filtered_search_list(
        &self,
        rel_dir: &str,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<Vec<String>> {
        let dir = if rel_dir.is_empty() {
            self.path.clone()
        } else {
            format!("{}/{rel_dir}", self.path)
        };

        let entries = fs::read_dir(&dir).map_err(|error| Error::ReadFailed {
            path: dir.clone().into(),
            error,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|error| Error::ReadFailed {
                path: dir.clone().into(),
                error,
            })?;

            // Follow symlinks when deciding whether this is a directory.
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let canonical = match dunce::canonicalize(&path) {
                Ok(canonical) => canonical,
                Err(_) => continue,
            };
            if !visited.insert(canonical) {
                continue;
            }

            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        names.sort();
        Ok(names)
    }
}
