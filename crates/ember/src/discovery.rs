// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! Recursive package discovery for one repository.
//!
//! The scan walks the repository depth-first in post-order with sorted
//! listings, so the outcome is deterministic regardless of filesystem
//! iteration order.  Per-package failures demote to warnings and the
//! offending directory is dropped; the scan itself only fails on errors
//! outside any single package.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::package::{load_package, Package};
use crate::paths::is_reserved_dir_name;
use crate::repository::Repo;
use crate::PACKAGE_FILENAME;

#[cfg(test)]
#[path = "./discovery_test.rs"]
mod discovery_test;

/// Packages of one repository, indexed by declared name.
pub type PackageMap = BTreeMap<String, Package>;

/// Discover every package under `repo`.
///
/// Returns the name-indexed map plus non-fatal warnings (dropped
/// directories, duplicate names).
pub fn read_packages(repo: &Repo) -> Result<(PackageMap, Vec<String>)> {
    let mut pkgs = PackageMap::new();
    let mut warnings = Vec::new();
    let mut visited = HashSet::new();

    read_packages_recursive(repo, &mut pkgs, "", &mut visited, &mut warnings)?;

    Ok((pkgs, warnings))
}

fn read_packages_recursive(
    repo: &Repo,
    pkgs: &mut PackageMap,
    rel_dir: &str,
    visited: &mut HashSet<PathBuf>,
    warnings: &mut Vec<String>,
) -> Result<()> {
    let dir_list = match repo.filtered_search_list(rel_dir, visited) {
        Ok(dir_list) => dir_list,
        Err(err) => {
            warnings.push(err.to_string());
            return Ok(());
        }
    };

    for name in dir_list {
        if is_reserved_dir_name(&name) || name.starts_with('.') {
            continue;
        }

        let child = if rel_dir.is_empty() {
            name
        } else {
            format!("{rel_dir}/{name}")
        };
        read_packages_recursive(repo, pkgs, &child, visited, warnings)?;
    }

    let pkg_dir = if rel_dir.is_empty() {
        repo.path().to_string()
    } else {
        format!("{}/{rel_dir}", repo.path())
    };
    if !Path::new(&pkg_dir).join(PACKAGE_FILENAME).is_file() {
        return Ok(());
    }

    let pkg = match load_package(repo, &pkg_dir) {
        Ok(pkg) => pkg,
        Err(warning) => {
            warnings.push(warning);
            return Ok(());
        }
    };

    // First package with a given name wins; later ones only warn.
    if let Some(existing) = pkgs.get(pkg.name()) {
        warnings.push(
            Error::DuplicatePackage {
                name: pkg.name().to_string(),
                repo: repo.name().to_string(),
                path1: existing.base_path().to_string(),
                path2: pkg.base_path().to_string(),
            }
            .to_string(),
        );
        return Ok(());
    }

    pkgs.insert(pkg.name().to_string(), pkg);
    Ok(())
}
