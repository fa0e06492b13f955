// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! Project state: the repositories and package stores for one command.
//!
//! A `Project` is built once per command invocation and threaded through
//! the operations that need it.  It owns every discovered package; other
//! components refer to packages by repository and name.

use std::collections::BTreeMap;

use crate::discovery::{read_packages, PackageMap};
use crate::error::{Error, Result};
use crate::package::{Package, PackageType};
use crate::paths::normalize_path;
use crate::repository::Repo;
use crate::target::Target;

#[cfg(test)]
#[path = "./project_test.rs"]
mod project_test;

/// One loaded project.
#[derive(Debug, Clone)]
pub struct Project {
    path: String,
    repos: Vec<Repo>,
    packages: BTreeMap<String, PackageMap>,
    warnings: Vec<String>,
}

impl Project {
    /// Create a project rooted at `path`.  The project directory itself is
    /// the local repository; no packages are loaded yet.
    pub fn new(path: &str) -> Self {
        let path = normalize_path(path);
        let local = Repo::local(&path);
        Self {
            path,
            repos: vec![local],
            packages: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Register an additional (downloaded) repository.
    pub fn add_repo(&mut self, repo: Repo) {
        self.repos.push(repo);
    }

    /// Scan every registered repository for packages.
    ///
    /// Scan warnings accumulate on the project and are logged; they never
    /// fail the load.
    pub fn load_packages(&mut self) -> Result<()> {
        for repo in &self.repos {
            let (pkgs, warnings) = read_packages(repo)?;
            for warning in &warnings {
                tracing::warn!("{}", warning);
            }
            self.warnings.extend(warnings);
            self.packages.insert(repo.name().to_string(), pkgs);
        }
        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn local_repo(&self) -> &Repo {
        &self.repos[0]
    }

    pub fn repos(&self) -> &[Repo] {
        &self.repos
    }

    /// Warnings accumulated while loading packages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The package store of one repository.
    pub fn packages(&self, repo_name: &str) -> Option<&PackageMap> {
        self.packages.get(repo_name)
    }

    /// Look up a package by user-facing name: `name` in the local repo or
    /// `@repo/name` elsewhere.
    pub fn find_package(&self, full_name: &str) -> Option<&Package> {
        let (repo_name, pkg_name) = match full_name.strip_prefix('@') {
            Some(qualified) => qualified.split_once('/')?,
            None => (self.local_repo().name(), full_name),
        };
        self.packages.get(repo_name)?.get(pkg_name)
    }

    /// Insert `pkg` into its repository's store, replacing any package of
    /// the same name.
    pub fn insert_package(&mut self, pkg: Package) {
        self.packages
            .entry(pkg.repo().name().to_string())
            .or_default()
            .insert(pkg.name().to_string(), pkg);
    }

    /// Remove a package from a repository's store.
    pub fn remove_package(&mut self, repo_name: &str, pkg_name: &str) -> Option<Package> {
        self.packages.get_mut(repo_name)?.remove(pkg_name)
    }

    /// Resolve `name` to a target.
    ///
    /// The returned target owns a copy of the package; callers mutate it,
    /// save it, and put it back with [`Project::insert_package`].  An
    /// operation that fails midway leaves the store untouched.
    pub fn get_target(&self, name: &str) -> Result<Target> {
        let pkg = self
            .find_package(name)
            .filter(|pkg| pkg.pkg_type() == PackageType::Target)
            .ok_or_else(|| Error::UnknownTarget(name.to_string()))?;
        Target::new(pkg.clone())
    }

    /// User-facing target names, sorted.
    ///
    /// The internal `*/unittest` targets are suppressed, and targets from
    /// other repositories only appear when `include_foreign` is set.
    pub fn target_names(&self, include_foreign: bool) -> Vec<String> {
        let mut names: Vec<String> = self
            .packages
            .values()
            .flat_map(|pkgs| pkgs.values())
            .filter(|pkg| pkg.pkg_type() == PackageType::Target)
            .filter(|pkg| include_foreign || pkg.repo().is_local())
            .map(|pkg| pkg.full_name())
            .filter(|name| !name.ends_with("/unittest"))
            .collect();
        names.sort();
        names
    }
}
