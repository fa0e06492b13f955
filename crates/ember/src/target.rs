// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! Target lifecycle: create, copy, delete, and variable mutation entry
//! points.
//!
//! A [`Target`] wraps a package of type `target` and owns the
//! save-both-manifests rule.  The operations here work on a copy of the
//! stored package and only put it back into the project once every
//! mutation and save has succeeded, so a failing command leaves the store
//! as it was.

use std::collections::BTreeMap;
use std::fs;
use std::io;

use crate::error::{Error, Result};
use crate::package::{Package, PackageType};
use crate::paths::{is_reserved_dir_name, normalize_path};
use crate::project::Project;
use crate::vars;
use crate::{PACKAGE_FILENAME, SYSCFG_FILENAME, TARGET_FILENAME};

#[cfg(test)]
#[path = "./target_test.rs"]
mod target_test;

/// A package of type `target`.
#[derive(Debug, Clone)]
pub struct Target {
    package: Package,
}

impl Target {
    /// Wrap `package`; it must be of type `target`.
    pub fn new(package: Package) -> Result<Self> {
        if package.pkg_type() != PackageType::Target {
            return Err(Error::InvalidArgument(format!(
                "Package {} is not a target",
                package.full_name()
            )));
        }
        Ok(Self { package })
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn package_mut(&mut self) -> &mut Package {
        &mut self.package
    }

    pub fn into_package(self) -> Package {
        self.package
    }

    pub fn full_name(&self) -> String {
        self.package.full_name()
    }

    /// Persist both manifests.  Each file is rewritten whole; there is no
    /// cross-file transaction.
    pub fn save(&self) -> Result<()> {
        self.package.save()?;
        self.package.save_syscfg()
    }

    /// Whether the target directory holds files beyond the tool-owned
    /// ones (the primary manifest and the target-specific file).
    pub fn contains_user_files(&self) -> Result<bool> {
        for entry in fs::read_dir(self.package.base_path())? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name != PACKAGE_FILENAME && name != TARGET_FILENAME {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

// Local precondition for new target names; the front-end may enforce
// richer conventions before calling in.
fn validate_new_target_name(project: &Project, name: &str) -> Result<()> {
    if name.is_empty() || name != normalize_path(name) || name.starts_with('/') {
        return Err(Error::InvalidArgument(format!(
            "Invalid target name: \"{name}\""
        )));
    }
    for segment in name.split('/') {
        if segment.starts_with('.') || is_reserved_dir_name(segment) {
            return Err(Error::InvalidArgument(format!(
                "Invalid target name: \"{name}\""
            )));
        }
    }
    if project.find_package(name).is_some() {
        return Err(Error::InvalidArgument(format!(
            "Target already exists: {name}"
        )));
    }
    Ok(())
}

/// Create a new target named `name` under the local repository.
///
/// The target directory is created with a minimal primary manifest
/// holding only the package name and type.
pub fn create(project: &mut Project, name: &str) -> Result<()> {
    validate_new_target_name(project, name)?;

    let repo = project.local_repo().clone();
    let base_path = format!("{}/{name}", repo.path());
    let mut pack = Package::new(repo, &base_path);
    pack.set_name(name);
    pack.set_type(PackageType::Target);

    let target = Target::new(pack)?;
    target.package().save()?;

    project.insert_package(target.into_package());
    Ok(())
}

/// Create `dst_name` as a copy of the target `src_name`.
///
/// The clone lands under the local repository; its syscfg file is copied
/// bit-for-bit from the source (a missing source syscfg is not an error).
pub fn copy(project: &mut Project, src_name: &str, dst_name: &str) -> Result<()> {
    let src = project.get_target(src_name)?;
    validate_new_target_name(project, dst_name)?;

    let dst_pkg = src
        .package()
        .clone_with(project.local_repo().clone(), dst_name);
    let dst = Target::new(dst_pkg)?;
    dst.package().save()?;

    let src_syscfg = format!("{}/{SYSCFG_FILENAME}", src.package().base_path());
    let dst_syscfg = format!("{}/{SYSCFG_FILENAME}", dst.package().base_path());
    match fs::copy(&src_syscfg, &dst_syscfg) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    project.insert_package(dst.into_package());
    Ok(())
}

/// Delete the target `name`, removing its directory.
///
/// A directory holding user files beyond the tool-owned ones is only
/// removed with `force`; without it the deletion fails with
/// [`Error::TargetNotEmpty`] so the front-end can confirm and retry.
pub fn delete(project: &mut Project, name: &str, force: bool) -> Result<()> {
    let target = project.get_target(name)?;

    if !force && target.contains_user_files()? {
        return Err(Error::TargetNotEmpty {
            path: target.package().base_path().into(),
        });
    }

    fs::remove_dir_all(target.package().base_path())?;

    let repo_name = target.package().repo().name().to_string();
    let pkg_name = target.package().name().to_string();
    project.remove_package(&repo_name, &pkg_name);
    Ok(())
}

/// Apply `name=value` assignments to the target `name`, then save.
pub fn set_vars(project: &mut Project, name: &str, assignments: &[(&str, &str)]) -> Result<()> {
    let mut target = project.get_target(name)?;

    for (var, value) in assignments {
        vars::set(&mut target, var, value)?;
    }

    target.save()?;
    project.insert_package(target.into_package());
    Ok(())
}

/// Amend multi-valued variables on the target `name`, then save.
///
/// With `delete` set, the supplied flag tokens and syscfg names are
/// removed instead of added.
pub fn amend_vars(
    project: &mut Project,
    name: &str,
    assignments: &[(&str, &str)],
    delete: bool,
) -> Result<()> {
    let mut target = project.get_target(name)?;

    for (var, value) in assignments {
        vars::amend(&mut target, var, value, delete)?;
    }

    target.save()?;
    project.insert_package(target.into_package());
    Ok(())
}

/// Render the variables of the target `name` for display.
pub fn show_vars(project: &Project, name: &str) -> Result<BTreeMap<String, String>> {
    let target = project.get_target(name)?;
    vars::show(&target)
}
