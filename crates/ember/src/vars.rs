// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! The target variable router.
//!
//! Targets expose one flat vocabulary of variables, but the values live in
//! three places: scalar selections (`app`, `bsp`, ...) under `target.*` in
//! the primary manifest, build flags as lists under `pkg.*` in the primary
//! manifest, and syscfg overrides as a map under `syscfg.vals` in the
//! syscfg manifest.  This module routes each logical name to its document,
//! key, and value shape, and implements the set/amend/show semantics on
//! top of that routing.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::package::Package;
use crate::syscfg;
use crate::target::Target;

#[cfg(test)]
#[path = "./vars_test.rs"]
mod vars_test;

/// A logical target variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetVar {
    App,
    Bsp,
    Loader,
    BuildProfile,
    Aflags,
    Cflags,
    Cxxflags,
    Lflags,
    Syscfg,
}

/// The flag variables, each stored as a `pkg.*` token list.
const FLAG_VARS: [TargetVar; 4] = [
    TargetVar::Aflags,
    TargetVar::Cflags,
    TargetVar::Cxxflags,
    TargetVar::Lflags,
];

impl TargetVar {
    /// All variables accepted by `set`, in display order.
    pub fn all() -> [TargetVar; 9] {
        [
            TargetVar::Aflags,
            TargetVar::App,
            TargetVar::BuildProfile,
            TargetVar::Bsp,
            TargetVar::Cflags,
            TargetVar::Cxxflags,
            TargetVar::Lflags,
            TargetVar::Loader,
            TargetVar::Syscfg,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            TargetVar::App => "app",
            TargetVar::Bsp => "bsp",
            TargetVar::Loader => "loader",
            TargetVar::BuildProfile => "build_profile",
            TargetVar::Aflags => "aflags",
            TargetVar::Cflags => "cflags",
            TargetVar::Cxxflags => "cxxflags",
            TargetVar::Lflags => "lflags",
            TargetVar::Syscfg => "syscfg",
        }
    }

    /// Parse a user-supplied variable name for `set`.  An optional
    /// `target.` prefix is accepted and ignored.
    pub fn from_user_name(name: &str) -> Result<Self> {
        let bare = name.strip_prefix("target.").unwrap_or(name);
        Self::all()
            .into_iter()
            .find(|var| var.name() == bare)
            .ok_or_else(|| Error::InvalidArgument(format!("Not a valid target variable: {bare}")))
    }

    /// Parse a user-supplied variable name for `amend`.  Only the bare
    /// spellings of the multi-valued variables are accepted; `amend` does
    /// not strip a `target.` prefix.
    pub fn from_amend_name(name: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|var| var.name() == name && var.is_amendable())
            .ok_or_else(|| Error::InvalidArgument(format!("Cannot amend values for {name}")))
    }

    /// Whether `amend` accepts this variable.  Only multi-valued
    /// variables can be amended.
    pub fn is_amendable(self) -> bool {
        matches!(
            self,
            TargetVar::Aflags
                | TargetVar::Cflags
                | TargetVar::Cxxflags
                | TargetVar::Lflags
                | TargetVar::Syscfg
        )
    }

    /// Primary-manifest key for a flag variable.
    fn pkg_key(self) -> String {
        format!("pkg.{}", self.name())
    }

    /// Primary-manifest key for a scalar target variable.
    fn target_key(self) -> String {
        format!("target.{}", self.name())
    }
}

/// Set `name` to `value` on the target, in memory.
///
/// An empty value deletes the variable.  Setting `syscfg` replaces the
/// whole syscfg document; callers wanting additive semantics use
/// [`amend`].
pub fn set(target: &mut Target, name: &str, value: &str) -> Result<()> {
    let var = TargetVar::from_user_name(name)?;

    // Trim a trailing slash; tab completion likes to add one.
    let value = value.strip_suffix('/').unwrap_or(value);

    match var {
        TargetVar::Syscfg => {
            let vals = syscfg::kv_pairs_from_str(value)?;
            let doc = target.package_mut().syscfg_doc_mut();
            doc.clear();
            doc.replace_string_map("syscfg.vals", vals);
        }
        TargetVar::Aflags | TargetVar::Cflags | TargetVar::Cxxflags | TargetVar::Lflags => {
            let key = var.pkg_key();
            let doc = target.package_mut().primary_doc_mut();
            if value.is_empty() {
                doc.delete(&key);
            } else {
                let tokens = value.split_whitespace().map(String::from);
                doc.replace_string_list(&key, tokens);
            }
        }
        _ => {
            let key = var.target_key();
            let doc = target.package_mut().primary_doc_mut();
            if value.is_empty() {
                doc.delete(&key);
            } else {
                doc.replace_string(&key, value);
            }
        }
    }

    Ok(())
}

/// Amend a multi-valued variable on the target, in memory.
///
/// The variable must be given by its bare name.  With `delete` unset,
/// flag tokens not already present are appended and syscfg entries are
/// unioned in.  With `delete` set, the named flag tokens and syscfg
/// entries are removed (syscfg values on the right of `=` are ignored in
/// that case).
pub fn amend(target: &mut Target, name: &str, value: &str, delete: bool) -> Result<()> {
    let var = TargetVar::from_amend_name(name)?;

    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "Must provide a value to amend for variable {}",
            var.name()
        )));
    }
    let value = value.strip_suffix('/').unwrap_or(value);

    match var {
        TargetVar::Syscfg => amend_syscfg(target, value, delete),
        _ => amend_build_flags(target, var, value, delete),
    }
}

fn amend_syscfg(target: &mut Target, value: &str, delete: bool) -> Result<()> {
    let amend_vals = syscfg::kv_pairs_from_str(value)?;

    let doc = target.package_mut().syscfg_doc_mut();
    let mut vals = doc.get_string_map("syscfg.vals").unwrap_or_default();

    if delete {
        for key in amend_vals.keys() {
            vals.remove(key);
        }
    } else {
        vals.extend(amend_vals);
    }

    doc.replace_string_map("syscfg.vals", vals);
    Ok(())
}

fn amend_build_flags(target: &mut Target, var: TargetVar, value: &str, delete: bool) -> Result<()> {
    let key = var.pkg_key();
    let doc = target.package_mut().primary_doc_mut();

    let cur_flags = doc.get_string_list(&key).unwrap_or_default();
    let amend_flags: Vec<&str> = value.split_whitespace().collect();

    let new_flags: Vec<String> = if delete {
        cur_flags
            .into_iter()
            .filter(|cur| !amend_flags.contains(&cur.as_str()))
            .collect()
    } else {
        // Append tokens not already present, preserving current order.
        let mut new_flags = cur_flags.clone();
        for flag in amend_flags {
            if !cur_flags.iter().any(|cur| cur == flag) {
                new_flags.push(flag.to_string());
            }
        }
        new_flags
    };

    doc.replace_string_list(&key, new_flags);
    Ok(())
}

/// Render the target's variables for display, sorted by name.
///
/// Scalar `target.*` keys appear under their bare suffix, flags are
/// token-sorted and space-joined, and syscfg is encoded in its wire
/// format with sorted keys.  Variables with empty values are suppressed.
pub fn show(target: &Target) -> Result<BTreeMap<String, String>> {
    let mut kv_pairs = BTreeMap::new();

    for (key, val) in target.package().primary_doc().all_settings_as_strings() {
        if let Some(bare) = key.strip_prefix("target.") {
            kv_pairs.insert(bare.to_string(), val);
        }
    }

    let sys_vals = target
        .package()
        .syscfg_doc()
        .get_string_map("syscfg.vals")
        .unwrap_or_default();
    kv_pairs.insert("syscfg".to_string(), syscfg::kv_pairs_to_str(&sys_vals)?);

    for var in FLAG_VARS {
        kv_pairs.insert(var.name().to_string(), flag_string(target.package(), var));
    }

    kv_pairs.retain(|_, val| !val.is_empty());
    Ok(kv_pairs)
}

fn flag_string(pkg: &Package, var: TargetVar) -> String {
    let mut vals = pkg
        .primary_doc()
        .get_string_list(&var.pkg_key())
        .unwrap_or_default();
    vals.sort();
    vals.join(" ")
}
