// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! Package model: one directory with a primary manifest, an optional
//! syscfg manifest, and derived metadata.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;

use serde_yaml::Value;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::paths::{name_matches_path, normalize_path};
use crate::repository::Repo;
use crate::{PACKAGE_FILENAME, SYSCFG_FILENAME};

#[cfg(test)]
#[path = "./package_test.rs"]
mod package_test;

/// Exclusive upper bound for `pkg.subpriority`.
pub const SUBPRIORITY_LIMIT: i64 = 16;

/// Extra package-specific settings that don't come from manifests, e.g. a
/// SELFTEST flag injected when unit tests are built.
pub type Settings = BTreeMap<String, String>;

/// Package types, ordered.  Subpriorities are only legal below the BSP
/// boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PackageType {
    Compiler,
    Sdk,
    Generated,
    #[default]
    Lib,
    Transient,
    App,
    UnitTest,
    Bsp,
    Target,
}

impl PackageType {
    /// The `pkg.type` manifest spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            PackageType::Compiler => "compiler",
            PackageType::Sdk => "sdk",
            PackageType::Generated => "generated",
            PackageType::Lib => "lib",
            PackageType::Transient => "transient",
            PackageType::App => "app",
            PackageType::UnitTest => "unittest",
            PackageType::Bsp => "bsp",
            PackageType::Target => "target",
        }
    }

    /// Parse a `pkg.type` manifest value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "compiler" => Some(PackageType::Compiler),
            "sdk" => Some(PackageType::Sdk),
            "generated" => Some(PackageType::Generated),
            "lib" => Some(PackageType::Lib),
            "transient" => Some(PackageType::Transient),
            "app" => Some(PackageType::App),
            "unittest" => Some(PackageType::UnitTest),
            "bsp" => Some(PackageType::Bsp),
            "target" => Some(PackageType::Target),
            _ => None,
        }
    }

    /// Whether packages of this type may carry a nonzero subpriority.
    pub fn supports_subpriority(self) -> bool {
        self < PackageType::Bsp
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// General information about a package, read best-effort from the primary
/// manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDesc {
    pub author: String,
    pub homepage: String,
    pub description: String,
    pub keywords: Vec<String>,
}

/// Read-only capability over a package, for collaborators (resolver,
/// builder) that must not mutate it.
pub trait PackageInfo {
    fn name(&self) -> &str;
    fn pkg_type(&self) -> PackageType;
    fn base_path(&self) -> &str;
    fn repo(&self) -> &Repo;
    fn primary_doc(&self) -> &Document;
    fn syscfg_doc(&self) -> &Document;
}

/// One package on disk.
#[derive(Debug, Clone)]
pub struct Package {
    repo: Repo,
    name: String,
    base_path: String,
    pkg_type: PackageType,
    sub_priority: i64,
    linked_name: Option<String>,
    desc: PackageDesc,

    injected_settings: Settings,

    /// Settings read from pkg.yml.
    pkg_doc: Document,

    /// Settings read from syscfg.yml.
    syscfg_doc: Document,

    /// Paths of all manifest files; used to decide if a rebuild is
    /// required.
    cfg_filenames: Vec<String>,
}

/// Primary-manifest keys persisted as block sequences, in write order.
const SEQUENCE_KEYS: [&str; 5] = [
    "pkg.deps",
    "pkg.aflags",
    "pkg.cflags",
    "pkg.cxxflags",
    "pkg.lflags",
];

impl Package {
    /// Create an unloaded package rooted at `pkg_dir`.
    pub fn new(repo: Repo, pkg_dir: &str) -> Self {
        let base_path = normalize_path(pkg_dir);
        let pkg_doc = Document::new(format!("{base_path}/{PACKAGE_FILENAME}"));
        let syscfg_doc = Document::new(format!("{base_path}/{SYSCFG_FILENAME}"));

        Self {
            repo,
            name: String::new(),
            base_path,
            pkg_type: PackageType::default(),
            sub_priority: 0,
            linked_name: None,
            desc: PackageDesc::default(),
            injected_settings: Settings::new(),
            pkg_doc,
            syscfg_doc,
            cfg_filenames: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// The package name qualified with its repository for foreign
    /// packages: `@repo/name`.  Local packages use the bare name.
    pub fn full_name(&self) -> String {
        if self.repo.is_local() {
            self.name.clone()
        } else {
            format!("@{}/{}", self.repo.name(), self.name)
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn repo(&self) -> &Repo {
        &self.repo
    }

    pub fn pkg_type(&self) -> PackageType {
        self.pkg_type
    }

    pub fn set_type(&mut self, pkg_type: PackageType) {
        self.pkg_type = pkg_type;
    }

    pub fn sub_priority(&self) -> i64 {
        self.sub_priority
    }

    /// Redirection destination; present only for transient packages.
    pub fn linked_name(&self) -> Option<&str> {
        self.linked_name.as_deref()
    }

    pub fn desc(&self) -> &PackageDesc {
        &self.desc
    }

    pub fn primary_doc(&self) -> &Document {
        &self.pkg_doc
    }

    pub fn primary_doc_mut(&mut self) -> &mut Document {
        &mut self.pkg_doc
    }

    pub fn syscfg_doc(&self) -> &Document {
        &self.syscfg_doc
    }

    pub fn syscfg_doc_mut(&mut self) -> &mut Document {
        &mut self.syscfg_doc
    }

    pub fn injected_settings(&self) -> &Settings {
        &self.injected_settings
    }

    /// Add a process-level setting override for this package.
    pub fn inject_setting(&mut self, key: &str, value: &str) {
        self.injected_settings
            .insert(key.to_string(), value.to_string());
    }

    /// Manifest files contributing to this package's configuration.
    pub fn cfg_filenames(&self) -> &[String] {
        &self.cfg_filenames
    }

    pub fn pkg_yaml_path(&self) -> String {
        format!("{}/{}", self.base_path, PACKAGE_FILENAME)
    }

    pub fn syscfg_yaml_path(&self) -> String {
        format!("{}/{}", self.base_path, SYSCFG_FILENAME)
    }

    /// Load the package from its manifests.
    ///
    /// Requires `pkg.name` and name-path coherence; an unknown `pkg.type`
    /// is fatal.  Transient packages read only `pkg.link` and stop.  A
    /// missing syscfg manifest is normal; any other syscfg read failure
    /// propagates.
    pub fn load(&mut self) -> Result<()> {
        let pkg_yaml_path = self.pkg_yaml_path();
        self.pkg_doc = Document::read_file(pkg_yaml_path.as_ref())?;
        self.cfg_filenames.push(pkg_yaml_path.clone());

        let name = self.pkg_doc.get_string("pkg.name").unwrap_or_default();
        if name.is_empty() {
            return Err(Error::InvalidIdentity {
                path: self.base_path.clone().into(),
                reason: "missing \"pkg.name\" field in its manifest".to_string(),
            });
        }
        if !name_matches_path(&name, &self.base_path) {
            return Err(Error::InvalidIdentity {
                path: self.base_path.clone().into(),
                reason: format!("\"pkg.name={name}\" does not match the package directory"),
            });
        }
        self.name = name;

        self.pkg_type = match self.pkg_doc.get_string("pkg.type") {
            None => PackageType::default(),
            Some(type_name) if type_name.is_empty() => PackageType::default(),
            Some(type_name) => PackageType::from_name(&type_name).ok_or_else(|| {
                Error::InvalidManifest {
                    path: self.base_path.clone().into(),
                    reason: format!("unknown \"pkg.type={type_name}\""),
                }
            })?,
        };

        if self.pkg_type == PackageType::Transient {
            let linked = self.pkg_doc.get_string("pkg.link").unwrap_or_default();
            if linked.is_empty() {
                return Err(Error::InvalidManifest {
                    path: self.base_path.clone().into(),
                    reason: "transient package does not specify a \"pkg.link\" package"
                        .to_string(),
                });
            }
            self.linked_name = Some(linked);

            // Nothing else is meaningful for a redirection package.
            return Ok(());
        }

        let sub_priority = self.pkg_doc.get_int("pkg.subpriority").unwrap_or(0);
        if !(0..SUBPRIORITY_LIMIT).contains(&sub_priority) {
            return Err(Error::InvalidManifest {
                path: self.base_path.clone().into(),
                reason: format!(
                    "subpriority value \"{sub_priority}\" is out of range (0 - {})",
                    SUBPRIORITY_LIMIT - 1
                ),
            });
        }
        if sub_priority > 0 && !self.pkg_type.supports_subpriority() {
            return Err(Error::InvalidManifest {
                path: self.base_path.clone().into(),
                reason: format!(
                    "packages of type \"{}\" do not support subpriorities",
                    self.pkg_type
                ),
            });
        }
        self.sub_priority = sub_priority;

        self.desc = self.read_desc();

        let syscfg_yaml_path = self.syscfg_yaml_path();
        match Document::read_file(syscfg_yaml_path.as_ref()) {
            Ok(doc) => self.syscfg_doc = doc,
            Err(Error::ManifestNotFound { .. }) => {}
            Err(err) => return Err(err),
        }
        self.cfg_filenames.push(syscfg_yaml_path);

        Ok(())
    }

    // Description fields are best-effort; a malformed one reads as empty
    // after a one-time warning from the document layer.
    fn read_desc(&self) -> PackageDesc {
        PackageDesc {
            author: self.pkg_doc.get_string("pkg.author").unwrap_or_default(),
            homepage: self.pkg_doc.get_string("pkg.homepage").unwrap_or_default(),
            description: self
                .pkg_doc
                .get_string("pkg.description")
                .unwrap_or_default(),
            keywords: self
                .pkg_doc
                .get_string_list("pkg.keywords")
                .unwrap_or_default(),
        }
    }

    fn sequence_block(&self, key: &str) -> String {
        let vals = self.pkg_doc.get_string_list(key).unwrap_or_default();
        if vals.is_empty() {
            return String::new();
        }

        let mut block = format!("{key}:\n");
        for val in vals {
            block.push_str(&format!("    - {}\n", Document::escape_string(&val)));
        }
        block
    }

    /// Save the primary manifest.
    ///
    /// Only the fields a target owns are persisted: identity and
    /// description scalars, the dependency and flag sequences, and the
    /// `target.*` namespace.  Any other key present on disk is dropped on
    /// rewrite.  Targets are the only packages the tool saves, and their
    /// primary manifests belong to it.
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;

        let mut out = String::new();
        out.push_str(&format!(
            "pkg.name: {}\n",
            Document::escape_string(&self.name)
        ));
        out.push_str(&format!(
            "pkg.type: {}\n",
            Document::escape_string(self.pkg_type.as_str())
        ));
        for (key, val) in [
            ("pkg.description", &self.desc.description),
            ("pkg.author", &self.desc.author),
            ("pkg.homepage", &self.desc.homepage),
        ] {
            if !val.is_empty() {
                out.push_str(&format!("{key}: {}\n", Document::escape_string(val)));
            }
        }

        out.push('\n');

        for key in SEQUENCE_KEYS {
            out.push_str(&self.sequence_block(key));
        }

        // Target variables live in the primary manifest as well.
        let target_vars: BTreeMap<String, String> = self
            .pkg_doc
            .all_settings_as_strings()
            .into_iter()
            .filter(|(k, _)| k.starts_with("target."))
            .collect();
        if !target_vars.is_empty() {
            out.push('\n');
            for (key, val) in target_vars {
                out.push_str(&format!("{key}: {}\n", Document::escape_string(&val)));
            }
        }

        fs::write(self.pkg_yaml_path(), out)?;
        Ok(())
    }

    /// Save the syscfg manifest, unfiltered.
    pub fn save_syscfg(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        self.syscfg_doc.write_whole()
    }

    /// Produce a copy of this package under `new_repo` with `new_name`.
    ///
    /// Both document handles are copied by value; mutating the clone never
    /// affects the source.  Inserting the clone into the destination
    /// repository's store is the caller's job.
    pub fn clone_with(&self, new_repo: Repo, new_name: &str) -> Package {
        let mut pkg = self.clone();
        pkg.name = new_name.to_string();
        pkg.base_path = normalize_path(&format!("{}/{new_name}", new_repo.path()));
        pkg.repo = new_repo;

        pkg.pkg_doc.set_path(pkg.pkg_yaml_path());
        pkg.syscfg_doc.set_path(pkg.syscfg_yaml_path());
        pkg.cfg_filenames = vec![pkg.pkg_yaml_path(), pkg.syscfg_yaml_path()];

        pkg
    }

    /// Init functions declared by the package: C function name to startup
    /// stage.  Stage values keep their manifest shape; the build layer
    /// interprets them.
    pub fn init_funcs(&self) -> BTreeMap<String, Value> {
        self.pkg_doc.get_value_map("pkg.init").unwrap_or_default()
    }

    /// Shutdown functions declared by the package: C function name to
    /// shutdown stage.
    pub fn down_funcs(&self) -> BTreeMap<String, String> {
        self.pkg_doc.get_string_map("pkg.down").unwrap_or_default()
    }

    pub fn pre_build_cmds(&self) -> BTreeMap<String, String> {
        self.pkg_doc
            .get_string_map("pkg.pre_build_cmds")
            .unwrap_or_default()
    }

    pub fn pre_link_cmds(&self) -> BTreeMap<String, String> {
        self.pkg_doc
            .get_string_map("pkg.pre_link_cmds")
            .unwrap_or_default()
    }

    pub fn post_link_cmds(&self) -> BTreeMap<String, String> {
        self.pkg_doc
            .get_string_map("pkg.post_link_cmds")
            .unwrap_or_default()
    }
}

impl PackageInfo for Package {
    fn name(&self) -> &str {
        &self.name
    }

    fn pkg_type(&self) -> PackageType {
        self.pkg_type
    }

    fn base_path(&self) -> &str {
        &self.base_path
    }

    fn repo(&self) -> &Repo {
        &self.repo
    }

    fn primary_doc(&self) -> &Document {
        &self.pkg_doc
    }

    fn syscfg_doc(&self) -> &Document {
        &self.syscfg_doc
    }
}

/// Load the package at `pkg_dir`, mapping any failure into a warning
/// message that names the ignored directory.
pub fn load_package(repo: &Repo, pkg_dir: &str) -> std::result::Result<Package, String> {
    let mut pkg = Package::new(repo.clone(), pkg_dir);
    match pkg.load() {
        Ok(()) => Ok(pkg),
        Err(err) => Err(format!("{err}; ignoring package {pkg_dir}")),
    }
}
