// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for ember operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with ember Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during package and target operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Primary manifest not found where a package was expected
    #[error("No manifest found at {path:?}")]
    #[diagnostic(
        code(ember::manifest_not_found),
        help("Every package directory must contain a pkg.yml file")
    )]
    ManifestNotFound { path: PathBuf },

    /// Failed to read a manifest file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(ember::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Manifest is not syntactically valid YAML
    #[error("Invalid manifest {path:?}: {error}")]
    #[diagnostic(
        code(ember::invalid_yaml),
        help("Check the YAML syntax of the manifest file")
    )]
    InvalidYaml {
        path: PathBuf,
        #[source]
        error: serde_yaml::Error,
    },

    /// Manifest parsed, but a field violates a semantic rule
    #[error("Invalid manifest {path:?}: {reason}")]
    #[diagnostic(code(ember::invalid_manifest))]
    InvalidManifest { path: PathBuf, reason: String },

    /// Package name missing or inconsistent with the package directory
    #[error("Package {path:?} has an invalid identity: {reason}")]
    #[diagnostic(
        code(ember::invalid_identity),
        help("pkg.name must be non-empty and match the trailing segments of the package directory")
    )]
    InvalidIdentity { path: PathBuf, reason: String },

    /// User-supplied variable name or value rejected
    #[error("{0}")]
    #[diagnostic(code(ember::invalid_argument))]
    InvalidArgument(String),

    /// Named target does not exist in the project
    #[error("Unknown target: {0}")]
    #[diagnostic(
        code(ember::unknown_target),
        help("Check the target name against the project's target list")
    )]
    UnknownTarget(String),

    /// Target directory holds content beyond the tool-owned files
    #[error("Target directory {path:?} contains extra content")]
    #[diagnostic(
        code(ember::target_not_empty),
        help("Re-run the deletion with force to remove the directory anyway")
    )]
    TargetNotEmpty { path: PathBuf },

    /// Two packages in one repository share a pkg.name.  Never returned
    /// from an operation; used to format scan warnings.
    #[error("Multiple packages with same pkg.name={name} in repo {repo}; path1={path1} path2={path2}")]
    #[diagnostic(code(ember::duplicate_package))]
    DuplicatePackage {
        name: String,
        repo: String,
        path1: String,
        path2: String,
    },

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(ember::io_error))]
    Io(#[from] std::io::Error),
}
