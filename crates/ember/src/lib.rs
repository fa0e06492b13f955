// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! ember - Package and Target Model
//!
//! This crate provides the core package model for the ember embedded-firmware
//! build tool: recursive discovery of packages across a project's
//! repositories, layered manifest parsing, and the mutation engine behind
//! build targets.
//!
//! # Overview
//!
//! A project is a directory tree containing many small packages.  Each
//! package is a directory with a primary manifest (`pkg.yml`) and an
//! optional system-configuration manifest (`syscfg.yml`).  A *target* is a
//! package of type `target` whose manifests select an application, a board
//! support package, a build profile, compiler flags, and syscfg overrides
//! for one concrete build.
//!
//! # Example
//!
//! ```yaml
//! # pkg.yml
//! pkg.name: my_blinky_nrf52
//! pkg.type: target
//!
//! pkg.cflags:
//!     - -O2
//!     - -DNDEBUG
//!
//! target.app: apps/blinky
//! target.bsp: hw/bsp/nrf52dk
//! target.build_profile: optimized
//! ```
//!
//! Front-end concerns (argument parsing, prompts, dependency resolution,
//! build orchestration) live outside this crate; they consume the types
//! exported here.

pub mod discovery;
pub mod document;
pub mod error;
pub mod package;
pub mod paths;
pub mod project;
pub mod repository;
pub mod syscfg;
pub mod target;
pub mod vars;
pub mod warn;

pub use discovery::{read_packages, PackageMap};
pub use document::Document;
pub use error::{Error, Result};
pub use package::{Package, PackageDesc, PackageInfo, PackageType, Settings, SUBPRIORITY_LIMIT};
pub use project::Project;
pub use repository::Repo;
pub use target::Target;
pub use vars::TargetVar;

/// Well-known filename for primary package manifests.
pub const PACKAGE_FILENAME: &str = "pkg.yml";

/// Well-known filename for system-configuration manifests.
pub const SYSCFG_FILENAME: &str = "syscfg.yml";

/// Well-known filename for the target-specific file.  Its contents are
/// owned by the build layer; this crate only needs the name to recognize
/// tool-owned files inside a target directory.
pub const TARGET_FILENAME: &str = "target.yml";
