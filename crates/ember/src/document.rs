// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! Structured manifest documents.
//!
//! A [`Document`] is the in-memory form of one manifest file: a YAML
//! mapping whose top-level keys are literal dotted names (`pkg.name`,
//! `target.bsp`, `syscfg.vals`).  It offers typed reads, whole-key
//! replacement, and reserialization.  A value that is present but has the
//! wrong shape reads as missing after a one-time warning; manifests are
//! user-edited files and a stray scalar must not take the tool down.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::warn::warn_once;

#[cfg(test)]
#[path = "./document_test.rs"]
mod document_test;

/// One loaded manifest file.
#[derive(Debug, Clone, Default)]
pub struct Document {
    path: PathBuf,
    root: Mapping,
}

impl Document {
    /// Create an empty document associated with `path`.  Nothing is read
    /// from disk.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            root: Mapping::new(),
        }
    }

    /// Read and parse the manifest at `path`.
    ///
    /// A missing file is [`Error::ManifestNotFound`]; the caller decides
    /// whether that is fatal (primary manifest) or normal (syscfg).
    pub fn read_file(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ManifestNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(error) => {
                return Err(Error::ReadFailed {
                    path: path.to_path_buf(),
                    error,
                });
            }
        };

        let value: Value = serde_yaml::from_str(&text).map_err(|error| Error::InvalidYaml {
            path: path.to_path_buf(),
            error,
        })?;

        let root = match value {
            Value::Null => Mapping::new(),
            Value::Mapping(mapping) => mapping,
            _ => {
                return Err(Error::InvalidManifest {
                    path: path.to_path_buf(),
                    reason: "document root is not a mapping".to_string(),
                });
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    /// Path this document was read from or will be written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-associate the document with a new file path (used when cloning a
    /// package into a new directory).
    pub fn set_path<P: Into<PathBuf>>(&mut self, path: P) {
        self.path = path.into();
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(&Value::String(key.to_string()))
    }

    fn shape_warning(&self, key: &str, expected: &str) {
        warn_once(&format!(
            "{}: setting \"{}\" is not a {}",
            self.path.display(),
            key,
            expected
        ));
    }

    /// Read a scalar value as a string.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => match scalar_to_string(value) {
                Some(s) => Some(s),
                None => {
                    self.shape_warning(key, "string");
                    None
                }
            },
        }
    }

    /// Read a scalar value as an integer.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => Some(i),
                None => {
                    self.shape_warning(key, "integer");
                    None
                }
            },
            Some(Value::String(s)) => match s.trim().parse() {
                Ok(i) => Some(i),
                Err(_) => {
                    self.shape_warning(key, "integer");
                    None
                }
            },
            Some(_) => {
                self.shape_warning(key, "integer");
                None
            }
        }
    }

    /// Read a sequence of scalars as strings.  A lone scalar reads as a
    /// one-element list.
    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Sequence(seq)) => {
                let mut items = Vec::with_capacity(seq.len());
                for value in seq {
                    match scalar_to_string(value) {
                        Some(s) => items.push(s),
                        None => self.shape_warning(key, "list of strings"),
                    }
                }
                Some(items)
            }
            Some(value) => match scalar_to_string(value) {
                Some(s) => Some(vec![s]),
                None => {
                    self.shape_warning(key, "list of strings");
                    None
                }
            },
        }
    }

    /// Read a mapping of scalars as a string-to-string map.  A null value
    /// reads as the empty string so that `KEY:` entries stay visible.
    pub fn get_string_map(&self, key: &str) -> Option<BTreeMap<String, String>> {
        match self.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Mapping(mapping)) => {
                let mut map = BTreeMap::new();
                for (k, v) in mapping {
                    let k = match scalar_to_string(k) {
                        Some(k) => k,
                        None => {
                            self.shape_warning(key, "map of strings");
                            continue;
                        }
                    };
                    let v = match v {
                        Value::Null => String::new(),
                        v => match scalar_to_string(v) {
                            Some(v) => v,
                            None => {
                                self.shape_warning(key, "map of strings");
                                continue;
                            }
                        },
                    };
                    map.insert(k, v);
                }
                Some(map)
            }
            Some(_) => {
                self.shape_warning(key, "map of strings");
                None
            }
        }
    }

    /// Read a mapping whose values keep their manifest shape.  Used where
    /// a consumer interprets the values itself rather than as strings.
    pub fn get_value_map(&self, key: &str) -> Option<BTreeMap<String, Value>> {
        match self.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Mapping(mapping)) => {
                let mut map = BTreeMap::new();
                for (k, v) in mapping {
                    match scalar_to_string(k) {
                        Some(k) => {
                            map.insert(k, v.clone());
                        }
                        None => self.shape_warning(key, "map"),
                    }
                }
                Some(map)
            }
            Some(_) => {
                self.shape_warning(key, "map");
                None
            }
        }
    }

    /// Replace `key` with a scalar string value.
    pub fn replace_string(&mut self, key: &str, value: &str) {
        self.root.insert(
            Value::String(key.to_string()),
            Value::String(value.to_string()),
        );
    }

    /// Replace `key` with a native sequence of strings.
    pub fn replace_string_list<I>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        let seq = values.into_iter().map(Value::String).collect();
        self.root
            .insert(Value::String(key.to_string()), Value::Sequence(seq));
    }

    /// Replace `key` with a native mapping of strings.
    pub fn replace_string_map(&mut self, key: &str, values: BTreeMap<String, String>) {
        let mut mapping = Mapping::new();
        for (k, v) in values {
            mapping.insert(Value::String(k), Value::String(v));
        }
        self.root
            .insert(Value::String(key.to_string()), Value::Mapping(mapping));
    }

    /// Remove `key` from the document.
    pub fn delete(&mut self, key: &str) {
        self.root.remove(&Value::String(key.to_string()));
    }

    /// Remove every key from the document.
    pub fn clear(&mut self) {
        self.root.clear();
    }

    /// Reserialize the whole document.
    pub fn yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.root).map_err(|error| Error::InvalidYaml {
            path: self.path.clone(),
            error,
        })
    }

    /// Write the whole document to its path, creating parent directories
    /// as needed.
    pub fn write_whole(&self) -> Result<()> {
        let yaml = self.yaml()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Flat view of every scalar setting, for display.  Sequence and
    /// mapping values are skipped.
    pub fn all_settings_as_strings(&self) -> BTreeMap<String, String> {
        let mut settings = BTreeMap::new();
        for (k, v) in &self.root {
            if let (Some(k), Some(v)) = (k.as_str(), scalar_to_string(v)) {
                settings.insert(k.to_string(), v);
            }
        }
        settings
    }

    /// Escape a string for use as a YAML scalar in hand-assembled output.
    ///
    /// Quoting decisions are delegated to the YAML serializer so they
    /// match what the parser accepts; control characters take an explicit
    /// double-quoted path because the serializer may switch to a block
    /// scalar for them.
    pub fn escape_string(s: &str) -> String {
        if s.chars().any(char::is_control) {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('"');
            for c in s.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                    c => out.push(c),
                }
            }
            out.push('"');
            return out;
        }

        match serde_yaml::to_string(&Value::String(s.to_string())) {
            // The emitter may wrap long plain scalars; a quoted form keeps
            // the value on one line.
            Ok(yaml) if !yaml.trim_end_matches('\n').contains('\n') => {
                yaml.trim_end_matches('\n').to_string()
            }
            _ => format!("'{}'", s.replace('\'', "''")),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
