// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! Wire format for syscfg assignments.
//!
//! Command line and display share one string encoding for system
//! configuration overrides: `NAME1=value1:NAME2=value2`.  A bare `NAME`
//! decodes with an empty value, which is how deletions are spelled.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

#[cfg(test)]
#[path = "./syscfg_test.rs"]
mod syscfg_test;

/// Decode a `k1=v1:k2=v2` string into name-value pairs.
///
/// The input is trimmed, empty entries are skipped, and each entry splits
/// on its first `=`.  An empty string decodes to the empty map.
pub fn kv_pairs_from_str(s: &str) -> Result<BTreeMap<String, String>> {
    let mut vals = BTreeMap::new();

    let s = s.trim();
    if s.is_empty() {
        return Ok(vals);
    }

    for entry in s.split(':') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let (k, v) = match entry.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (entry, ""),
        };
        if k.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "Invalid syscfg entry \"{entry}\": missing setting name"
            )));
        }

        vals.insert(k.to_string(), v.to_string());
    }

    Ok(vals)
}

/// Encode name-value pairs as `k1=v1:k2=v2` with keys in sorted order.
///
/// Names and values containing `=` or `:` cannot be represented and are
/// rejected.
pub fn kv_pairs_to_str(vals: &BTreeMap<String, String>) -> Result<String> {
    let mut parts = Vec::with_capacity(vals.len());
    for (k, v) in vals {
        if k.contains(['=', ':']) || v.contains(['=', ':']) {
            return Err(Error::InvalidArgument(format!(
                "syscfg setting \"{k}\" cannot be encoded: names and values must not contain '=' or ':'"
            )));
        }
        parts.push(format!("{k}={v}"));
    }
    Ok(parts.join(":"))
}
