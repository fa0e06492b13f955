// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

//! One-time warnings for best-effort manifest reads.
//!
//! Malformed optional fields (author, keywords, a mistyped flag list) are
//! not fatal; they are reported once per distinct message and the read
//! proceeds as if the field were absent.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Mutex;

static EMITTED: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Log `message` at warn level the first time it is seen; repeats are
/// dropped for the remainder of the process.
pub fn warn_once(message: &str) {
    let mut emitted = EMITTED.lock().unwrap();
    if emitted.insert(message.to_string()) {
        tracing::warn!("{}", message);
    }
}

/// Clear the emitted-warning registry (used in tests).
pub fn clear_warn_once_cache() {
    let mut emitted = EMITTED.lock().unwrap();
    emitted.clear();
}
