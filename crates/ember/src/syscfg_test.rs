// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[rstest]
fn test_decode_pairs() {
    let vals = kv_pairs_from_str("LOG_LEVEL=3:DEBUG=1").unwrap();
    assert_eq!(vals.len(), 2);
    assert_eq!(vals.get("LOG_LEVEL"), Some(&"3".to_string()));
    assert_eq!(vals.get("DEBUG"), Some(&"1".to_string()));
}

#[rstest]
fn test_decode_empty_is_empty_map() {
    assert!(kv_pairs_from_str("").unwrap().is_empty());
    assert!(kv_pairs_from_str("   ").unwrap().is_empty());
}

#[rstest]
fn test_decode_bare_name_has_empty_value() {
    // Deletion syntax: `syscfg=CONFIG_A` names a setting with no value.
    let vals = kv_pairs_from_str("CONFIG_A:CONFIG_B=1").unwrap();
    assert_eq!(vals.get("CONFIG_A"), Some(&"".to_string()));
    assert_eq!(vals.get("CONFIG_B"), Some(&"1".to_string()));
}

#[rstest]
fn test_decode_trims_whitespace() {
    let vals = kv_pairs_from_str(" A = 1 : B = 2 ").unwrap();
    assert_eq!(vals.get("A"), Some(&"1".to_string()));
    assert_eq!(vals.get("B"), Some(&"2".to_string()));
}

#[rstest]
fn test_decode_skips_empty_entries() {
    let vals = kv_pairs_from_str("A=1::B=2:").unwrap();
    assert_eq!(vals.len(), 2);
}

#[rstest]
fn test_decode_rejects_missing_name() {
    let result = kv_pairs_from_str("=1");
    match result {
        Err(Error::InvalidArgument(_)) => {}
        other => panic!("Expected InvalidArgument, got: {:?}", other),
    }
}

#[rstest]
fn test_decode_value_keeps_later_equals() {
    let vals = kv_pairs_from_str("FLAGS=a=b").unwrap();
    assert_eq!(vals.get("FLAGS"), Some(&"a=b".to_string()));
}

#[rstest]
fn test_encode_sorts_names() {
    let vals = BTreeMap::from([
        ("LOG_LEVEL".to_string(), "3".to_string()),
        ("DEBUG".to_string(), "1".to_string()),
    ]);
    assert_eq!(kv_pairs_to_str(&vals).unwrap(), "DEBUG=1:LOG_LEVEL=3");
}

#[rstest]
fn test_encode_empty_map() {
    assert_eq!(kv_pairs_to_str(&BTreeMap::new()).unwrap(), "");
}

#[rstest]
fn test_encode_rejects_separators() {
    let vals = BTreeMap::from([("A".to_string(), "x:y".to_string())]);
    match kv_pairs_to_str(&vals) {
        Err(Error::InvalidArgument(_)) => {}
        other => panic!("Expected InvalidArgument, got: {:?}", other),
    }

    let vals = BTreeMap::from([("A=B".to_string(), "1".to_string())]);
    assert!(kv_pairs_to_str(&vals).is_err());
}
