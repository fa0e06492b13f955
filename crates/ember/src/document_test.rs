// Copyright (c) Contributors to the Ember project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use tempfile::TempDir;

use super::*;

fn write_doc(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write manifest");
    path
}

#[rstest]
fn test_read_file_missing() {
    let tmp = TempDir::new().unwrap();
    let result = Document::read_file(&tmp.path().join("pkg.yml"));

    match result {
        Err(Error::ManifestNotFound { .. }) => {}
        other => panic!("Expected ManifestNotFound, got: {:?}", other),
    }
}

#[rstest]
fn test_read_file_invalid_yaml() {
    let tmp = TempDir::new().unwrap();
    let path = write_doc(tmp.path(), "pkg.yml", "pkg.name: [unclosed\n");

    match Document::read_file(&path) {
        Err(Error::InvalidYaml { .. }) => {}
        other => panic!("Expected InvalidYaml, got: {:?}", other),
    }
}

#[rstest]
fn test_read_file_non_mapping_root() {
    let tmp = TempDir::new().unwrap();
    let path = write_doc(tmp.path(), "pkg.yml", "- just\n- a\n- list\n");

    match Document::read_file(&path) {
        Err(Error::InvalidManifest { .. }) => {}
        other => panic!("Expected InvalidManifest, got: {:?}", other),
    }
}

#[rstest]
fn test_empty_file_reads_as_empty_document() {
    let tmp = TempDir::new().unwrap();
    let path = write_doc(tmp.path(), "syscfg.yml", "");

    let doc = Document::read_file(&path).unwrap();
    assert!(doc.is_empty());
}

#[rstest]
fn test_typed_getters() {
    let tmp = TempDir::new().unwrap();
    let path = write_doc(
        tmp.path(),
        "pkg.yml",
        r#"
pkg.name: foo
pkg.subpriority: 3
pkg.cflags:
    - -O2
    - -DX
syscfg.vals:
    LOG_LEVEL: 3
    DEBUG: "1"
"#,
    );

    let doc = Document::read_file(&path).unwrap();
    assert_eq!(doc.get_string("pkg.name"), Some("foo".to_string()));
    assert_eq!(doc.get_int("pkg.subpriority"), Some(3));
    assert_eq!(
        doc.get_string_list("pkg.cflags"),
        Some(vec!["-O2".to_string(), "-DX".to_string()])
    );

    let vals = doc.get_string_map("syscfg.vals").unwrap();
    assert_eq!(vals.get("LOG_LEVEL"), Some(&"3".to_string()));
    assert_eq!(vals.get("DEBUG"), Some(&"1".to_string()));
}

#[rstest]
fn test_get_string_coerces_numbers() {
    let tmp = TempDir::new().unwrap();
    let path = write_doc(tmp.path(), "pkg.yml", "pkg.subpriority: 3\n");

    let doc = Document::read_file(&path).unwrap();
    assert_eq!(doc.get_string("pkg.subpriority"), Some("3".to_string()));
}

#[rstest]
fn test_get_string_list_accepts_lone_scalar() {
    let tmp = TempDir::new().unwrap();
    let path = write_doc(tmp.path(), "pkg.yml", "pkg.deps: sys/log\n");

    let doc = Document::read_file(&path).unwrap();
    assert_eq!(
        doc.get_string_list("pkg.deps"),
        Some(vec!["sys/log".to_string()])
    );
}

#[rstest]
fn test_wrong_shape_reads_as_missing() {
    crate::warn::clear_warn_once_cache();

    let tmp = TempDir::new().unwrap();
    let path = write_doc(
        tmp.path(),
        "pkg.yml",
        "pkg.name:\n    - not\n    - scalar\npkg.cflags:\n    key: val\n",
    );

    let doc = Document::read_file(&path).unwrap();
    assert_eq!(doc.get_string("pkg.name"), None);
    assert_eq!(doc.get_string_list("pkg.cflags"), None);
}

#[rstest]
fn test_replace_and_delete() {
    let mut doc = Document::new("/tmp/pkg.yml");
    doc.replace_string("target.app", "apps/blinky");
    assert_eq!(doc.get_string("target.app"), Some("apps/blinky".to_string()));

    doc.replace_string("target.app", "apps/boot");
    assert_eq!(doc.get_string("target.app"), Some("apps/boot".to_string()));

    doc.delete("target.app");
    assert_eq!(doc.get_string("target.app"), None);
}

#[rstest]
fn test_clear() {
    let mut doc = Document::new("/tmp/syscfg.yml");
    doc.replace_string("syscfg.logcfg", "x");
    doc.replace_string_map(
        "syscfg.vals",
        BTreeMap::from([("A".to_string(), "1".to_string())]),
    );

    doc.clear();
    assert!(doc.is_empty());
}

#[rstest]
fn test_yaml_round_trip() {
    let tmp = TempDir::new().unwrap();

    let mut doc = Document::new(tmp.path().join("syscfg.yml"));
    doc.replace_string_map(
        "syscfg.vals",
        BTreeMap::from([
            ("DEBUG".to_string(), "0".to_string()),
            ("LOG_LEVEL".to_string(), "3".to_string()),
        ]),
    );
    doc.write_whole().unwrap();

    let reread = Document::read_file(doc.path()).unwrap();
    assert_eq!(
        reread.get_string_map("syscfg.vals"),
        doc.get_string_map("syscfg.vals")
    );
}

#[rstest]
#[case("my_t")]
#[case("")]
#[case("3")]
#[case("true")]
#[case("-O2")]
#[case("a: b")]
#[case("line1\nline2")]
fn test_escape_string_round_trips(#[case] input: &str) {
    let escaped = Document::escape_string(input);

    // The escaped form must stay on one line and parse back to the
    // original string.
    assert!(!escaped.contains('\n'));
    let parsed: Value = serde_yaml::from_str(&escaped).expect("escaped scalar must parse");
    assert_eq!(parsed, Value::String(input.to_string()));
}

#[rstest]
fn test_all_settings_as_strings_skips_containers() {
    let tmp = TempDir::new().unwrap();
    let path = write_doc(
        tmp.path(),
        "pkg.yml",
        "pkg.name: foo\ntarget.bsp: hw/bsp/x\npkg.cflags:\n    - -O2\n",
    );

    let doc = Document::read_file(&path).unwrap();
    let settings = doc.all_settings_as_strings();
    assert_eq!(settings.get("pkg.name"), Some(&"foo".to_string()));
    assert_eq!(settings.get("target.bsp"), Some(&"hw/bsp/x".to_string()));
    assert!(!settings.contains_key("pkg.cflags"));
}
