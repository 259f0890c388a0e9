#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::io::Write;
use std::path::Path;

use common::{me_and_he, person};
use sdiffer_core::profile::{parse_profile_file, parse_profile_str};
use sdiffer_core::{DiffError, Differ, ExErrorKind};
use tempfile::NamedTempFile;

fn write_profile(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_profile_file_drives_comparison() {
    // GIVEN a profile ignoring the location and trimming names
    let file = write_profile(
        r#"
schema_version: 0
template: "{}: {} -> {}"
ignore: ['^Person\.Loc$', 'Parents']
trim_space: ['Person\.Name']
"#,
    );
    let profile = parse_profile_file(file.path()).unwrap();

    // WHEN applied and used
    let (mut me, he) = me_and_he();
    me.name = " kxc ".into();
    let mut differ = Differ::new();
    differ.apply_profile(&profile).unwrap();
    differ.compare(&me, &he).unwrap();

    // THEN the report reflects every setting
    assert_eq!(
        differ.render(),
        "Person.Age: 20 -> 21\nPerson.StrArr[0]: hello -> world\nPerson.StrArr[1]: world -> hello\n"
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let err = parse_profile_file(Path::new("/nonexistent/sdiffer/profile.yaml")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Io);
    assert_eq!(err.op(), Some("parse_profile_file"));
    assert!(err.path().is_some());
}

#[test]
fn test_malformed_file_is_invalid_profile() {
    let file = write_profile("schema_version: [\n");
    let err = parse_profile_file(file.path()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidProfile);
}

#[test]
fn test_profile_depth_and_cutset() {
    let profile = parse_profile_str(
        r#"
schema_version: 0
max_depth: 2
trim:
  - path: 'Person\.Name'
    cutset: "*"
"#,
    )
    .unwrap();

    let mut differ = Differ::new();
    differ.apply_profile(&profile).unwrap();
    assert_eq!(differ.max_depth(), 2);

    differ.compare(&person("**a", 1), &person("a*", 1)).unwrap();
    assert!(differ.diffs().is_empty());

    let (me, he) = me_and_he();
    let err = differ.compare(&me, &he).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DepthExceeded);
}

#[test]
fn test_include_profile_overrides_ignore() {
    let profile = parse_profile_str(
        r#"
schema_version: 0
ignore: ['Person\.Name']
include: ['Person\.Name']
"#,
    )
    .unwrap();

    let (me, he) = me_and_he();
    let mut differ = Differ::new();
    differ.apply_profile(&profile).unwrap();
    differ.compare(&me, &he).unwrap();

    assert_eq!(differ.diffs().len(), 1);
    assert_eq!(differ.diffs()[0].path(), "Person.Name");
}

#[test]
fn test_rejected_profile_changes_nothing() {
    let mut profile = parse_profile_str("schema_version: 0\nmax_depth: 5\n").unwrap();
    profile.ignore = vec!["(".to_string()];

    let mut differ = Differ::new();
    let err = differ.apply_profile(&profile).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidProfile);
    assert_eq!(differ.max_depth(), sdiffer_core::DEFAULT_MAX_DEPTH);
}

#[test]
fn test_zero_depth_profile_matches_builder() {
    // GIVEN a zero depth set once through a profile and once through the builder
    let profile = parse_profile_str("schema_version: 0\nmax_depth: 0\n").unwrap();
    let mut from_profile = Differ::new();
    from_profile.apply_profile(&profile).unwrap();
    let mut from_builder = Differ::new();
    from_builder.with_max_depth(0);

    for differ in [&mut from_profile, &mut from_builder] {
        // WHEN comparing a root leaf and a struct
        differ.compare(&1i32, &2i32).unwrap();
        let leaf_diffs = differ.diffs().len();
        let err = differ.compare(&person("a", 1), &person("b", 1)).unwrap_err();

        // THEN the leaf compares and the struct field trips the limit
        assert_eq!(leaf_diffs, 1);
        assert!(matches!(err, DiffError::DepthExceeded { max_depth: 0, .. }));
    }
}
