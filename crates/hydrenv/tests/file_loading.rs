//! Plain `key=value` file loading tests.

#![allow(clippy::pedantic)]
#![allow(non_snake_case)]

use std::io::Write;
use std::path::PathBuf;

use hydrenv::{CoerceError, Error, Hydrate, IntegerError, Loader};
use tempfile::TempDir;

#[derive(Debug, Default, PartialEq, Hydrate)]
struct TestConfig {
    #[env(key = "TEST_NAME")]
    name: String,

    #[env(key = "TEST_BOOL")]
    flag: bool,

    #[env(key = "TEST_INT")]
    int: i64,

    #[env(key = "TEST_UINT")]
    uint: u64,

    #[env(key = "TEST_BYTE_SLICE")]
    data: Vec<u8>,

    #[allow(non_snake_case)]
    DefaultKey: String,
}

struct Files {
    dir: TempDir,
}

impl Files {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_ref()).unwrap();
        path
    }
}

// ============================================================================
// Override Chain
// ============================================================================

#[test]
fn test_two_files_in_order() {
    let files = Files::new();
    let a = files.write(
        "a.env",
        "TEST_NAME=test\nTEST_BOOL=true\nTEST_INT=-42\nTEST_UINT=10",
    );
    let b = files.write(
        "b.env",
        "TEST_UINT=42\nTEST_BYTE_SLICE=bytes\nDefaultKey=default",
    );

    let config = TestConfig::from_files([&a, &b]).expect("should load both files");

    assert_eq!(
        config,
        TestConfig {
            name: "test".into(),
            flag: true,
            int: -42,
            uint: 42,
            data: b"bytes".to_vec(),
            DefaultKey: "default".into(),
        }
    );
}

#[test]
fn test_reverse_order_changes_winner() {
    let files = Files::new();
    let a = files.write("a.env", "TEST_UINT=10\n");
    let b = files.write("b.env", "TEST_UINT=42\n");

    let config: TestConfig = hydrenv::from_files([&b, &a]).unwrap();
    assert_eq!(config.uint, 10);
}

#[test]
fn test_duplicate_key_in_one_file_last_wins() {
    let files = Files::new();
    let path = files.write("dup.env", "TEST_NAME=first\nTEST_NAME=second\n");

    let config = TestConfig::from_files([path]).unwrap();
    assert_eq!(config.name, "second");
}

#[test]
fn test_apply_files_keeps_existing_values() {
    let files = Files::new();
    let path = files.write("partial.env", "TEST_INT=7\n");

    let mut config = TestConfig {
        name: "preset".into(),
        uint: 99,
        ..TestConfig::default()
    };

    config.apply_files([path]).unwrap();

    assert_eq!(config.name, "preset");
    assert_eq!(config.uint, 99);
    assert_eq!(config.int, 7);
}

#[test]
fn test_empty_path_list_is_noop() {
    let mut config = TestConfig {
        int: 3,
        ..TestConfig::default()
    };

    hydrenv::apply_files(&mut config, Vec::<PathBuf>::new()).unwrap();
    assert_eq!(config.int, 3);
}

// ============================================================================
// Line Handling
// ============================================================================

#[test]
fn test_lines_without_equals_ignored() {
    let files = Files::new();
    let path = files.write(
        "noise.env",
        "# a comment without equals\n\nTEST_NAME=kept\njust some words\n",
    );

    let config = TestConfig::from_files([path]).unwrap();
    assert_eq!(config.name, "kept");
}

#[test]
fn test_whitespace_and_crlf_trimmed() {
    let files = Files::new();
    let path = files.write("crlf.env", "  TEST_NAME =\t spaced out \r\nTEST_BOOL= on\r\n");

    let config = TestConfig::from_files([path]).unwrap();
    assert_eq!(config.name, "spaced out");
    assert!(config.flag);
}

#[test]
fn test_unknown_keys_ignored() {
    let files = Files::new();
    let path = files.write("extra.env", "SOMETHING_ELSE=1\nTEST_INT=5\n");

    let config = TestConfig::from_files([path]).unwrap();
    assert_eq!(config.int, 5);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_invalid_integer_halts_processing() {
    let files = Files::new();
    let a = files.write("a.env", "TEST_NAME=before\nTEST_INT=abc\nTEST_BOOL=true\n");
    let b = files.write("b.env", "TEST_UINT=42\n");

    let mut config = TestConfig::default();
    let err = config.apply_files([&a, &b]).unwrap_err();

    match &err {
        Error::File {
            target,
            path,
            line,
            source,
            ..
        } => {
            assert_eq!(*target, "TestConfig");
            assert_eq!(path, &a);
            assert_eq!(*line, Some(2));
            assert!(matches!(
                source,
                CoerceError::InvalidInteger {
                    field: "int",
                    type_name: "i64",
                    source: IntegerError::Parse(_),
                    ..
                }
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(config.name, "before");
    assert!(!config.flag, "later lines are not applied");
    assert_eq!(config.uint, 0, "later files are not applied");
}

#[test]
fn test_invalid_bool_names_field_and_value() {
    let files = Files::new();
    let path = files.write("bool.env", "TEST_BOOL=maybe\n");

    let err = TestConfig::from_files([path]).unwrap_err();
    let source = err.coerce_error().expect("value error").to_string();

    assert!(source.contains("flag"));
    assert!(source.contains("\"maybe\""));
}

#[test]
fn test_missing_file_aborts_sequence() {
    let files = Files::new();
    let missing = files.dir.path().join("missing.env");
    let later = files.write("later.env", "TEST_NAME=never\n");

    let mut config = TestConfig::default();
    let err = config.apply_files([&missing, &later]).unwrap_err();

    assert!(matches!(err, Error::NotFound { ref path } if path == &missing));
    assert_eq!(config.name, "");
}

#[test]
fn test_invalid_utf8_is_read_error() {
    let files = Files::new();
    let path = files.write("binary.env", [b'T', b'=', 0xc3, 0x28]);

    let err = TestConfig::from_files([&path]).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
    assert_eq!(err.path(), Some(path.as_path()));
}

#[test]
fn test_directory_is_read_error() {
    let files = Files::new();

    let err = TestConfig::from_files([files.dir.path()]).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}

// ============================================================================
// Unsupported Fields
// ============================================================================

#[derive(Debug, Default, Hydrate)]
struct Mixed {
    #[env(key = "RATIO")]
    ratio: f64,

    #[env(key = "NAMES")]
    names: Vec<String>,

    #[env(key = "NAME")]
    name: String,
}

#[test]
fn test_unsupported_type_skipped_by_default() {
    let files = Files::new();
    let path = files.write("mixed.env", "RATIO=0.5\nNAME=after\n");

    let mixed = Mixed::from_files([path]).unwrap();
    assert_eq!(mixed.ratio, 0.0);
    assert_eq!(mixed.name, "after");
}

#[test]
fn test_unsupported_type_rejected_when_strict() {
    let files = Files::new();
    let path = files.write("mixed.env", "RATIO=0.5\n");

    let err = Loader::new()
        .strict(true)
        .file(&path)
        .load::<Mixed>()
        .unwrap_err();

    assert!(matches!(
        err.coerce_error(),
        Some(CoerceError::Unsupported {
            field: "ratio",
            type_name: "f64"
        })
    ));
}

#[test]
fn test_non_byte_sequence_always_rejected() {
    let files = Files::new();
    let path = files.write("names.env", "NAMES=a,b\n");

    let err = Mixed::from_files([path]).unwrap_err();
    let message = err.coerce_error().unwrap().to_string();

    assert!(message.contains("only byte sequences are supported"));
}

#[test]
fn test_non_byte_sequence_without_value_is_fine() {
    let files = Files::new();
    let path = files.write("name.env", "NAME=x\n");

    let mixed = Mixed::from_files([path]).unwrap();
    assert!(mixed.names.is_empty());
}
