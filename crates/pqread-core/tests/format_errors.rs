use parquet::file::properties::WriterProperties;
use pqread_core::*;

use test_helpers::*;

#[test]
fn test_unsupported_version_fails_at_open() {
    let file = write_file(&[sequential_batch(3)]);
    set_footer_version(&file, 7);

    let err = open(file.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::Format(FormatError::UnsupportedVersion(7))
    ));
    assert_eq!(err.to_string(), "unsupported format version 7");
}

#[test]
fn test_both_known_versions_accepted() {
    for version in [1, 2] {
        let file = write_file(&[sequential_batch(3)]);
        set_footer_version(&file, version);

        let mut handle = open(file.path()).unwrap();
        assert_eq!(handle.metadata().version, version);
        assert_eq!(handle.read_all().unwrap().len(), 3);
    }
}

#[test]
fn test_undecodable_embedded_schema_is_corrupt() {
    let file = write_file(&[sequential_batch(3)]);
    set_footer_key_value(&file, "ARROW:schema", "!!!");

    match open(file.path()) {
        Err(Error::Format(FormatError::CorruptSchema(message))) => {
            assert!(!message.is_empty());
        }
        other => panic!("expected a corrupt schema error, got {:?}", other),
    }
}

#[test]
fn test_decoder_running_dry_is_truncation() {
    let file = write_file(&[sequential_batch(10)]);
    set_footer_row_count(&file, 15);

    let mut handle = open(file.path()).unwrap();
    assert_eq!(handle.row_count(), 15);

    for expected in 0..10 {
        let record = handle.read_next().unwrap().unwrap();
        assert_eq!(record.get("id"), Some(&Value::Int64(expected)));
    }

    match handle.read_next() {
        Err(Error::Read(ReadError::TruncatedData { row, .. })) => assert_eq!(row, 10),
        other => panic!("expected truncated data, got {:?}", other),
    }
    assert_eq!(handle.position(), 10);

    // Poisoned: the same error comes back
    assert!(matches!(
        handle.read_next(),
        Err(Error::Read(ReadError::TruncatedData { row: 10, .. }))
    ));
}

#[test]
fn test_truncated_column_chunk() {
    let props = WriterProperties::builder()
        .set_dictionary_enabled(false)
        .build();
    let file = write_file_with_properties(&[sequential_batch(2000)], props);
    truncate_column_data(&file);

    // The footer still parses, so the damage shows up on the first read
    let mut handle = open(file.path()).unwrap();
    assert_eq!(handle.row_count(), 2000);

    match handle.read_next() {
        Err(Error::Read(ReadError::TruncatedData { row, message })) => {
            assert_eq!(row, 0);
            assert!(message.contains("EOF"), "{}", message);
        }
        other => panic!("expected truncated data, got {:?}", other),
    }
    assert_eq!(handle.position(), 0);
    handle.close();
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_permission_denied() {
    use std::fs::{self, File, Permissions};
    use std::os::unix::fs::PermissionsExt;

    let file = write_file(&[sequential_batch(1)]);
    fs::set_permissions(file.path(), Permissions::from_mode(0o000)).unwrap();

    // Privileged users bypass mode bits; nothing to check then
    if File::open(file.path()).is_ok() {
        return;
    }

    match open(file.path()) {
        Err(Error::Open(OpenError::PermissionDenied(path))) => assert_eq!(path, file.path()),
        other => panic!("expected permission denied, got {:?}", other),
    }
}
