//! Integration tests for the on-disk `cemlog` container: replay on open,
//! corruption detection and cross-handle reads.

use std::fs;
use std::io::Write;

use cemsim_core::{DataLogger, Dataset, StorageError};
use cemsim_logger::codec::{encode_append, encode_create, encode_preamble};
use cemsim_logger::{BinaryLogger, StorageReader};
use cemsim_test_utils::sample_config;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────

fn write_raw(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = fs::File::create(&path).unwrap();
    f.write_all(bytes).unwrap();
    path
}

fn preamble() -> Vec<u8> {
    let mut buf = Vec::new();
    encode_preamble(&mut buf).unwrap();
    buf
}

// ── Tests ───────────────────────────────────────────────────────

#[test]
fn reader_sees_everything_the_logger_wrote() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.cem");
    let mut logger = BinaryLogger::new();
    logger.create_file(&path).unwrap();
    logger.write_header(&sample_config()).unwrap();
    for step in 0..5 {
        let e = vec![step as f64; 8];
        let h = vec![-(step as f64); 8];
        logger.write_data(&e, &Dataset::EField).unwrap();
        logger.write_data(&h, &Dataset::HField).unwrap();
    }

    // Readable by path while the logger still holds the file.
    let reader = StorageReader::open(&path).unwrap();
    assert_eq!(reader.header().unwrap().configuration, sample_config());
    assert_eq!(reader.datasets(), vec![Dataset::EField, Dataset::HField]);
    assert_eq!(reader.dataset_len(&Dataset::EField), Some(40));
    assert_eq!(reader.read_record(3, &Dataset::HField).unwrap(), vec![-3.0; 8]);
    assert_eq!(
        logger.read_record_from(&path, 4, &Dataset::EField).unwrap(),
        vec![4.0; 8]
    );
}

#[test]
fn interleaved_datasets_keep_their_own_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.cem");
    let mut logger = BinaryLogger::new();
    logger.create_file(&path).unwrap();
    let a = Dataset::Named("sensor/a".into());
    let b = Dataset::Named("/sensor/b".into());
    logger.write_data(&[1.0], &a).unwrap();
    logger.write_data(&[10.0, 20.0], &b).unwrap();
    logger.write_data(&[2.0, 3.0], &a).unwrap();
    logger.write_data(&[30.0, 40.0], &b).unwrap();
    logger.close().unwrap();

    let reader = StorageReader::open(&path).unwrap();
    assert_eq!(reader.read_vector(&a).unwrap(), vec![1.0, 2.0, 3.0]);
    assert_eq!(reader.read_vector(&b).unwrap(), vec![10.0, 20.0, 30.0, 40.0]);
    // Record length comes from the first write.
    assert_eq!(reader.record_count(&a), Some(3));
    assert_eq!(reader.record_count(&b), Some(2));
}

#[test]
fn missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = StorageReader::open(&dir.path().join("nope.cem")).unwrap_err();
    assert!(matches!(err, StorageError::FileNotFound { .. }));
    assert!(err.is_not_found());
}

#[test]
fn foreign_file_is_invalid_magic() {
    let dir = TempDir::new().unwrap();
    let path = write_raw(&dir, "notes.txt", b"hello world");
    assert!(matches!(
        StorageReader::open(&path),
        Err(StorageError::InvalidMagic)
    ));
}

#[test]
fn truncated_tail_is_malformed() {
    let dir = TempDir::new().unwrap();
    let mut bytes = preamble();
    encode_create(&mut bytes, "/EField", 4).unwrap();
    encode_append(&mut bytes, "/EField", 0, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    bytes.truncate(bytes.len() - 3);
    let path = write_raw(&dir, "cut.cem", &bytes);
    match StorageReader::open(&path) {
        Err(StorageError::MalformedRecord { detail }) => assert!(detail.contains("truncated")),
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn offset_gap_is_malformed() {
    let dir = TempDir::new().unwrap();
    let mut bytes = preamble();
    encode_create(&mut bytes, "/EField", 2).unwrap();
    encode_append(&mut bytes, "/EField", 0, &[1.0, 2.0]).unwrap();
    // Claims offset 4, but only two values precede it.
    encode_append(&mut bytes, "/EField", 4, &[3.0, 4.0]).unwrap();
    let path = write_raw(&dir, "gap.cem", &bytes);
    match StorageReader::open(&path) {
        Err(StorageError::MalformedRecord { detail }) => assert!(detail.contains("offset 4")),
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn header_missing_is_reported_but_data_readable() {
    let dir = TempDir::new().unwrap();
    let mut bytes = preamble();
    encode_create(&mut bytes, "/HField", 1).unwrap();
    encode_append(&mut bytes, "/HField", 0, &[7.5]).unwrap();
    let path = write_raw(&dir, "headless.cem", &bytes);
    let reader = StorageReader::open(&path).unwrap();
    assert!(matches!(reader.header(), Err(StorageError::HeaderMissing)));
    assert_eq!(reader.read_vector(&Dataset::HField).unwrap(), vec![7.5]);
}

#[test]
fn create_file_truncates_existing_container() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.cem");
    let mut logger = BinaryLogger::new();
    logger.create_file(&path).unwrap();
    logger.write_data(&[1.0; 16], &Dataset::EField).unwrap();
    logger.close().unwrap();

    let mut logger = BinaryLogger::new();
    logger.create_file(&path).unwrap();
    assert!(logger.datasets().is_empty());
    assert_eq!(fs::metadata(&path).unwrap().len(), 5);
}
