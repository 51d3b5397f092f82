// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata contributors

//! FileTransport state machine, chunked I/O, and resize behavior.

use strata::{FileTransport, OpenMode, RuntimeConfig, TransportError, CURRENT_POSITION};
use tempfile::TempDir;

const SMALL_BATCH: usize = 64;

fn small_batch_config() -> RuntimeConfig {
    RuntimeConfig::strict().with_max_batch_size(SMALL_BATCH)
}

fn temp_path(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

#[test]
fn test_chunked_round_trip_larger_than_batch() {
    let dir = TempDir::new().expect("tempdir");
    let path = temp_path(&dir, "chunked.bin");
    let config = small_batch_config();

    // Deliberately larger than the batch limit and not a multiple of it.
    let n = 3 * SMALL_BATCH + 17;
    let payload: Vec<u8> = (0..n).map(|i| (i % 251) as u8).collect();

    let mut writer = FileTransport::open(&path, OpenMode::Write, config).expect("open write");
    writer.write(&payload, 0).expect("write");
    writer.close().expect("close");

    let mut reader = FileTransport::open(&path, OpenMode::Read, config).expect("open read");
    assert_eq!(reader.size_on_disk().expect("stat"), n as u64);
    let mut back = vec![0_u8; n];
    reader.read(&mut back, 0).expect("read");
    reader.close().expect("close");

    assert_eq!(back, payload);
}

#[test]
fn test_write_at_absolute_offset() {
    let dir = TempDir::new().expect("tempdir");
    let path = temp_path(&dir, "offsets.bin");
    let config = small_batch_config();

    let mut writer = FileTransport::open(&path, OpenMode::Write, config).expect("open write");
    writer.write(&[0xAA; 16], 0).expect("write head");
    writer.write(&[0xBB; 16], 100).expect("write at offset");
    // Sentinel continues from the current position (offset 116).
    writer.write(&[0xCC; 4], CURRENT_POSITION).expect("append");
    writer.close().expect("close");

    let mut reader = FileTransport::open(&path, OpenMode::Read, config).expect("open read");
    assert_eq!(reader.size_on_disk().expect("stat"), 120);
    let mut back = vec![0_u8; 120];
    reader.read(&mut back, 0).expect("read");
    assert_eq!(&back[..16], &[0xAA; 16]);
    assert!(back[16..100].iter().all(|&b| b == 0), "hole reads as zeros");
    assert_eq!(&back[100..116], &[0xBB; 16]);
    assert_eq!(&back[116..], &[0xCC; 4]);
}

#[test]
fn test_resize_grow_and_shrink() {
    let dir = TempDir::new().expect("tempdir");
    let path = temp_path(&dir, "resize.bin");
    let config = small_batch_config();

    let mut transport = FileTransport::open(&path, OpenMode::Write, config).expect("open");
    assert_eq!(transport.size_on_disk().expect("stat"), 0);

    assert!(transport.resize(4096).expect("grow").is_none(), "not mapped");
    assert_eq!(transport.size_on_disk().expect("stat"), 4096);

    transport.resize(100).expect("shrink");
    assert_eq!(transport.size_on_disk().expect("stat"), 100);
    transport.close().expect("close");
}

#[test]
fn test_state_machine_rejections() {
    let dir = TempDir::new().expect("tempdir");
    let path = temp_path(&dir, "states.bin");
    let config = small_batch_config();

    // Seed a file so it can be opened read-only.
    let mut writer = FileTransport::open(&path, OpenMode::Write, config).expect("open write");
    writer.write(b"seed", 0).expect("write");
    writer.close().expect("close");

    let mut reader = FileTransport::open(&path, OpenMode::Read, config).expect("open read");
    assert!(matches!(
        reader.write(b"nope", 0),
        Err(TransportError::InvalidState { .. })
    ));
    assert!(matches!(
        reader.resize(10),
        Err(TransportError::InvalidState { .. })
    ));
    reader.close().expect("close");

    // Closed transports reject everything; close is idempotent.
    assert!(matches!(
        reader.read(&mut [0_u8; 1], 0),
        Err(TransportError::InvalidState { .. })
    ));
    reader.close().expect("second close is a no-op");
}

#[test]
fn test_debug_rendering_names_path_and_state() {
    let dir = TempDir::new().expect("tempdir");
    let path = temp_path(&dir, "debug.bin");
    let transport =
        FileTransport::open(&path, OpenMode::Write, RuntimeConfig::default()).expect("open");
    let rendered = format!("{transport:?}");
    assert!(rendered.contains("FileTransport"));
    assert!(rendered.contains("debug.bin"));
    assert!(rendered.contains("OpenWrite"));
}

#[test]
fn test_open_missing_file_for_read_fails() {
    let dir = TempDir::new().expect("tempdir");
    let path = temp_path(&dir, "missing.bin");
    let err = FileTransport::open(&path, OpenMode::Read, RuntimeConfig::default()).unwrap_err();
    assert!(matches!(err, TransportError::Open { .. }));
}

#[test]
fn test_read_past_end_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = temp_path(&dir, "short.bin");
    let config = small_batch_config();

    let mut writer = FileTransport::open(&path, OpenMode::Write, config).expect("open write");
    writer.write(&[1, 2, 3], 0).expect("write");
    writer.close().expect("close");

    let mut reader = FileTransport::open(&path, OpenMode::Read, config).expect("open read");
    let mut back = [0_u8; 8];
    assert!(matches!(
        reader.read(&mut back, 0),
        Err(TransportError::Read { .. })
    ));
}

#[test]
fn test_append_mode_extends() {
    let dir = TempDir::new().expect("tempdir");
    let path = temp_path(&dir, "append.bin");
    let config = small_batch_config();

    let mut writer = FileTransport::open(&path, OpenMode::Write, config).expect("open write");
    writer.write(b"first;", 0).expect("write");
    writer.close().expect("close");

    let mut appender = FileTransport::open(&path, OpenMode::Append, config).expect("open append");
    appender
        .write(b"second", CURRENT_POSITION)
        .expect("append write");
    appender.close().expect("close");

    let mut reader = FileTransport::open(&path, OpenMode::Read, config).expect("open read");
    let mut back = vec![0_u8; "first;second".len()];
    reader.read(&mut back, 0).expect("read");
    assert_eq!(&back, b"first;second");
}
