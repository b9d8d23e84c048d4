//! Integration tests for the file manager.
//!
//! These tests verify cross-component behavior that unit tests don't cover.

use blockfile::{BlockId, Error, FileManager, Page};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn create_fm(block_size: usize) -> (FileManager, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let fm = FileManager::new(dir.path().join("file_test"), block_size).unwrap();
    (fm, dir)
}

/// Write a string and an integer into block 2 and read both back.
#[test]
fn test_string_and_int_round_trip_through_disk() {
    let (fm, _dir) = create_fm(400);

    let blk = BlockId::new("testfile", 2);
    let mut p1 = fm.new_page();
    let pos1 = 88;
    let s = "abcdefghijklm";
    p1.set_string(pos1, s).unwrap();
    let pos2 = pos1 + Page::max_length_for_string(s);
    assert_eq!(pos2, 109);
    p1.set_int(pos2, 345).unwrap();
    fm.write(&blk, &p1).unwrap();

    let mut p2 = fm.new_page();
    fm.read(&blk, &mut p2).unwrap();

    assert_eq!(p2.get_int(pos2).unwrap(), 345);
    assert_eq!(p2.get_string(pos1).unwrap(), s);
}

/// Block n lands at byte offset n * block_size.
#[test]
fn test_block_offsets_on_disk() {
    let (fm, _dir) = create_fm(64);

    let mut page = fm.new_page();
    page.set_bytes(0, b"third").unwrap();
    fm.write(&BlockId::new("layout", 2), &page).unwrap();
    fm.flush("layout").unwrap();

    let raw = fs::read(fm.directory().join("layout")).unwrap();
    assert_eq!(raw.len(), 3 * 64);
    assert!(raw[..128].iter().all(|&b| b == 0));
    assert_eq!(&raw[128..136], &5u64.to_le_bytes());
    assert_eq!(&raw[136..141], b"third");
}

/// Data written by one manager is visible to the next one over the same directory.
#[test]
fn test_persistence_across_managers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db");

    let blk;
    {
        let fm = FileManager::new(&path, 128).unwrap();
        assert!(fm.is_new());

        blk = fm.append("students.tbl").unwrap();
        let mut page = fm.new_page();
        page.set_string(0, "persistent!").unwrap();
        fm.write(&blk, &page).unwrap();
        fm.flush("students.tbl").unwrap();
    }

    fs::write(path.join("temp123"), b"scratch").unwrap();

    {
        let fm = FileManager::new(&path, 128).unwrap();
        assert!(!fm.is_new());
        assert!(!path.join("temp123").exists());
        assert_eq!(fm.size("students.tbl").unwrap(), 1);

        let mut page = fm.new_page();
        fm.read(&blk, &mut page).unwrap();
        assert_eq!(page.get_string(0).unwrap(), "persistent!");
    }
}

/// Size after k appends equals the initial count plus k.
#[test]
fn test_size_after_appends() {
    let (fm, _dir) = create_fm(100);

    fm.write(&BlockId::new("data", 3), &fm.new_page()).unwrap();
    let initial = fm.size("data").unwrap();
    assert_eq!(initial, 4);

    for _ in 0..7 {
        fm.append("data").unwrap();
    }
    assert_eq!(fm.size("data").unwrap(), initial + 7);
}

/// Reading a block that was never allocated is a misuse error, not garbage.
#[test]
fn test_read_unallocated_block() {
    let (fm, _dir) = create_fm(100);

    let mut page = fm.new_page();
    let err = fm.read(&BlockId::new("fresh", 0), &mut page).unwrap_err();
    assert!(matches!(err, Error::BlockNotFound { block_count: 0, .. }));
}

/// Concurrent appends to one file never hand out the same block twice.
#[test]
fn test_concurrent_appends() {
    let (fm, _dir) = create_fm(64);
    let fm = Arc::new(fm);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let fm = Arc::clone(&fm);
            thread::spawn(move || {
                (0..25)
                    .map(|_| fm.append("shared").unwrap().number())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut numbers: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    numbers.sort_unstable();

    assert_eq!(numbers, (0..200).collect::<Vec<u64>>());
    assert_eq!(fm.size("shared").unwrap(), 200);
}

/// Concurrent writers to different blocks of one file.
#[test]
fn test_concurrent_writers() {
    let (fm, _dir) = create_fm(64);
    let fm = Arc::new(fm);

    let blocks: Vec<BlockId> = (0..5).map(|_| fm.append("table").unwrap()).collect();

    let handles: Vec<_> = blocks
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, blk)| {
            let fm = Arc::clone(&fm);
            thread::spawn(move || {
                for round in 0..20u64 {
                    let mut page = fm.new_page();
                    page.set_int(0, i as u64).unwrap();
                    page.set_int(8, round).unwrap();
                    fm.write(&blk, &page).unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    for (i, blk) in blocks.iter().enumerate() {
        let mut page = fm.new_page();
        fm.read(blk, &mut page).unwrap();
        assert_eq!(page.get_int(0).unwrap(), i as u64);
        assert_eq!(page.get_int(8).unwrap(), 19);
    }
}
