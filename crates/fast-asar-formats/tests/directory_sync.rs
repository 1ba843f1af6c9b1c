//! Pack, save, load and extract round trips against real directories

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use fast_asar_formats::pickle::{encode_string_frame, encode_u32_frame};
use fast_asar_formats::{Archive, DecodeOptions, EncodeOptions, PackOptions};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Relative path to content, with `None` for directories
fn snapshot(root: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.unwrap();
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let content = entry
                .file_type()
                .is_file()
                .then(|| fs::read(entry.path()).unwrap());
            (relative, content)
        })
        .collect()
}

fn sample_tree(root: &Path) {
    fs::create_dir_all(root.join("lib/nested")).unwrap();
    fs::create_dir_all(root.join("assets/empty")).unwrap();
    fs::write(root.join("package.json"), br#"{"name":"app"}"#).unwrap();
    fs::write(root.join("lib/index.js"), b"module.exports = 1;\n").unwrap();
    fs::write(root.join("lib/nested/blob.bin"), vec![7u8; 70_000]).unwrap();
    fs::write(root.join("zero.txt"), b"").unwrap();
}

#[test]
fn pack_save_load_extract() {
    let source = TempDir::new().unwrap();
    sample_tree(source.path());

    let archive = Archive::from_directory(source.path(), &PackOptions::default()).unwrap();
    let work = TempDir::new().unwrap();
    let archive_path = work.path().join("app.asar");
    archive.save(&archive_path, &EncodeOptions::default()).unwrap();

    let loaded = Archive::from_file(
        &archive_path,
        &DecodeOptions::default().with_verify_integrity(true),
    )
    .unwrap();
    let dest = work.path().join("out");
    loaded.extract_to_directory(&dest).unwrap();

    assert_eq!(snapshot(source.path()), snapshot(&dest));
}

#[test]
fn packed_tree_is_independent_of_source_listing_order() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    for name in ["c", "a", "b"] {
        fs::write(first.path().join(name), name).unwrap();
    }
    for name in ["b", "c", "a"] {
        fs::write(second.path().join(name), name).unwrap();
    }

    let options = EncodeOptions::default().with_sort(false);
    let a = Archive::from_directory(first.path(), &PackOptions::default())
        .unwrap()
        .encode(&options)
        .unwrap();
    let b = Archive::from_directory(second.path(), &PackOptions::default())
        .unwrap()
        .encode(&options)
        .unwrap();
    assert_eq!(a.bytes, b.bytes);
}

#[test]
fn extract_into_existing_directory_overwrites_files() {
    let source = TempDir::new().unwrap();
    fs::write(source.path().join("config.ini"), b"new").unwrap();
    let archive = Archive::from_directory(source.path(), &PackOptions::default()).unwrap();

    let dest = TempDir::new().unwrap();
    fs::write(dest.path().join("config.ini"), b"old contents").unwrap();
    fs::write(dest.path().join("untouched"), b"keep").unwrap();
    archive.extract_to_directory(dest.path()).unwrap();

    assert_eq!(fs::read(dest.path().join("config.ini")).unwrap(), b"new");
    assert_eq!(fs::read(dest.path().join("untouched")).unwrap(), b"keep");
}

#[test]
fn extract_skips_unpacked_files() {
    let header = r#"{"files":{"lib":{"files":{"addon.node":{"size":3,"unpacked":true}}},"main.js":{"size":2,"offset":"0"}}}"#;
    let header_frame = encode_string_frame(header).unwrap();
    let mut bytes = encode_u32_frame(header_frame.len() as u32).unwrap();
    bytes.extend_from_slice(&header_frame);
    bytes.extend_from_slice(b"go");
    let archive = Archive::decode(&bytes, &DecodeOptions::default()).unwrap();

    let dest = TempDir::new().unwrap();
    archive.extract_to_directory(dest.path()).unwrap();

    assert_eq!(fs::read(dest.path().join("main.js")).unwrap(), b"go");
    assert!(dest.path().join("lib").is_dir());
    assert!(!dest.path().join("lib/addon.node").exists());
}
