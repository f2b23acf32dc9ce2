#![allow(dead_code)]

pub mod mocks;

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Copies `tests/fixtures/data` into a fresh temporary directory so that
/// jobs can write to it freely.
pub fn fixture_data_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    copy_fixture_data(temp.path());
    temp
}

/// Copies `tests/fixtures/data` into `to`, creating it if needed.
pub fn copy_fixture_data(to: &Path) {
    copy_dir(
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/data"),
        to,
    );
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}
