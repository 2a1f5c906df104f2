
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::utils::files::FileWriter;
use crate::utils::mood::MoodRecord;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// 2024-01-01 is a Monday, which keeps weekday arithmetic in the tests easy to follow.
pub fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

pub fn at(m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
    day(m, d).and_hms_opt(hour, minute, 0).unwrap()
}

pub fn record(m: u32, d: u32, start: Option<u8>, end: Option<u8>) -> MoodRecord {
    MoodRecord::new(day(m, d))
        .with_scores(start, end)
        .with_timestamps(at(m, d, 9, 0), at(m, d, 17, 30))
}

/// Keeps written files in memory.
#[derive(Default)]
pub struct MemoryWriter {
    pub files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

#[async_trait]
impl FileWriter for MemoryWriter {
    async fn write(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

/// Fails every write.
pub struct FailingWriter;

#[async_trait]
impl FileWriter for FailingWriter {
    async fn write(&self, _path: &Path, _bytes: &[u8]) -> std::io::Result<()> {
        Err(std::io::Error::other("disk full"))
    }
}
