use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Write one cycle's blended text to `dir/idea_<YYYYMMDD_HHMMSS>.txt`.
///
/// Creates `dir` if needed. A `_<n>` suffix avoids clobbering an earlier
/// file from the same second.
pub fn write_idea(dir: &Path, text: &str, when: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let base = format!("idea_{}", when.format("%Y%m%d_%H%M%S"));
    let mut path = dir.join(format!("{}.txt", base));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{}_{}.txt", base, n));
        n += 1;
    }

    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn when() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 2, 29, 23, 59, 7).unwrap()
    }

    #[test]
    fn test_creates_dir_and_names_by_time() {
        let dir = tempfile::TempDir::new().unwrap();
        let out_dir = dir.path().join("outputs");
        let path = write_idea(&out_dir, "blended", when()).unwrap();
        assert_eq!(path, out_dir.join("idea_20240229_235907.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "blended");
    }

    #[test]
    fn test_same_second_gets_suffix() {
        let dir = tempfile::TempDir::new().unwrap();
        let first = write_idea(dir.path(), "one", when()).unwrap();
        let second = write_idea(dir.path(), "two", when()).unwrap();
        let third = write_idea(dir.path(), "three", when()).unwrap();
        assert_ne!(first, second);
        assert_eq!(second, dir.path().join("idea_20240229_235907_1.txt"));
        assert_eq!(third, dir.path().join("idea_20240229_235907_2.txt"));
        assert_eq!(fs::read_to_string(&first).unwrap(), "one");
    }
}
