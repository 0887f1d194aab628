//! Dataset persistence.
//!
//! The acquisition core's boundary is the in-memory [`TraceDataset`]; this
//! module is its one consumer, writing pretty-printed JSON under the
//! standard filename `YYYYMMDD-HHMM_lc574al_<sample>_<experimenter>.json`.

use crate::trace::TraceDataset;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds the standard dataset filename for `timestamp`.
pub fn standard_filename(timestamp: DateTime<Local>, sample: &str, experimenter: &str) -> String {
    format!(
        "{}_lc574al_{sample}_{experimenter}.json",
        timestamp.format("%Y%m%d-%H%M")
    )
}

/// Writes `dataset` as pretty JSON into `directory` (created if missing),
/// named with the current local time. Returns the path written.
pub fn write_dataset(
    dataset: &TraceDataset,
    directory: &Path,
    sample: &str,
    experimenter: &str,
) -> Result<PathBuf> {
    write_dataset_at(dataset, directory, sample, experimenter, Local::now())
}

fn write_dataset_at(
    dataset: &TraceDataset,
    directory: &Path,
    sample: &str,
    experimenter: &str,
    timestamp: DateTime<Local>,
) -> Result<PathBuf> {
    fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create output directory '{}'", directory.display()))?;

    let path = directory.join(standard_filename(timestamp, sample, experimenter));
    let json = serde_json::to_string_pretty(dataset).context("Failed to serialize dataset")?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write dataset to '{}'", path.display()))?;

    info!(
        "Wrote {} segments to {}",
        dataset.segments.len(),
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::SegmentRecord;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn sample_dataset() -> TraceDataset {
        let mut channels = BTreeMap::new();
        channels.insert("C1".to_string(), vec![1.0, 2.0]);
        TraceDataset {
            identity: "LECROY,LC574AL".to_string(),
            segments: vec![SegmentRecord {
                time: vec![0.0, 1.0e-9],
                channels,
            }],
        }
    }

    #[test]
    fn filename_follows_the_standard_format() {
        let timestamp = Local.with_ymd_and_hms(2026, 8, 26, 14, 30, 0).unwrap();
        assert_eq!(
            standard_filename(timestamp, "jrs0076", "jrs"),
            "20260826-1430_lc574al_jrs0076_jrs.json"
        );
    }

    #[test]
    fn dataset_round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = sample_dataset();
        let timestamp = Local.with_ymd_and_hms(2026, 8, 26, 14, 30, 0).unwrap();
        let path =
            write_dataset_at(&dataset, dir.path(), "jrs0076", "jrs", timestamp).unwrap();

        assert!(path.ends_with("20260826-1430_lc574al_jrs0076_jrs.json"));
        let text = fs::read_to_string(&path).unwrap();
        let back: TraceDataset = serde_json::from_str(&text).unwrap();
        assert_eq!(back, dataset);
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let timestamp = Local.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let path =
            write_dataset_at(&sample_dataset(), &nested, "s", "e", timestamp).unwrap();
        assert!(path.exists());
    }
}
