//! Input discovery and output naming, keyed by ISO dates in file names.

use crate::error::{AnalysisError, AnalysisResult};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse the date out of `<prefix>YYYY-MM-DD.xlsx`.
pub fn dated_file_date(file_name: &str, prefix: &str) -> Option<NaiveDate> {
    let stem = file_name.strip_prefix(prefix)?.strip_suffix(".xlsx")?;
    NaiveDate::parse_from_str(stem, DATE_FORMAT).ok()
}

/// Return the most recently dated `<prefix>YYYY-MM-DD.xlsx` file in `dir`.
/// Files whose suffix is not a valid date are ignored.
pub fn discover_latest_dataset(dir: &Path, prefix: &str) -> AnalysisResult<PathBuf> {
    let mut latest: Option<(NaiveDate, PathBuf)> = None;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(date) = dated_file_date(name, prefix) else {
            continue;
        };
        if latest.as_ref().map_or(true, |(best, _)| date > *best) {
            latest = Some((date, entry.path()));
        }
    }

    match latest {
        Some((date, path)) => {
            log::info!("latest dataset: {} ({date})", path.display());
            Ok(path)
        }
        None => Err(AnalysisError::DatasetNotFound {
            dir: dir.display().to_string(),
            prefix: prefix.to_string(),
        }),
    }
}

/// `<output_dir>/<prefix>YYYY-MM-DD.xlsx`, creating `output_dir` if needed.
pub fn report_path(output_dir: &Path, prefix: &str, date: NaiveDate) -> AnalysisResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    Ok(output_dir.join(format!("{prefix}{}.xlsx", date.format(DATE_FORMAT))))
}
