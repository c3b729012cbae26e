//! Derived artifacts for a validation run: clean list, validated list, and
//! a human-readable report, written next to the profile's jobs file.

use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;

use crate::profile::Profile;
use crate::{Entry, EntryStatus};

pub const CLEAN_FILE: &str = "jobs_clean.txt";
pub const VALIDATED_FILE: &str = "jobs_validated.txt";
pub const REPORT_FILE: &str = "jobs_report.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub clean: PathBuf,
    pub validated: PathBuf,
    pub report: PathBuf,
}

#[derive(Error, Debug)]
#[error("failed to write {path}: {source}")]
pub struct ReportError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// How an entry appears in the report. Entries still `Pending` at write time
/// were never probed (cancelled run) and are rendered as skipped, never
/// silently omitted.
fn reported_status(entry: &Entry) -> (&'static str, &str) {
    match entry.status {
        EntryStatus::Pending => ("skipped", "cancelled"),
        EntryStatus::Valid => ("valid", ""),
        EntryStatus::Invalid => ("invalid", entry.detail.as_deref().unwrap_or("")),
        EntryStatus::Skipped => ("skipped", entry.detail.as_deref().unwrap_or("")),
        EntryStatus::Error => ("error", entry.detail.as_deref().unwrap_or("")),
    }
}

/// Distinct normalized URLs in first-occurrence entry order, optionally
/// restricted to `Valid` entries.
fn distinct_urls(entries: &[Entry], valid_only: bool) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut urls = Vec::new();
    for entry in entries {
        let Some(url) = &entry.normalized else {
            continue;
        };
        if valid_only && entry.status != EntryStatus::Valid {
            continue;
        }
        if seen.insert(url.as_str()) {
            urls.push(url.as_str().to_string());
        }
    }
    urls
}

fn line_file(urls: &[String]) -> String {
    let mut out = urls.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn report_body(profile_name: &str, entries: &[Entry]) -> String {
    let mut valid = 0usize;
    let mut invalid = 0usize;
    let mut errors = 0usize;
    let mut skipped = 0usize;
    for entry in entries {
        match reported_status(entry).0 {
            "valid" => valid += 1,
            "invalid" => invalid += 1,
            "error" => errors += 1,
            _ => skipped += 1,
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "Validation report: {profile_name}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Total: {}", entries.len());
    let _ = writeln!(out, "Valid: {valid}");
    let _ = writeln!(out, "Invalid: {invalid}");
    let _ = writeln!(out, "Error: {errors}");
    let _ = writeln!(out, "Skipped: {skipped}");

    let problems: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.status != EntryStatus::Valid)
        .collect();
    if !problems.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Problems:");
        for entry in problems {
            let (status, detail) = reported_status(entry);
            let _ = writeln!(out, "{}\t{}\t{}", entry.raw, status, detail);
        }
    }
    out
}

/// Persist the three artifacts for a run.
///
/// Each file's content is built in memory and written in one call, so a
/// failed write never leaves a half-generated artifact behind with partial
/// content appended over time.
pub fn write_reports(profile: &Profile, entries: &[Entry]) -> Result<ReportPaths, ReportError> {
    let paths = ReportPaths {
        clean: profile.jobs_file.with_file_name(CLEAN_FILE),
        validated: profile.jobs_file.with_file_name(VALIDATED_FILE),
        report: profile.jobs_file.with_file_name(REPORT_FILE),
    };

    let clean = line_file(&distinct_urls(entries, false));
    let validated = line_file(&distinct_urls(entries, true));
    let report = report_body(&profile.name, entries);

    for (path, content) in [
        (&paths.clean, clean),
        (&paths.validated, validated),
        (&paths.report, report),
    ] {
        std::fs::write(path, content).map_err(|source| ReportError {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "wrote artifact");
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{JOBS_FILE, Profile};

    fn test_profile(dir: &std::path::Path, lines: &str) -> Profile {
        std::fs::write(dir.join(JOBS_FILE), lines).unwrap();
        Profile::from_directory(dir).unwrap().unwrap()
    }

    fn classify(entry: &mut Entry, status: EntryStatus, detail: Option<&str>) {
        entry.status = status;
        entry.detail = detail.map(str::to_string);
    }

    #[test]
    fn clean_file_dedupes_and_preserves_order() {
        let tmp = tempfile::tempdir().unwrap();
        let mut profile = test_profile(
            tmp.path(),
            "https://b.example/2\nhttps://a.example/1\nb.example/2\n",
        );
        for e in &mut profile.entries {
            classify(e, EntryStatus::Valid, None);
        }

        let paths = write_reports(&profile, &profile.entries).unwrap();
        let clean = std::fs::read_to_string(&paths.clean).unwrap();
        assert_eq!(clean, "https://b.example/2\nhttps://a.example/1\n");
    }

    #[test]
    fn validated_file_is_the_valid_subset() {
        let tmp = tempfile::tempdir().unwrap();
        let mut profile = test_profile(tmp.path(), "https://a.example/1\nhttps://a.example/2\n");
        classify(&mut profile.entries[0], EntryStatus::Valid, None);
        classify(&mut profile.entries[1], EntryStatus::Invalid, Some("404"));

        let paths = write_reports(&profile, &profile.entries).unwrap();
        let validated = std::fs::read_to_string(&paths.validated).unwrap();
        assert_eq!(validated, "https://a.example/1\n");
    }

    #[test]
    fn report_lists_every_non_valid_entry_with_detail() {
        let tmp = tempfile::tempdir().unwrap();
        let mut profile = test_profile(
            tmp.path(),
            "https://a.example/ok\nhttps://a.example/gone\nnot a url\nhttps://a.example/down\n",
        );
        classify(&mut profile.entries[0], EntryStatus::Valid, None);
        classify(&mut profile.entries[1], EntryStatus::Invalid, Some("404"));
        classify(&mut profile.entries[3], EntryStatus::Error, Some("timeout"));

        let paths = write_reports(&profile, &profile.entries).unwrap();
        let report = std::fs::read_to_string(&paths.report).unwrap();

        assert!(report.contains("Total: 4"));
        assert!(report.contains("Valid: 1"));
        assert!(report.contains("Invalid: 1"));
        assert!(report.contains("Error: 1"));
        assert!(report.contains("Skipped: 1"));
        assert!(report.contains("https://a.example/gone\tinvalid\t404"));
        assert!(report.contains("not a url\tskipped\tcontains whitespace"));
        assert!(report.contains("https://a.example/down\terror\ttimeout"));
        assert!(!report.contains("https://a.example/ok\tvalid"));
    }

    #[test]
    fn pending_entries_are_reported_as_cancelled_skips() {
        let tmp = tempfile::tempdir().unwrap();
        let mut profile = test_profile(tmp.path(), "https://a.example/1\nhttps://a.example/2\n");
        classify(&mut profile.entries[0], EntryStatus::Valid, None);
        // entries[1] stays Pending: the run was cancelled before its probe.

        let paths = write_reports(&profile, &profile.entries).unwrap();
        let report = std::fs::read_to_string(&paths.report).unwrap();
        assert!(report.contains("https://a.example/2\tskipped\tcancelled"));
        assert!(report.contains("Skipped: 1"));

        // The clean list still carries the pending entry's URL; the
        // validated list does not.
        let clean = std::fs::read_to_string(&paths.clean).unwrap();
        let validated = std::fs::read_to_string(&paths.validated).unwrap();
        assert_eq!(clean.lines().count(), 2);
        assert_eq!(validated.lines().count(), 1);
    }

    #[test]
    fn clean_line_count_matches_distinct_normalized_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let profile = test_profile(
            tmp.path(),
            "https://a.example/job1\n\n# comment\nnot a url\na.example/job2\n",
        );

        let paths = write_reports(&profile, &profile.entries).unwrap();
        let clean = std::fs::read_to_string(&paths.clean).unwrap();
        assert_eq!(clean.lines().count(), 2);
        assert_eq!(
            clean,
            "https://a.example/job1\nhttps://a.example/job2\n"
        );
    }

    #[test]
    fn unwritable_target_surfaces_report_error() {
        let tmp = tempfile::tempdir().unwrap();
        let profile_dir = tmp.path().join("p");
        std::fs::create_dir_all(&profile_dir).unwrap();
        let mut profile = test_profile(&profile_dir, "https://a.example/1\n");
        // Point the jobs file into a directory that does not exist.
        profile.jobs_file = tmp.path().join("missing").join(JOBS_FILE);

        let err = write_reports(&profile, &profile.entries).unwrap_err();
        assert!(err.path.ends_with(CLEAN_FILE));
    }
}
