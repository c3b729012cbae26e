//! Profile discovery and loading.
//!
//! A profile is a directory holding a `jobs.txt` line file (one candidate URL
//! per line) and optionally a `search_specs.json` provider config. Entry
//! order follows line order and is preserved through every output artifact.

use std::path::{Path, PathBuf};

use crate::normalize::normalize;
use crate::{CoreError, Entry};

pub const JOBS_FILE: &str = "jobs.txt";
pub const SEARCH_SPECS_FILE: &str = "search_specs.json";

/// A named, ordered collection of entries loaded from a directory.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Directory stem; the profile's identity.
    pub name: String,
    pub dir: PathBuf,
    pub jobs_file: PathBuf,
    /// Provider config for fetching fresh links, if the profile has one.
    pub search_specs: Option<PathBuf>,
    pub entries: Vec<Entry>,
}

impl Profile {
    /// Load a profile from its directory. Returns `None` when the directory
    /// has no jobs file (i.e. it is not a profile).
    pub fn from_directory(dir: &Path) -> Result<Option<Self>, CoreError> {
        let jobs_file = dir.join(JOBS_FILE);
        if !jobs_file.exists() {
            return Ok(None);
        }
        let search_specs = Some(dir.join(SEARCH_SPECS_FILE)).filter(|p| p.exists());
        let entries = read_entries(&jobs_file)?;
        Ok(Some(Self {
            name: dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| dir.display().to_string()),
            dir: dir.to_path_buf(),
            jobs_file,
            search_specs,
            entries,
        }))
    }

    /// Load a profile directly from a jobs file path (CLI argument form).
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        if !path.is_file() {
            return Err(CoreError::ProfileNotFound(path.to_path_buf()));
        }
        let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let name = dir
            .file_name()
            .or_else(|| path.file_stem())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let search_specs = Some(dir.join(SEARCH_SPECS_FILE)).filter(|p| p.exists());
        let entries = read_entries(path)?;
        Ok(Self {
            name,
            dir,
            jobs_file: path.to_path_buf(),
            search_specs,
            entries,
        })
    }

    /// Re-read the jobs file, discarding any validation annotations.
    pub fn reload(&mut self) -> Result<(), CoreError> {
        self.entries = read_entries(&self.jobs_file)?;
        Ok(())
    }

    /// Entries that normalized and will be probed.
    pub fn probe_targets(&self) -> usize {
        self.entries.iter().filter(|e| e.normalized.is_some()).count()
    }
}

/// Scan a directory for profiles, sorted by name.
pub fn load_profiles(profiles_dir: &Path) -> Vec<Profile> {
    let mut profiles = Vec::new();
    let Ok(read_dir) = std::fs::read_dir(profiles_dir) else {
        return profiles;
    };
    let mut dirs: Vec<PathBuf> = read_dir
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    for dir in dirs {
        match Profile::from_directory(&dir) {
            Ok(Some(profile)) => profiles.push(profile),
            Ok(None) => {}
            Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable profile"),
        }
    }
    profiles
}

/// Read a jobs file into entries. Blank and comment lines are filtered out
/// here and never become entries; every other line does, even when it fails
/// to normalize.
fn read_entries(path: &Path) -> Result<Vec<Entry>, CoreError> {
    let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = text
        .lines()
        .filter(|raw| !matches!(normalize(raw), Err(ref r) if r.excludes_entry()))
        .map(Entry::from_raw)
        .collect();
    Ok(entries)
}
