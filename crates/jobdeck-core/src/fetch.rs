//! Provider fetch: repopulate a profile's jobs file from job-board APIs.
//!
//! A profile may carry a `search_specs.json` describing provider sources
//! (Greenhouse board, Lever postings, or a composed Google Jobs search
//! URL). Per-source failures are collected as warnings and never abort the
//! whole fetch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Provider configuration for one profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSpecs {
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceSpec {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no sources configured")]
    NoSources,
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a fetch run produced.
#[derive(Debug, Default)]
pub struct FetchSummary {
    /// Distinct URLs written to the jobs file (0 = nothing found, file
    /// untouched).
    pub written: usize,
    /// Per-source problems that did not abort the fetch.
    pub warnings: Vec<String>,
}

// ── Provider response shapes ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GreenhouseBoard {
    #[serde(default)]
    jobs: Vec<GreenhouseJob>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseJob {
    #[serde(default)]
    title: String,
    #[serde(default)]
    absolute_url: String,
    #[serde(default)]
    location: Option<GreenhouseLocation>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseLocation {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct LeverPosting {
    #[serde(default)]
    text: String,
    #[serde(rename = "hostedUrl", default)]
    hosted_url: String,
    #[serde(default)]
    categories: Option<LeverCategories>,
}

#[derive(Debug, Deserialize)]
struct LeverCategories {
    #[serde(default)]
    location: String,
}

// ── Matching ────────────────────────────────────────────────────────────

fn normalize_terms(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn matches_terms(text: &str, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let lower = text.to_lowercase();
    terms.iter().any(|term| lower.contains(term))
}

/// Keyword terms may match the title or the location; location terms must
/// match the location.
fn matches_job(title: &str, location: &str, keywords: &[String], locations: &[String]) -> bool {
    if !keywords.is_empty() && !(matches_terms(title, keywords) || matches_terms(location, keywords))
    {
        return false;
    }
    if !locations.is_empty() && !matches_terms(location, locations) {
        return false;
    }
    true
}

fn extract_greenhouse(
    board: GreenhouseBoard,
    keywords: &[String],
    locations: &[String],
    max_results: Option<usize>,
) -> Vec<String> {
    let mut urls = Vec::new();
    for job in board.jobs {
        if job.absolute_url.is_empty() {
            continue;
        }
        let location = job.location.map(|l| l.name).unwrap_or_default();
        if matches_job(&job.title, &location, keywords, locations) {
            urls.push(job.absolute_url);
        }
        if max_results.is_some_and(|max| urls.len() >= max) {
            break;
        }
    }
    urls
}

fn extract_lever(
    postings: Vec<LeverPosting>,
    keywords: &[String],
    locations: &[String],
    max_results: Option<usize>,
) -> Vec<String> {
    let mut urls = Vec::new();
    for job in postings {
        if job.hosted_url.is_empty() {
            continue;
        }
        let location = job.categories.map(|c| c.location).unwrap_or_default();
        if matches_job(&job.text, &location, keywords, locations) {
            urls.push(job.hosted_url);
        }
        if max_results.is_some_and(|max| urls.len() >= max) {
            break;
        }
    }
    urls
}

fn google_jobs_url(query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("https://www.google.com/search?q={encoded}&ibp=htl;jobs")
}

fn unique_preserve_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

// ── Fetch driver ────────────────────────────────────────────────────────

pub fn load_specs(path: &Path) -> Result<SearchSpecs, FetchError> {
    let text = std::fs::read_to_string(path).map_err(|source| FetchError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| FetchError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Fetch every configured source and overwrite the profile's jobs file with
/// the distinct URLs found (first-seen order). When nothing is found the
/// jobs file is left untouched.
pub async fn fetch_profile_jobs(
    specs_path: &Path,
    jobs_file: &Path,
    timeout: Duration,
) -> Result<FetchSummary, FetchError> {
    let specs = load_specs(specs_path)?;
    if specs.sources.is_empty() {
        return Err(FetchError::NoSources);
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("jobdeck/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    let mut all_urls = Vec::new();
    let mut warnings = Vec::new();

    for source in &specs.sources {
        let keywords = normalize_terms(&source.keywords);
        let locations = normalize_terms(&source.locations);

        match source.provider.trim().to_lowercase().as_str() {
            "greenhouse" => {
                let Some(company) = source.company.as_deref() else {
                    warnings.push("greenhouse source missing company".to_string());
                    continue;
                };
                let url = format!("https://boards-api.greenhouse.io/v1/boards/{company}/jobs");
                match fetch_json::<GreenhouseBoard>(&client, &url, timeout).await {
                    Ok(board) => all_urls.extend(extract_greenhouse(
                        board,
                        &keywords,
                        &locations,
                        source.max_results,
                    )),
                    Err(e) => {
                        tracing::warn!(company, error = %e, "greenhouse fetch failed");
                        warnings.push(format!("greenhouse fetch failed for {company}: {e}"));
                    }
                }
            }
            "lever" => {
                let Some(company) = source.company.as_deref() else {
                    warnings.push("lever source missing company".to_string());
                    continue;
                };
                let url = format!("https://api.lever.co/v0/postings/{company}?mode=json");
                match fetch_json::<Vec<LeverPosting>>(&client, &url, timeout).await {
                    Ok(postings) => all_urls.extend(extract_lever(
                        postings,
                        &keywords,
                        &locations,
                        source.max_results,
                    )),
                    Err(e) => {
                        tracing::warn!(company, error = %e, "lever fetch failed");
                        warnings.push(format!("lever fetch failed for {company}: {e}"));
                    }
                }
            }
            "google_jobs" => {
                let Some(query) = source.query.as_deref() else {
                    warnings.push("google_jobs source missing query".to_string());
                    continue;
                };
                all_urls.push(google_jobs_url(query));
            }
            other => warnings.push(format!("unknown provider: {other}")),
        }
    }

    let all_urls = unique_preserve_order(all_urls);
    if all_urls.is_empty() {
        return Ok(FetchSummary {
            written: 0,
            warnings,
        });
    }

    let mut content = all_urls.join("\n");
    content.push('\n');
    std::fs::write(jobs_file, content).map_err(|source| FetchError::Write {
        path: jobs_file.to_path_buf(),
        source,
    })?;
    tracing::info!(count = all_urls.len(), path = %jobs_file.display(), "wrote fetched jobs");

    Ok(FetchSummary {
        written: all_urls.len(),
        warnings,
    })
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<T, reqwest::Error> {
    client
        .get(url)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?
        .json::<T>()
        .await
}
