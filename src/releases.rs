// src/releases.rs

use crate::model::Release;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const RELEASES_URL: &str =
    "https://api.github.com/repos/GloriousEggroll/proton-ge-custom/releases";
const LATEST_URL: &str =
    "https://api.github.com/repos/GloriousEggroll/proton-ge-custom/releases/latest";
const USER_AGENT: &str = "protonup-gtk";
const RELEASE_PAGE_SIZE: u32 = 25;

#[derive(Debug, Deserialize)]
pub struct GithubAsset {
    pub name: String,
    pub content_type: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
pub struct GithubRelease {
    pub tag_name: String,
    pub assets: Vec<GithubAsset>,
}

/// Picks the installable tarball out of a release's assets. Releases ship a
/// gzip tarball next to checksum and sysinfo files; anything without one is
/// not installable and yields `None`.
pub fn select_tarball(release: &GithubRelease) -> Option<Release> {
    release
        .assets
        .iter()
        .find(|a| a.content_type == "application/gzip" || a.name.ends_with(".tar.gz"))
        .map(|asset| Release {
            tag: release.tag_name.clone(),
            download_url: asset.browser_download_url.clone(),
            download_size: asset.size,
        })
}

/// Function that parses a GitHub release-list JSON body (testable).
pub fn parse_releases(raw: &str) -> Result<Vec<Release>> {
    let parsed: Vec<GithubRelease> =
        serde_json::from_str(raw).context("unexpected release listing from GitHub")?;
    Ok(parsed.iter().filter_map(select_tarball).collect())
}

/// Remote releases that are not installed yet; the install dropdown must
/// never offer a tag that already has a directory on disk.
pub fn filter_new_releases(remote: &[Release], installed: &[String]) -> Vec<Release> {
    remote
        .iter()
        .filter(|r| !installed.contains(&r.tag))
        .cloned()
        .collect()
}

fn http_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("could not build HTTP client")
}

/// Fetches the recent release listing from GitHub, newest first.
pub fn fetch_releases() -> Result<Vec<Release>> {
    let response = http_client()?
        .get(RELEASES_URL)
        .query(&[("per_page", RELEASE_PAGE_SIZE)])
        .send()
        .context("release listing request failed")?;
    if !response.status().is_success() {
        anyhow::bail!("GitHub returned {} for the release listing", response.status());
    }
    let body = response.text().context("could not read release listing")?;
    parse_releases(&body)
}

/// Fetches the newest release, the target of the Update button.
pub fn fetch_latest_release() -> Result<Release> {
    let response = http_client()?
        .get(LATEST_URL)
        .send()
        .context("latest-release request failed")?;
    if !response.status().is_success() {
        anyhow::bail!("GitHub returned {} for the latest release", response.status());
    }
    let release: GithubRelease = response.json().context("unexpected latest release")?;
    select_tarball(&release)
        .with_context(|| format!("release {} has no tarball asset", release.tag_name))
}

static LAST_RELEASE_CHECK: Mutex<Option<u64>> = Mutex::new(None);
static RELEASE_CACHE: Mutex<Option<Vec<Release>>> = Mutex::new(None);
const RELEASE_CACHE_DURATION: u64 = 900;

fn needs_release_check() -> bool {
    if let Ok(last_check_guard) = LAST_RELEASE_CHECK.lock() {
        if let Some(last_check) = *last_check_guard {
            let current_time = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            return current_time - last_check > RELEASE_CACHE_DURATION;
        }
    }
    true
}

fn cached_releases() -> Option<Vec<Release>> {
    if let Ok(cache_guard) = RELEASE_CACHE.lock() {
        cache_guard.clone()
    } else {
        None
    }
}

fn set_release_cache(releases: Vec<Release>) {
    if let Ok(mut cache_guard) = RELEASE_CACHE.lock() {
        *cache_guard = Some(releases);
    }
    if let Ok(mut last_check_guard) = LAST_RELEASE_CHECK.lock() {
        let current_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        *last_check_guard = Some(current_time);
    }
}

/// Forces the next `fetch_releases_cached` to hit the network again.
pub fn invalidate_release_cache() {
    if let Ok(mut cache_guard) = RELEASE_CACHE.lock() {
        *cache_guard = None;
    }
    if let Ok(mut last_check_guard) = LAST_RELEASE_CHECK.lock() {
        *last_check_guard = None;
    }
}

/// Release listing with a 15-minute in-process cache so rebuilding the main
/// menu does not hammer the GitHub API.
pub fn fetch_releases_cached() -> Result<Vec<Release>> {
    if !needs_release_check() {
        if let Some(releases) = cached_releases() {
            return Ok(releases);
        }
    }
    let releases = fetch_releases()?;
    set_release_cache(releases.clone());
    Ok(releases)
}
