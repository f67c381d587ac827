// src/proton_manager.rs

use crate::model::Release;
use anyhow::{bail, Context, Result};
use std::cmp::Ordering;
use std::env;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Where Steam picks up compatibility tools. `PROTONUP_DIR` overrides the
/// default for testing and non-standard Steam layouts.
pub fn install_dir() -> PathBuf {
    if let Ok(dir) = env::var("PROTONUP_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".steam/root/compatibilitytools.d")
}

/// Installed Proton versions, newest first. A missing install directory just
/// means nothing is installed yet.
pub fn installed_versions() -> Result<Vec<String>> {
    installed_versions_in(&install_dir())
}

pub fn installed_versions_in(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir)
        .with_context(|| format!("could not read install directory {}", dir.display()))?;

    let mut versions = Vec::new();
    for entry in entries.flatten() {
        if entry.path().is_dir() {
            if let Ok(name) = entry.file_name().into_string() {
                versions.push(name);
            }
        }
    }
    versions.sort_by(|a, b| compare_tags(b, a));
    Ok(versions)
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum TagToken {
    Number(u64),
    Text(String),
}

fn tag_tokens(tag: &str) -> Vec<TagToken> {
    let mut tokens = Vec::new();
    let mut digits = String::new();
    let mut text = String::new();
    for ch in tag.chars() {
        if ch.is_ascii_digit() {
            if !text.is_empty() {
                tokens.push(TagToken::Text(std::mem::take(&mut text)));
            }
            digits.push(ch);
        } else {
            if !digits.is_empty() {
                tokens.push(TagToken::Number(digits.parse().unwrap_or(0)));
                digits.clear();
            }
            text.push(ch);
        }
    }
    if !digits.is_empty() {
        tokens.push(TagToken::Number(digits.parse().unwrap_or(0)));
    }
    if !text.is_empty() {
        tokens.push(TagToken::Text(text));
    }
    tokens
}

/// Version-aware tag comparison: digit runs compare numerically, so
/// `GE-Proton9-10` sorts above `GE-Proton9-2` and `GE-Proton10-1` above
/// `GE-Proton9-27`.
pub fn compare_tags(a: &str, b: &str) -> Ordering {
    let a_tokens = tag_tokens(a);
    let b_tokens = tag_tokens(b);
    let max_len = a_tokens.len().max(b_tokens.len());

    for i in 0..max_len {
        let ordering = match (a_tokens.get(i), b_tokens.get(i)) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Downloads the release tarball to the temp directory in 8 KiB chunks,
/// reporting `(received, total)` to the callback. Returns the tarball path.
pub fn download_tarball(
    release: &Release,
    progress: &mut dyn FnMut(u64, u64),
) -> Result<PathBuf> {
    let tarball = env::temp_dir().join(format!("{}.tar.gz", release.tag));

    let mut response = reqwest::blocking::Client::builder()
        .user_agent("protonup-gtk")
        .build()
        .context("could not build HTTP client")?
        .get(&release.download_url)
        .send()
        .with_context(|| format!("download of {} failed", release.tag))?;
    if !response.status().is_success() {
        bail!("download of {} returned {}", release.tag, response.status());
    }

    let total = if release.download_size > 0 {
        release.download_size
    } else {
        response.content_length().unwrap_or(0)
    };

    let mut out = File::create(&tarball)
        .with_context(|| format!("could not create {}", tarball.display()))?;
    let mut buffer = [0u8; 8192];
    let mut received: u64 = 0;
    loop {
        let bytes_read = response
            .read(&mut buffer)
            .context("failed to read download stream")?;
        if bytes_read == 0 {
            break;
        }
        out.write_all(&buffer[..bytes_read])
            .with_context(|| format!("could not write {}", tarball.display()))?;
        received += bytes_read as u64;
        progress(received, total);
    }

    Ok(tarball)
}

/// Unpacks a gzip tarball into the install directory. Release tarballs carry
/// a single top-level directory named after the tag.
pub fn unpack_tarball(tarball: &Path, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("could not create install directory {}", dir.display()))?;

    let file = File::open(tarball)
        .with_context(|| format!("could not open {}", tarball.display()))?;
    let decoder = flate2::read::GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);
    archive
        .unpack(dir)
        .with_context(|| format!("could not extract {}", tarball.display()))?;
    Ok(())
}

/// Removes an installed version's directory.
pub fn uninstall(tag: &str) -> Result<()> {
    uninstall_in(&install_dir(), tag)
}

pub fn uninstall_in(dir: &Path, tag: &str) -> Result<()> {
    if tag.is_empty() {
        bail!("no version selected");
    }
    // The tag becomes a path component; refuse anything that could escape
    // the install directory.
    if tag.contains('/') || tag.contains("..") {
        bail!("invalid version tag '{}'", tag);
    }
    let target = dir.join(tag);
    if !target.is_dir() {
        bail!("Proton {} is not installed", tag);
    }
    fs::remove_dir_all(&target)
        .with_context(|| format!("could not remove {}", target.display()))?;
    println!("Uninstalled Proton {}", tag);
    Ok(())
}
