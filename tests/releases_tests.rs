// tests/releases_tests.rs
use protonup_gtk::model::Release;
use protonup_gtk::releases::{filter_new_releases, parse_releases};

const SAMPLE: &str = r#"[
  {
    "tag_name": "GE-Proton9-2",
    "assets": [
      {
        "name": "GE-Proton9-2.sha512sum",
        "content_type": "application/octet-stream",
        "browser_download_url": "https://example.invalid/GE-Proton9-2.sha512sum",
        "size": 154
      },
      {
        "name": "GE-Proton9-2.tar.gz",
        "content_type": "application/gzip",
        "browser_download_url": "https://example.invalid/GE-Proton9-2.tar.gz",
        "size": 459276288
      }
    ]
  },
  {
    "tag_name": "GE-Proton9-1",
    "assets": [
      {
        "name": "GE-Proton9-1.tar.gz",
        "content_type": "application/x-gtar",
        "browser_download_url": "https://example.invalid/GE-Proton9-1.tar.gz",
        "size": 459000000
      }
    ]
  },
  {
    "tag_name": "GE-Proton8-32",
    "assets": [
      {
        "name": "release-notes.txt",
        "content_type": "text/plain",
        "browser_download_url": "https://example.invalid/release-notes.txt",
        "size": 12
      }
    ]
  }
]"#;

#[test]
fn parse_empty() {
    let v = parse_releases("[]").unwrap();
    assert!(v.is_empty());
}

#[test]
fn parse_garbage_is_error() {
    assert!(parse_releases("not a release listing").is_err());
}

#[test]
fn parse_sample() {
    let v = parse_releases(SAMPLE).unwrap();

    // The release without a tarball asset is not installable and is skipped.
    assert_eq!(v.len(), 2);

    assert_eq!(
        v[0],
        Release {
            tag: "GE-Proton9-2".into(),
            download_url: "https://example.invalid/GE-Proton9-2.tar.gz".into(),
            download_size: 459276288,
        }
    );

    // Picked by file name even though the content type is not gzip.
    assert_eq!(v[1].tag, "GE-Proton9-1");
    assert_eq!(
        v[1].download_url,
        "https://example.invalid/GE-Proton9-1.tar.gz"
    );
}

#[test]
fn filter_excludes_installed_tags() {
    let remote = parse_releases(SAMPLE).unwrap();
    let installed = vec!["GE-Proton9-2".to_string()];

    let new_releases = filter_new_releases(&remote, &installed);
    assert_eq!(new_releases.len(), 1);
    assert_eq!(new_releases[0].tag, "GE-Proton9-1");
}

#[test]
fn filter_with_nothing_installed_keeps_all() {
    let remote = parse_releases(SAMPLE).unwrap();
    let new_releases = filter_new_releases(&remote, &[]);
    assert_eq!(new_releases.len(), remote.len());
}
