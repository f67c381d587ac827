// tests/manager_tests.rs
use protonup_gtk::proton_manager::{compare_tags, installed_versions_in, uninstall_in};
use std::cmp::Ordering;
use std::fs;

#[test]
fn lists_only_directories_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("GE-Proton9-2")).unwrap();
    fs::create_dir(dir.path().join("GE-Proton9-10")).unwrap();
    fs::create_dir(dir.path().join("GE-Proton8-25")).unwrap();
    // A stray tarball next to the install directories is not a version.
    fs::write(dir.path().join("GE-Proton9-3.tar.gz"), b"").unwrap();

    let versions = installed_versions_in(dir.path()).unwrap();
    assert_eq!(versions, vec!["GE-Proton9-10", "GE-Proton9-2", "GE-Proton8-25"]);
}

#[test]
fn missing_install_dir_means_nothing_installed() {
    let dir = tempfile::tempdir().unwrap();
    let versions = installed_versions_in(&dir.path().join("compatibilitytools.d")).unwrap();
    assert!(versions.is_empty());
}

#[test]
fn tag_ordering_is_numeric_per_segment() {
    assert_eq!(compare_tags("GE-Proton9-10", "GE-Proton9-2"), Ordering::Greater);
    assert_eq!(compare_tags("GE-Proton10-1", "GE-Proton9-27"), Ordering::Greater);
    assert_eq!(compare_tags("GE-Proton9-1", "GE-Proton9-1"), Ordering::Equal);
    assert_eq!(compare_tags("GE-Proton8-32", "GE-Proton9-1"), Ordering::Less);
}

#[test]
fn uninstall_removes_the_version_directory() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("GE-Proton9-2");
    fs::create_dir_all(target.join("files/bin")).unwrap();
    fs::write(target.join("version"), b"GE-Proton9-2").unwrap();

    uninstall_in(dir.path(), "GE-Proton9-2").unwrap();
    assert!(!target.exists());
}

#[test]
fn uninstall_unknown_tag_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(uninstall_in(dir.path(), "GE-Proton9-2").is_err());
}

#[test]
fn uninstall_rejects_empty_and_escaping_tags() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("GE-Proton9-2")).unwrap();

    assert!(uninstall_in(dir.path(), "").is_err());
    assert!(uninstall_in(dir.path(), "../GE-Proton9-2").is_err());
    assert!(uninstall_in(dir.path(), "a/b").is_err());

    // The guard must not have touched the real directory.
    assert!(dir.path().join("GE-Proton9-2").exists());
}
