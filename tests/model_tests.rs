// tests/model_tests.rs
use protonup_gtk::model::{confirm_prompt, format_version_columns, ActionKind};

#[test]
fn columns_empty() {
    assert_eq!(format_version_columns(&[], 4), "");
}

#[test]
fn columns_wrap_in_rows_of_four() {
    let tags: Vec<String> = [
        "GE-Proton9-5",
        "GE-Proton9-4",
        "GE-Proton9-3",
        "GE-Proton9-2",
        "GE-Proton9-1",
        "GE-Proton8-32",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    assert_eq!(
        format_version_columns(&tags, 4),
        "GE-Proton9-5\t\tGE-Proton9-4\t\tGE-Proton9-3\t\tGE-Proton9-2\nGE-Proton9-1\t\tGE-Proton8-32"
    );
}

#[test]
fn columns_short_list_is_one_row() {
    let tags = vec!["GE-Proton9-1".to_string()];
    assert_eq!(format_version_columns(&tags, 4), "GE-Proton9-1");
}

#[test]
fn confirm_prompts() {
    assert_eq!(
        confirm_prompt(ActionKind::Update, ""),
        "Are you sure you want to update Proton to the latest release?"
    );
    assert_eq!(
        confirm_prompt(ActionKind::Install, "GE-Proton9-2"),
        "Are you sure you want to install Proton GE-Proton9-2?"
    );
    assert_eq!(
        confirm_prompt(ActionKind::Uninstall, "GE-Proton9-2"),
        "Are you sure you want to uninstall Proton GE-Proton9-2?"
    );
}
