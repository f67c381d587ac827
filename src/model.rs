// src/model.rs

/// A remote Proton release that can be installed.
#[derive(Debug, PartialEq, Clone)]
pub struct Release {
    pub tag: String,
    pub download_url: String,
    pub download_size: u64,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ActionKind {
    Update,
    Install,
    Uninstall,
}

/// Question text for the yes/cancel confirmation dialogs.
pub fn confirm_prompt(action: ActionKind, tag: &str) -> String {
    match action {
        ActionKind::Update => {
            "Are you sure you want to update Proton to the latest release?".to_string()
        }
        ActionKind::Install => {
            format!("Are you sure you want to install Proton {}?", tag)
        }
        ActionKind::Uninstall => {
            format!("Are you sure you want to uninstall Proton {}?", tag)
        }
    }
}

/// Lays installed tags out in rows of `per_row`, tab-separated, for the
/// main-menu label. Empty input yields an empty string.
pub fn format_version_columns(tags: &[String], per_row: usize) -> String {
    if tags.is_empty() || per_row == 0 {
        return String::new();
    }
    tags.chunks(per_row)
        .map(|row| row.join("\t\t"))
        .collect::<Vec<String>>()
        .join("\n")
}
