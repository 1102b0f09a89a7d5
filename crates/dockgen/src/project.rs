use crate::prelude::{eprintln, *};
use dockgen_core::project::{summarize_project, ProjectProfile, ProjectSummary};
use dockgen_core::prompt::build_prompt;
use std::path::Path;

/// List every regular file under `root`, relative to it.
///
/// Hidden files are included and ignore files are not honoured, so the
/// listing matches what is actually on disk. Symlinks to files count as
/// files. Entries that cannot be read are skipped with a warning.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();

    for entry in ignore::WalkBuilder::new(root).standard_filters(false).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("Warning: skipping unreadable entry: {err}");
                continue;
            }
        };

        // Follows symlinks, unlike the entry's own file type
        if !entry.path().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        files.push(relative.to_string_lossy().into_owned());
    }

    files
}

/// Summarize the project under `root` with the default servlet profile.
pub fn summary(root: &Path) -> ProjectSummary {
    summarize_project(list_files(root), &ProjectProfile::default())
}

/// Render the full prompt for the project under `root`.
pub fn render_prompt(root: &Path, app_name: &str) -> Result<String> {
    let summary = summary(root);
    build_prompt(&summary, app_name).context("Failed to serialize project summary")
}
