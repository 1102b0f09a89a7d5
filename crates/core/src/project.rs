//! Project summary sent to the agent as context
//!
//! The shell lists the files under the project root; this module turns that
//! listing into the snapshot embedded in the prompt.

use serde::{Deserialize, Serialize};

/// Maximum number of file paths included in a summary.
pub const MAX_SUMMARY_FILES: usize = 50;

/// Fixed descriptive fields of the project being containerized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProfile {
    pub language_hint: String,
    pub build_tool: String,
    pub packaging: String,
    pub app_type: String,
    pub app_entry: String,
}

impl Default for ProjectProfile {
    /// A Maven-built servlet application packaged as a WAR for Tomcat.
    fn default() -> Self {
        Self {
            language_hint: "java".to_string(),
            build_tool: "maven".to_string(),
            packaging: "war".to_string(),
            app_type: "servlet".to_string(),
            app_entry: "Deploy WAR to Tomcat".to_string(),
        }
    }
}

/// Snapshot of the project embedded verbatim in the prompt.
///
/// Field order matches the serialized JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSummary {
    pub files: Vec<String>,
    pub language_hint: String,
    pub build_tool: String,
    pub packaging: String,
    pub app_type: String,
    pub app_entry: String,
}

/// Build a summary from a file listing.
///
/// Paths are normalized to `/` separators, sorted lexicographically and
/// capped at [`MAX_SUMMARY_FILES`] entries. Sorting happens before the cap,
/// so the kept entries are always the first ones in order.
pub fn summarize_project(files: Vec<String>, profile: &ProjectProfile) -> ProjectSummary {
    let mut files: Vec<String> = files
        .into_iter()
        .map(|path| path.replace('\\', "/"))
        .collect();
    files.sort();
    files.truncate(MAX_SUMMARY_FILES);

    ProjectSummary {
        files,
        language_hint: profile.language_hint.clone(),
        build_tool: profile.build_tool.clone(),
        packaging: profile.packaging.clone(),
        app_type: profile.app_type.clone(),
        app_entry: profile.app_entry.clone(),
    }
}
