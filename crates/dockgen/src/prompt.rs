use crate::prelude::{eprintln, println, *};
use dockgen_core::prompt::DEFAULT_APP_NAME;
use std::path::PathBuf;

/// Options for the `prompt` command
#[derive(Debug, Clone, clap::Args)]
pub struct PromptOptions {
    /// Project root to summarize
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Application name, used for the WAR file and the context path
    #[arg(long, default_value = DEFAULT_APP_NAME)]
    pub app_name: String,

    /// Print only the project summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Print the prompt that `generate` would send. Needs no credentials.
pub async fn handler(options: PromptOptions, global: crate::Global) -> Result<()> {
    let output = render(&options)?;
    if global.verbose && !options.json {
        eprintln!("Prompt length: {} chars", output.len());
    }
    println!("{output}");

    Ok(())
}

/// The prompt text, or the project summary as JSON with `--json`.
pub fn render(options: &PromptOptions) -> Result<String> {
    if options.json {
        let summary = crate::project::summary(&options.root);
        return serde_json::to_string_pretty(&summary)
            .context("Failed to serialize project summary");
    }

    crate::project::render_prompt(&options.root, &options.app_name)
}
