use crate::client::AgentClient;
use crate::prelude::{println, *};
use colored::Colorize;
use dockgen_core::agent::{
    extract_assistant_text, extract_id, run_last_error, Endpoints, MessageList, RunStatus,
};
use dockgen_core::config::{FoundryConfig, RawConfig};
use dockgen_core::prompt::{DEFAULT_APP_NAME, RUN_INSTRUCTIONS};
use dockgen_core::sanitize::strip_fences;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;

/// Options for the `generate` command
#[derive(Debug, Clone, clap::Args)]
pub struct GenerateOptions {
    /// File the generated Dockerfile is written to (overwritten)
    #[arg(short, long, default_value = "Dockerfile")]
    pub output: PathBuf,

    /// Project root to summarize for the agent
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Application name, used for the WAR file and the context path
    #[arg(long, default_value = DEFAULT_APP_NAME)]
    pub app_name: String,

    /// Agent service base URL (overrides AZURE_AIF_ENDPOINT)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Agent identifier (overrides AZURE_AIF_AGENT_ID)
    #[arg(long)]
    pub agent_id: Option<String>,

    /// Assistants API version
    #[arg(long)]
    pub api_version: Option<String>,

    /// Maximum number of run status polls
    #[arg(long, default_value = "120")]
    pub max_polls: u32,

    /// Seconds to wait before each run status poll
    #[arg(long, default_value = "2")]
    pub poll_interval: u64,
}

/// Bounded polling schedule for a run.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub max_polls: u32,
    pub interval: Duration,
}

impl From<&GenerateOptions> for PollSettings {
    fn from(options: &GenerateOptions) -> Self {
        Self {
            max_polls: options.max_polls,
            interval: Duration::from_secs(options.poll_interval),
        }
    }
}

/// Run the `generate` command against the process environment.
pub async fn handler(options: GenerateOptions, global: crate::Global) -> Result<()> {
    execute(options, global, |name| std::env::var(name).ok())
        .await
        .map(|_| ())
}

/// Resolve the configuration through `lookup`, then generate and write the
/// Dockerfile. Returns the path that was written.
///
/// Configuration errors surface before any request is sent.
pub async fn execute<F>(
    options: GenerateOptions,
    global: crate::Global,
    lookup: F,
) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let config = load_config(&options, lookup)?;

    println!("Using {} authentication", config.credential.describe());
    println!("Using endpoint: {}", config.endpoint);
    println!("Using API version: {}", config.api_version);
    println!("Using agent ID: {}", config.agent_id);

    let prompt = crate::project::render_prompt(&options.root, &options.app_name)?;
    if global.verbose {
        println!("Prompt length: {} chars", prompt.len());
    }

    let client = AgentClient::new(&config)?;
    let poll = PollSettings::from(&options);
    let dockerfile = request_dockerfile(&client, &config, &prompt, poll).await?;

    tokio::fs::write(&options.output, &dockerfile)
        .await
        .with_context(|| f!("Failed to write {}", options.output.display()))?;

    println!(
        "{} generated by Azure AI Foundry agent {}",
        options.output.display().to_string().bold(),
        "✅".green()
    );

    Ok(options.output)
}

fn load_config<F>(options: &GenerateOptions, lookup: F) -> Result<FoundryConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = RawConfig::from_lookup(lookup).with_overrides(
        options.endpoint.clone(),
        options.agent_id.clone(),
        options.api_version.clone(),
    );

    FoundryConfig::resolve(raw).map_err(|e| Error::Config(e).into())
}

/// Drive one agent conversation and return the sanitized Dockerfile text.
///
/// Thread creation, message post, run creation, polling, then message
/// retrieval. The thread and run are left on the service afterwards.
pub async fn request_dockerfile(
    client: &AgentClient,
    config: &FoundryConfig,
    prompt: &str,
    poll: PollSettings,
) -> Result<String> {
    let endpoints = Endpoints::new(config);

    let thread = client.post(&endpoints.threads(), &json!({})).await?;
    let thread_id = extract_id(&thread, "thread").map_err(Error::from)?;

    client
        .post(
            &endpoints.messages(&thread_id),
            &json!({ "role": "user", "content": prompt }),
        )
        .await?;

    let run = client
        .post(
            &endpoints.runs(&thread_id),
            &json!({ "assistant_id": config.agent_id, "instructions": RUN_INSTRUCTIONS }),
        )
        .await?;
    let run_id = extract_id(&run, "run").map_err(Error::from)?;

    wait_for_run(client, &endpoints, &thread_id, &run_id, run, poll).await?;

    let messages = client.get(&endpoints.list_messages(&thread_id)).await?;
    let messages: MessageList = serde_json::from_value(messages)
        .map_err(|e| Error::Protocol(f!("Invalid message list: {e}")))?;

    let text = extract_assistant_text(&messages).map_err(Error::from)?;
    let dockerfile = strip_fences(&text).map_err(Error::from)?;

    Ok(dockerfile)
}

/// Poll the run until it reaches a terminal status or the budget runs out.
///
/// Anything but `completed` at the end is fatal; the last run object is
/// printed before the error is returned.
async fn wait_for_run(
    client: &AgentClient,
    endpoints: &Endpoints<'_>,
    thread_id: &str,
    run_id: &str,
    mut run: Value,
    poll: PollSettings,
) -> Result<Value> {
    let mut status = RunStatus::from_run(&run);

    for _ in 0..poll.max_polls {
        tokio::time::sleep(poll.interval).await;

        run = client.get(&endpoints.run(thread_id, run_id)).await?;
        status = RunStatus::from_run(&run);
        if status.is_terminal() {
            break;
        }
    }

    if status != RunStatus::Completed {
        println!("\n{} Run failed with status: {}", "❌".red(), status);
        println!(
            "Run details: {}",
            serde_json::to_string_pretty(&run).unwrap_or_else(|_| run.to_string())
        );
        if let Some(last_error) = run_last_error(&run) {
            println!("Error: {last_error}");
        }
        return Err(Error::RunFailed {
            status: status.to_string(),
        }
        .into());
    }

    Ok(run)
}
