use crate::prelude::*;
use clap::Parser;

mod client;
mod error;
mod generate;
mod prelude;
mod project;
mod prompt;

#[cfg(test)]
mod testing;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generate a Dockerfile for a legacy Java servlet project with an Azure AI Foundry agent"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "DOCKGEN_VERBOSE", global = true, default_value = "false")]
    pub verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Ask the agent for a Dockerfile and write it to disk
    Generate(crate::generate::GenerateOptions),

    /// Print the prompt sent to the agent without calling it
    Prompt(crate::prompt::PromptOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Generate(options) => crate::generate::handler(options, app.global).await,
        SubCommands::Prompt(options) => crate::prompt::handler(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
