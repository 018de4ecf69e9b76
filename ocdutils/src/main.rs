use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ocdutils::{
    commands::{SchemaTarget, SettingsHandler},
    config::DEFAULT_CONFIG_PATH,
    ctx::AppContext,
};

#[derive(Parser)]
#[command(name = "ocdutils", version, about = "Site utilities with a tabbed settings page")]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the settings pages over HTTP.
    Serve {
        /// Address to listen on, overrides `listen` in the config.
        #[arg(short, long)]
        listen: Option<String>,
    },
    /// Print a settings tab as HTML.
    Render {
        /// Configured user to render the page for.
        #[arg(short, long)]
        user: String,
        /// Component slug of the tab.
        #[arg(short, long)]
        tab: Option<String>,
    },
    /// Print the effective options of the active components.
    Defaults {
        /// Only this component.
        component: Option<String>,
    },
    /// Print a JSON Schema.
    Schema {
        #[arg(value_enum, default_value_t = SchemaTarget::Config)]
        target: SchemaTarget,
    },
    /// List the known components.
    Components,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Schema { target } => println!("{}", SettingsHandler::handle_schema(target)?),
        Command::Serve { listen } => {
            let ctx = AppContext::load(&cli.config)?;
            SettingsHandler::handle_serve(&ctx, listen).await?;
        }
        Command::Render { user, tab } => {
            let ctx = AppContext::load(&cli.config)?;
            println!("{}", SettingsHandler::handle_render(&ctx, &user, tab.as_deref())?);
        }
        Command::Defaults { component } => {
            let ctx = AppContext::load(&cli.config)?;
            let options = SettingsHandler::handle_defaults(&ctx, component.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
        Command::Components => {
            let ctx = AppContext::load(&cli.config)?;
            SettingsHandler::handle_components(&ctx)?;
        }
    }
    Ok(())
}
