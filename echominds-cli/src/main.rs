use clap::{Parser, Subcommand};
use colored::Colorize;
use echominds_core::{CliErrorDisplay, EchoMindsConfig, EchoMindsError, EchoMindsResult};
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod render;

use commands::{
    handle_characters_command, handle_chat_command, handle_create_command, handle_model_command,
    handle_system_command, handle_theme_command, CharactersCommand, ChatArgs, CreateArgs,
    ModelCommand, SystemCommand, ThemeCommand,
};
use config::CliContext;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Parser)]
#[command(name = "echominds")]
#[command(version = VERSION)]
#[command(about = "EchoMinds - chat with AI character personas")]
#[command(long_about = r#"
EchoMinds talks to a local character-chat backend. Browse the character
gallery, create your own companion with the four-step wizard, and chat with
replies rendered as dialogue, action and thought.

Use 'echominds health' to check the backend, 'echominds characters gallery'
to browse, and 'echominds chat <character>' to start talking.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(
        long,
        global = true,
        env = "ECHOMINDS_API_URL",
        help = "Backend base URL (default http://localhost:8000)"
    )]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Check that the backend is reachable")]
    Health,

    #[command(about = "Show backend status (provider, model, resources)")]
    Status {
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    #[command(about = "Chat with a character (one message or interactive)")]
    Chat(ChatArgs),

    #[command(about = "Browse and manage characters")]
    Characters {
        #[command(subcommand)]
        action: Option<CharactersCommand>,
    },

    #[command(about = "Create a companion with the four-step wizard")]
    Create(CreateArgs),

    #[command(about = "Show or change the backend model configuration")]
    Model {
        #[command(subcommand)]
        action: Option<ModelCommand>,
    },

    #[command(about = "Delete the stored conversation with a character")]
    Clear {
        #[arg(help = "Character id")]
        character: String,
    },

    #[command(about = "Generate an embedding for text (diagnostic)")]
    Embed {
        #[arg(help = "Text to embed")]
        text: String,
    },

    #[command(about = "Show or change the light/dark theme preference")]
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCommand>,
    },

    #[command(about = "Show version information")]
    Version {
        #[arg(short, long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = EchoMindsConfig::load();

    let level = config
        .as_ref()
        .map(|c| c.log_level().to_string())
        .unwrap_or_else(|_| "warn".to_string());
    init_logging(cli.verbose, &level);

    match run(cli, config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<EchoMindsError>() {
                Some(err) => {
                    err.log();
                    eprint!("{}: {}", "Error".red().bold(), CliErrorDisplay::new(err));
                }
                None => eprintln!("{}: {}", "Error".red().bold(), e),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli, config: EchoMindsResult<EchoMindsConfig>) -> anyhow::Result<()> {
    if let Commands::Version { detailed } = cli.command {
        return cmd_version(detailed);
    }

    let ctx = CliContext::new(config?, cli.api_url)?;

    match cli.command {
        Commands::Health => handle_system_command(&ctx, SystemCommand::Health).await,
        Commands::Status { format } => {
            handle_system_command(&ctx, SystemCommand::Status { format }).await
        }
        Commands::Clear { character } => {
            handle_system_command(&ctx, SystemCommand::Clear { character }).await
        }
        Commands::Embed { text } => handle_system_command(&ctx, SystemCommand::Embed { text }).await,
        Commands::Chat(args) => handle_chat_command(&ctx, args).await,
        Commands::Characters { action } => handle_characters_command(&ctx, action).await,
        Commands::Create(args) => handle_create_command(&ctx, args).await,
        Commands::Model { action } => handle_model_command(&ctx, action).await,
        Commands::Theme { action } => handle_theme_command(&ctx, action),
        Commands::Version { .. } => Ok(()),
    }
}

fn cmd_version(detailed: bool) -> anyhow::Result<()> {
    if detailed {
        println!("{}", "EchoMinds Version Information".cyan().bold());
        println!("{}", "═".repeat(40).dimmed());
        println!("  {:<15} {}", "Version:".bold(), VERSION);
        println!("  {:<15} {}", "Name:".bold(), NAME);
        println!("  {:<15} {}", "Core:".bold(), echominds_core::VERSION);
        println!("  {:<15} Apache-2.0", "License:".bold());
        println!();
        println!("  {}", "Build Information:".bold());
        println!("    Rust Edition: 2021");
        #[cfg(debug_assertions)]
        println!("    Build:        Debug");
        #[cfg(not(debug_assertions))]
        println!("    Build:        Release");
    } else {
        println!("echominds {}", VERSION);
    }

    Ok(())
}
