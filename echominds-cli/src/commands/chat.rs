use anyhow::Result;
use clap::Args;
use colored::Colorize;
use echominds_core::{Character, ChatSession, EchoMindsError, Gallery};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::config::CliContext;
use crate::render::print_message;

#[derive(Args)]
pub struct ChatArgs {
    #[arg(help = "Character id")]
    pub character: String,

    #[arg(help = "Send a single message and exit")]
    pub message: Option<String>,

    #[arg(long, help = "Parse *action*, \"dialogue\" and (thought) markup in flat replies")]
    pub parse_markup: bool,

    #[arg(long, help = "Show translated channels when the backend provides them")]
    pub localized: bool,
}

pub async fn handle_chat_command(ctx: &CliContext, args: ChatArgs) -> Result<()> {
    let character = resolve_character(ctx, &args.character).await?;
    let localized = args.localized || ctx.config.chat.localized;

    let mut session = ChatSession::new(ctx.client.clone(), ctx.user_id(), &args.character)
        .with_markup_fallback(args.parse_markup || ctx.config.chat.parse_markup_fallback);

    if let Some(message) = args.message {
        let reply = session.send(&message).await?;
        print_message(reply, &character.name, localized);
        return Ok(());
    }

    interactive(&mut session, &character, localized).await
}

async fn resolve_character(ctx: &CliContext, id: &str) -> Result<Character> {
    let fetched = ctx.client.get_character(id).await;
    if let Err(e) = &fetched {
        debug!(error = %e, character_id = %id, "Falling back to the local gallery");
    }
    Ok(Gallery::seeded().resolve(id, fetched)?)
}

async fn interactive(
    session: &mut ChatSession,
    character: &Character,
    localized: bool,
) -> Result<()> {
    println!(
        "{} {}",
        character.avatar,
        format!("Chatting with {}", character.name).cyan().bold()
    );
    println!(
        "{}",
        "Type a message, /clear to reset the view, /quit to leave.".dimmed()
    );
    println!();
    println!("{}", format!("{}:", character.name).cyan().bold());
    println!("  {}", character.opening_line());
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", ">".green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                println!("{}", "Local history cleared.".dimmed());
                continue;
            }
            _ => {}
        }

        match session.send(&line).await {
            Ok(reply) => print_message(reply, &character.name, localized),
            Err(e @ EchoMindsError::EmptyMessage) => println!("{}", e.to_string().yellow()),
            Err(e) => {
                e.log();
                println!("{} {}", "✗".red().bold(), e);
            }
        }
        println!();
    }

    println!(
        "{}",
        format!("{} messages this session.", session.messages().len()).dimmed()
    );
    Ok(())
}
