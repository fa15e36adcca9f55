use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use echominds_core::{Character, CharacterCreateRequest, Gallery};
use std::path::PathBuf;

use crate::config::CliContext;
use crate::render::{characters_table, format_count};

#[derive(Subcommand)]
pub enum CharactersCommand {
    #[command(about = "List characters known to the backend")]
    List {
        #[arg(short, long, help = "Filter by category id or name")]
        category: Option<String>,

        #[arg(short, long, help = "Search name, description and tags")]
        search: Option<String>,

        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: String,
    },

    #[command(about = "Show one character in detail")]
    Show {
        #[arg(help = "Character id")]
        id: String,
    },

    #[command(
        about = "Create a character from a JSON payload file",
        long_about = "Create a character from a JSON payload file.\n\n\
                      The payload is posted as-is and skips the step validation done by \
                      `echominds create`. Use the wizard for checked input."
    )]
    Create {
        #[arg(help = "Path to a JSON file with the character payload (sent unvalidated)")]
        file: PathBuf,
    },

    #[command(about = "Browse the built-in gallery (works offline)")]
    Gallery {
        #[arg(short, long, help = "Filter by category id or name")]
        category: Option<String>,

        #[arg(short, long, help = "Search name, description and tags")]
        search: Option<String>,

        #[arg(short, long, help = "Show only the N most chatted characters")]
        popular: Option<usize>,
    },
}

pub async fn handle_characters_command(
    ctx: &CliContext,
    action: Option<CharactersCommand>,
) -> Result<()> {
    match action {
        Some(CharactersCommand::List {
            category,
            search,
            format,
        }) => cmd_list(ctx, category, search, &format).await,
        Some(CharactersCommand::Show { id }) => cmd_show(ctx, &id).await,
        Some(CharactersCommand::Create { file }) => cmd_create(ctx, &file).await,
        Some(CharactersCommand::Gallery {
            category,
            search,
            popular,
        }) => cmd_gallery(category, search, popular),
        None => cmd_gallery(None, None, None),
    }
}

fn filter<'a>(
    gallery: &'a Gallery,
    category: Option<&str>,
    search: Option<&str>,
) -> Vec<&'a Character> {
    let base: Vec<&Character> = match category {
        Some(c) => gallery.by_category(c),
        None => gallery.characters().iter().collect(),
    };

    match search {
        Some(q) => {
            let matches: Vec<&str> = gallery.search(q).iter().map(|c| c.id.as_str()).collect();
            base.into_iter()
                .filter(|c| matches.contains(&c.id.as_str()))
                .collect()
        }
        None => base,
    }
}

async fn cmd_list(
    ctx: &CliContext,
    category: Option<String>,
    search: Option<String>,
    format: &str,
) -> Result<()> {
    let gallery = Gallery::with_characters(ctx.client.list_characters().await?);
    let characters = filter(&gallery, category.as_deref(), search.as_deref());

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&characters)?);
        return Ok(());
    }

    if characters.is_empty() {
        println!("{}", "No characters found.".yellow());
        println!();
        println!(
            "Run {} to create one.",
            "echominds create".cyan().bold()
        );
        return Ok(());
    }

    println!("{}", "Characters".cyan().bold());
    println!("{}", "═".repeat(80).dimmed());
    println!();
    println!("{}", characters_table(&characters));
    println!();
    println!("  Total: {} characters", characters.len());
    Ok(())
}

async fn cmd_show(ctx: &CliContext, id: &str) -> Result<()> {
    let fetched = ctx.client.get_character(id).await;
    let character = Gallery::seeded().resolve(id, fetched)?;

    println!(
        "{} {}",
        character.avatar,
        character.name.cyan().bold()
    );
    println!("{}", "═".repeat(60).dimmed());
    println!("  {:<14} {}", "ID:".bold(), character.id);
    if let Some(category) = &character.category {
        println!("  {:<14} {}", "Category:".bold(), category);
    }
    println!(
        "  {:<14} {}",
        "Chats:".bold(),
        format_count(character.chat_count)
    );
    if !character.tags.is_empty() {
        println!("  {:<14} {}", "Tags:".bold(), character.tags.join(", "));
    }
    println!();
    println!("  {}", character.description);

    if let Some(personality) = &character.personality {
        println!();
        println!("  {}", "Personality".yellow().bold());
        println!("    {}", personality);
    }

    println!();
    println!("  {}", "Greeting".yellow().bold());
    println!("    {}", character.opening_line());

    if !character.example_dialogues.is_empty() {
        println!();
        println!("  {}", "Example Dialogue".yellow().bold());
        for example in &character.example_dialogues {
            println!("    {} {}", "User:".green(), example.user);
            println!("    {} {}", format!("{}:", character.name).cyan(), example.assistant);
        }
    }

    Ok(())
}

async fn cmd_create(ctx: &CliContext, file: &PathBuf) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read character payload from {:?}", file))?;
    let payload: CharacterCreateRequest = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid character payload in {:?}", file))?;

    let character = ctx.client.create_character(&payload).await?;

    println!(
        "{} Created {} {} (id {})",
        "✓".green().bold(),
        character.avatar,
        character.name.cyan(),
        character.id
    );
    Ok(())
}

fn cmd_gallery(
    category: Option<String>,
    search: Option<String>,
    popular: Option<usize>,
) -> Result<()> {
    let gallery = Gallery::seeded();

    let characters = match popular {
        Some(n) => gallery.popular(n),
        None => filter(&gallery, category.as_deref(), search.as_deref()),
    };

    println!("{}", "Discover Characters".cyan().bold());
    println!("{}", "═".repeat(80).dimmed());
    println!();

    let mut categories = Table::new();
    categories
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("").fg(comfy_table::Color::Cyan),
            Cell::new("Category").fg(comfy_table::Color::Cyan),
            Cell::new("Characters").fg(comfy_table::Color::Cyan),
        ]);
    for c in gallery.categories() {
        categories.add_row(vec![
            Cell::new(&c.icon),
            Cell::new(&c.name),
            Cell::new(c.character_count.map(format_count).unwrap_or_default()),
        ]);
    }
    println!("{}", categories);
    println!();

    if characters.is_empty() {
        println!("{}", "No characters match.".yellow());
        return Ok(());
    }

    println!("{}", characters_table(&characters));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_combines_category_and_search() {
        let gallery = Gallery::seeded();
        let all = filter(&gallery, None, None);
        assert_eq!(all.len(), gallery.characters().len());

        let original = filter(&gallery, Some("Original"), None);
        assert!(!original.is_empty());
        assert!(original
            .iter()
            .all(|c| c.category.as_deref() == Some("OC")));

        let none = filter(&gallery, Some("Original"), Some("zzz-no-match"));
        assert!(none.is_empty());
    }
}
