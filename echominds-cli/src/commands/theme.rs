use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use echominds_core::{Theme, ThemeStorage, ThemeStore};

use crate::config::CliContext;

#[derive(Subcommand)]
pub enum ThemeCommand {
    #[command(about = "Show the saved theme")]
    Show,

    #[command(about = "Switch between light and dark")]
    Toggle,

    #[command(about = "Set the theme explicitly")]
    Set {
        #[arg(help = "light or dark")]
        theme: Theme,
    },
}

pub fn handle_theme_command(ctx: &CliContext, action: Option<ThemeCommand>) -> Result<()> {
    let mut store = ctx.theme_store();
    let theme = apply(&mut store, action);

    println!("  {:<10} {}", "Theme:".bold(), describe(theme));
    println!(
        "  {:<10} {}",
        "File:".bold(),
        ctx.config.theme_path().display().to_string().dimmed()
    );
    Ok(())
}

fn apply<S: ThemeStorage>(store: &mut ThemeStore<S>, action: Option<ThemeCommand>) -> Theme {
    match action {
        Some(ThemeCommand::Toggle) => store.toggle(),
        Some(ThemeCommand::Set { theme }) => store.set(theme),
        Some(ThemeCommand::Show) | None => store.theme(),
    }
}

fn describe(theme: Theme) -> String {
    match theme {
        Theme::Dark => format!("{} {}", "☾", "dark".bold()),
        Theme::Light => format!("{} {}", "☀", "light".yellow().bold()),
    }
}
