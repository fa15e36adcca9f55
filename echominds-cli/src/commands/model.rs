use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use echominds_core::{ModelConfig, ModelConfigUpdate};

use crate::config::CliContext;

#[derive(Subcommand)]
pub enum ModelCommand {
    #[command(about = "Show the active model configuration")]
    Show {
        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: String,
    },

    #[command(about = "Update model configuration (only the given fields change)")]
    Set {
        #[arg(long)]
        model_name: Option<String>,

        #[arg(long)]
        cpu_threads: Option<u32>,

        #[arg(long, allow_hyphen_values = true)]
        gpu_layers: Option<i32>,

        #[arg(long)]
        temperature: Option<f64>,

        #[arg(long)]
        context_length: Option<u32>,

        #[arg(long)]
        max_tokens: Option<u32>,
    },

    #[command(about = "List models available to the backend")]
    List,
}

pub async fn handle_model_command(ctx: &CliContext, action: Option<ModelCommand>) -> Result<()> {
    match action {
        Some(ModelCommand::Show { format }) => cmd_show(ctx, &format).await,
        Some(ModelCommand::Set {
            model_name,
            cpu_threads,
            gpu_layers,
            temperature,
            context_length,
            max_tokens,
        }) => {
            let update = ModelConfigUpdate {
                model_name,
                cpu_threads,
                gpu_layers,
                temperature,
                context_length,
                max_tokens,
            };
            cmd_set(ctx, update).await
        }
        Some(ModelCommand::List) => cmd_list(ctx).await,
        None => cmd_show(ctx, "text").await,
    }
}

fn config_table(config: &ModelConfig) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Setting").fg(comfy_table::Color::Cyan),
            Cell::new("Value").fg(comfy_table::Color::Cyan),
        ]);

    if let Some(provider) = &config.provider {
        table.add_row(vec![Cell::new("Provider"), Cell::new(provider)]);
    }
    table.add_row(vec![Cell::new("Model"), Cell::new(&config.model_name)]);
    table.add_row(vec![
        Cell::new("Temperature"),
        Cell::new(format!("{:.2}", config.temperature)),
    ]);
    table.add_row(vec![
        Cell::new("Context Length"),
        Cell::new(config.context_length),
    ]);
    table.add_row(vec![Cell::new("Max Tokens"), Cell::new(config.max_tokens)]);
    table.add_row(vec![Cell::new("CPU Threads"), Cell::new(config.cpu_threads)]);
    table.add_row(vec![Cell::new("GPU Layers"), Cell::new(config.gpu_layers)]);
    if let Some(mem) = config.gpu_memory_used {
        table.add_row(vec![Cell::new("GPU Memory"), Cell::new(format!("{:.1} MB", mem))]);
    }
    if let Some(mem) = config.cpu_memory_used {
        table.add_row(vec![Cell::new("CPU Memory"), Cell::new(format!("{:.1} MB", mem))]);
    }

    table
}

async fn cmd_show(ctx: &CliContext, format: &str) -> Result<()> {
    let config = ctx.client.model_config().await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Model Configuration".cyan().bold());
    println!("{}", config_table(&config));
    Ok(())
}

async fn cmd_set(ctx: &CliContext, update: ModelConfigUpdate) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to update. Pass at least one setting, e.g. --temperature 0.7");
    }
    if let Some(t) = update.temperature {
        if !(0.0..=2.0).contains(&t) {
            bail!("Temperature must be between 0.0 and 2.0, got {}", t);
        }
    }

    let config = ctx.client.update_model_config(&update).await?;

    println!("{} Model configuration updated", "✓".green().bold());
    println!("{}", config_table(&config));
    Ok(())
}

async fn cmd_list(ctx: &CliContext) -> Result<()> {
    let models = ctx.client.list_models().await?;
    let names = models.names();

    if names.is_empty() {
        println!("{}", "No models reported by the backend.".yellow());
        return Ok(());
    }

    println!("{}", "Available Models".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    for name in &names {
        println!("  {} {}", "•".blue(), name);
    }
    println!();
    println!("  Total: {} models", names.len());
    Ok(())
}
