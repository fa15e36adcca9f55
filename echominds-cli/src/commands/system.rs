use anyhow::Result;
use colored::Colorize;

use crate::config::CliContext;

pub enum SystemCommand {
    Health,
    Status { format: String },
    Clear { character: String },
    Embed { text: String },
}

pub async fn handle_system_command(ctx: &CliContext, command: SystemCommand) -> Result<()> {
    match command {
        SystemCommand::Health => cmd_health(ctx).await,
        SystemCommand::Status { format } => cmd_status(ctx, &format).await,
        SystemCommand::Clear { character } => cmd_clear(ctx, &character).await,
        SystemCommand::Embed { text } => cmd_embed(ctx, &text).await,
    }
}

async fn cmd_health(ctx: &CliContext) -> Result<()> {
    println!(
        "  {} Checking {}...",
        "→".blue(),
        ctx.client.base_url().cyan()
    );

    let body = ctx.client.check_health().await?;
    let status = body
        .get("status")
        .and_then(|s| s.as_str())
        .unwrap_or("ok");

    println!("{} Backend is {}", "✓".green().bold(), status.green());
    Ok(())
}

async fn cmd_status(ctx: &CliContext, format: &str) -> Result<()> {
    let status = ctx.client.system_status().await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "EchoMinds Backend Status".cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    let state = if status.status == "healthy" || status.status == "ok" {
        status.status.green()
    } else {
        status.status.yellow()
    };
    println!("  {:<16} {}", "Status:".bold(), state);
    println!("  {:<16} {}", "Provider:".bold(), status.llm_provider);
    println!("  {:<16} {}", "Model:".bold(), status.model_loaded);
    println!(
        "  {:<16} {}",
        "GPU:".bold(),
        if status.gpu_available {
            "available".green()
        } else {
            "not available".dimmed()
        }
    );
    println!();
    println!("  {}", "Resources".yellow().bold());
    println!("    CPU Usage:     {:>6.1}%", status.cpu_usage);
    println!("    Memory Usage:  {:>6.1}%", status.memory_usage);
    println!("    Uptime:        {}", format_uptime(status.uptime_seconds));

    Ok(())
}

async fn cmd_clear(ctx: &CliContext, character: &str) -> Result<()> {
    let result = ctx
        .client
        .clear_conversation(character, ctx.user_id())
        .await?;

    println!("{} {}", "✓".green().bold(), result.message);
    if let Some(count) = result.deleted_count {
        println!("  {} messages deleted", count);
    }
    Ok(())
}

async fn cmd_embed(ctx: &CliContext, text: &str) -> Result<()> {
    let embedding = ctx.client.generate_embedding(text).await?;

    let preview: Vec<String> = embedding
        .embedding
        .iter()
        .take(8)
        .map(|v| format!("{:.4}", v))
        .collect();

    println!("  {:<12} {}", "Model:".bold(), embedding.model);
    println!("  {:<12} {}", "Dimension:".bold(), embedding.dimension);
    println!("  {:<12} [{}, ...]", "Vector:".bold(), preview.join(", "));
    Ok(())
}

fn format_uptime(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(42.7), "42s");
        assert_eq!(format_uptime(125.0), "2m 5s");
        assert_eq!(format_uptime(3725.0), "1h 2m 5s");
        assert_eq!(format_uptime(-3.0), "0s");
    }
}
