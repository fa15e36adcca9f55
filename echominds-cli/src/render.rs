use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use echominds_core::{Character, Message, Segment};

pub fn segment_line(segment: &Segment) -> String {
    match segment {
        Segment::Action(text) => format!("*{}*", text).italic().yellow().to_string(),
        Segment::Dialogue(text) => format!("\"{}\"", text).white().to_string(),
        Segment::Thought(text) => format!("({})", text).dimmed().italic().to_string(),
        Segment::Emotion(text) => format!("[{}]", text).magenta().to_string(),
        Segment::Narrative(text) => text.normal().to_string(),
    }
}

pub fn print_message(message: &Message, speaker: &str, localized: bool) {
    if message.is_user() {
        println!("{} {}", "You:".green().bold(), message.content);
        return;
    }

    println!("{}", format!("{}:", speaker).cyan().bold());
    for segment in message.segments(localized) {
        println!("  {}", segment_line(&segment));
    }
}

pub fn characters_table(characters: &[&Character]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(comfy_table::Color::Cyan),
            Cell::new("").fg(comfy_table::Color::Cyan),
            Cell::new("Name").fg(comfy_table::Color::Cyan),
            Cell::new("Category").fg(comfy_table::Color::Cyan),
            Cell::new("Chats").fg(comfy_table::Color::Cyan),
            Cell::new("Description").fg(comfy_table::Color::Cyan),
        ]);

    for character in characters {
        table.add_row(vec![
            Cell::new(&character.id),
            Cell::new(&character.avatar),
            Cell::new(&character.name),
            Cell::new(character.category.as_deref().unwrap_or("-")),
            Cell::new(format_count(character.chat_count)),
            Cell::new(truncate(&character.description, 60)),
        ]);
    }

    table
}

pub fn format_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(15_420), "15.4K");
        assert_eq!(format_count(2_500_000), "2.5M");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_segment_line_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(segment_line(&Segment::Action("waves".into())), "*waves*");
        assert_eq!(segment_line(&Segment::Dialogue("Hi".into())), "\"Hi\"");
        assert_eq!(segment_line(&Segment::Thought("hmm".into())), "(hmm)");
        assert_eq!(segment_line(&Segment::Emotion("happy".into())), "[happy]");
    }
}
