//! Show a single content item

use anyhow::Result;

use crate::content::body::Block;
use crate::content::ContentItem;
use crate::Site;

/// Print an item's metadata followed by its body or outline
pub fn run(site: &Site, path: &str, outline: bool) -> Result<()> {
    let store = site.store()?;
    let item = store.read_item(path)?;
    print!("{}", format_item(item, outline));
    Ok(())
}

fn format_item(item: &ContentItem, outline: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("title:  {}\n", item.title));
    out.push_str(&format!("path:   {}\n", item.path));
    out.push_str(&format!("source: {}\n", item.source.display()));
    out.push_str(&format!("date:   {}\n", item.date.to_rfc3339()));
    out.push_str(&format!("draft:  {}\n", item.draft));
    if !item.extra.is_empty() {
        let keys: Vec<&str> = item.extra.keys().map(String::as_str).collect();
        out.push_str(&format!("extra:  {}\n", keys.join(", ")));
    }
    out.push('\n');

    if !outline {
        out.push_str(&item.body);
        return out;
    }

    for block in item.outline() {
        let line = match block {
            Block::Heading { level, text } => format!("{} {}", "#".repeat(level as usize), text),
            Block::Paragraph { text } => format!("paragraph: {}", preview(&text, 60)),
            Block::CodeBlock { lang, code } => format!(
                "code ({}): {} lines",
                lang.as_deref().unwrap_or("plain"),
                code.lines().count()
            ),
            Block::BlockQuote => "quote".to_string(),
            Block::List { ordered, items } => format!(
                "{} list: {} items",
                if ordered { "ordered" } else { "bullet" },
                items
            ),
            Block::Rule => "rule".to_string(),
            Block::Table => "table".to_string(),
            Block::Html => "html".to_string(),
            Block::Other => "other".to_string(),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// First `max` characters of `text`, with an ellipsis when cut
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}
