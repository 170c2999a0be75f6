//! Format listings, trees and item details as text or JSON.

use crate::item::payload::decode_data_url;
use crate::item::{Item, ItemContent, ItemKind};
use crate::types::Timestamp;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Render a timestamp as `YYYY-MM-DD HH:MM` (UTC).
pub fn format_timestamp(ts: Timestamp) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ts)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `/ Work / Reports` style path; `/` for root.
pub fn format_breadcrumb(path: &[Item]) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    let names: Vec<&str> = path.iter().map(|item| item.name.as_str()).collect();
    format!("/ {}", names.join(" / "))
}

fn kind_label(kind: ItemKind) -> String {
    match kind {
        ItemKind::Folder => format!("{}", "folder".blue()),
        ItemKind::Note => format!("{}", "note".yellow()),
        ItemKind::Link => format!("{}", "link".cyan()),
        ItemKind::File => "file".to_string(),
    }
}

/// Table of items with an optional heading line above it.
pub fn format_item_table(heading: &str, items: &[Item], empty_message: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading(heading)));
    if items.is_empty() {
        out.push_str(empty_message);
        out.push('\n');
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["ID", "Kind", "Name", "Created"]);
    for item in items {
        table.add_row(vec![
            item.id.clone(),
            kind_label(item.kind()),
            item.name.clone(),
            format_timestamp(item.created_at),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {} items.\n", items.len()));
    out
}

/// Indented tree from `(depth, item)` pairs.
pub fn format_tree(walked: &[(usize, &Item)]) -> String {
    if walked.is_empty() {
        return "(empty)\n".to_string();
    }
    let mut out = String::new();
    for (depth, item) in walked {
        let marker = if item.is_folder() { "/" } else { "" };
        out.push_str(&format!(
            "{}{}{}  [{}] {}\n",
            "  ".repeat(*depth),
            item.name,
            marker,
            item.kind(),
            item.id
        ));
    }
    out
}

/// JSON view of an item without the file payload.
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub id: String,
    pub parent_id: Option<String>,
    pub kind: ItemKind,
    pub name: String,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<usize>,
}

impl From<&Item> for ItemSummary {
    fn from(item: &Item) -> Self {
        let (content, size_bytes) = match &item.content {
            ItemContent::Folder => (None, None),
            ItemContent::Note { text } => (Some(text.clone()), None),
            ItemContent::Link { url } => (Some(url.clone()), None),
            ItemContent::File { data } => (None, decode_data_url(data).ok().map(|d| d.bytes.len())),
        };
        Self {
            id: item.id.clone(),
            parent_id: item.parent_id.clone(),
            kind: item.kind(),
            name: item.name.clone(),
            created_at: item.created_at,
            content,
            size_bytes,
        }
    }
}

/// One line of `tree` output in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct TreeEntry {
    pub depth: usize,
    #[serde(flatten)]
    pub item: ItemSummary,
}

/// Pretty JSON array of tree entries in walk order.
pub fn tree_to_json(walked: &[(usize, &Item)]) -> Result<String, serde_json::Error> {
    let entries: Vec<TreeEntry> = walked
        .iter()
        .map(|(depth, item)| TreeEntry {
            depth: *depth,
            item: ItemSummary::from(*item),
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

/// Pretty JSON array of item summaries.
pub fn items_to_json(items: &[Item]) -> Result<String, serde_json::Error> {
    let summaries: Vec<ItemSummary> = items.iter().map(ItemSummary::from).collect();
    serde_json::to_string_pretty(&summaries)
}

/// Human-readable detail view of one item.
pub fn format_item_detail(item: &Item, child_count: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading(&item.name)));
    out.push_str(&format!("  Kind: {}\n", item.kind()));
    out.push_str(&format!("  ID: {}\n", item.id));
    out.push_str(&format!("  Created: {}\n\n", format_timestamp(item.created_at)));
    match &item.content {
        ItemContent::Folder => {
            out.push_str(&format!("{} item(s) inside.\n", child_count));
        }
        ItemContent::Note { text } => {
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }
        ItemContent::Link { url } => {
            out.push_str(&format!("{}\n", url));
        }
        ItemContent::File { data } => match decode_data_url(data) {
            Ok(decoded) => out.push_str(&format!(
                "{} bytes ({}). Use `download` to save it.\n",
                decoded.bytes.len(),
                decoded.mime
            )),
            Err(_) => out.push_str("Stored payload is not a valid data URL.\n"),
        },
    }
    out
}
