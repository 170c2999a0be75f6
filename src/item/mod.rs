//! Items
//!
//! The per-user tree of folders, notes, links and uploaded files. Containment
//! is expressed through parent references; the root is the absence of a
//! parent. Kind and content travel together as one tagged value so a folder
//! can never carry a payload and a note, link or file always does.

pub mod payload;
pub mod repository;
pub mod tree;
pub mod validation;

use crate::types::{ItemId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use repository::ItemRepository;
pub use validation::{validate_file_size, validate_name};

/// Kind of an item, as stored in the `type` field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    Note,
    Link,
    File,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Folder => "folder",
            ItemKind::Note => "note",
            ItemKind::Link => "link",
            ItemKind::File => "file",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "folder" => Ok(ItemKind::Folder),
            "note" => Ok(ItemKind::Note),
            "link" => Ok(ItemKind::Link),
            "file" => Ok(ItemKind::File),
            other => Err(format!(
                "Invalid item kind: {} (must be folder, note, link or file)",
                other
            )),
        }
    }
}

/// Kind-specific payload of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemContent {
    Folder,
    /// Free text, usually Markdown
    Note { text: String },
    /// Target URL, opened externally
    Link { url: String },
    /// Base64 data URL of the uploaded file
    File { data: String },
}

impl ItemContent {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemContent::Folder => ItemKind::Folder,
            ItemContent::Note { .. } => ItemKind::Note,
            ItemContent::Link { .. } => ItemKind::Link,
            ItemContent::File { .. } => ItemKind::File,
        }
    }

    /// Raw payload string; `None` for folders.
    pub fn payload(&self) -> Option<&str> {
        match self {
            ItemContent::Folder => None,
            ItemContent::Note { text } => Some(text.as_str()),
            ItemContent::Link { url } => Some(url.as_str()),
            ItemContent::File { data } => Some(data.as_str()),
        }
    }

    /// Rebuild content from a kind tag and an optional payload.
    ///
    /// Folders drop any payload; other kinds default a missing payload to "".
    pub fn from_parts(kind: ItemKind, payload: Option<String>) -> Self {
        let payload = payload.unwrap_or_default();
        match kind {
            ItemKind::Folder => ItemContent::Folder,
            ItemKind::Note => ItemContent::Note { text: payload },
            ItemKind::Link => ItemContent::Link { url: payload },
            ItemKind::File => ItemContent::File { data: payload },
        }
    }
}

/// A node of the per-user tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    pub id: ItemId,
    /// Containing folder, `None` for root
    pub parent_id: Option<ItemId>,
    pub name: String,
    pub content: ItemContent,
    pub created_at: Timestamp,
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        self.content.kind()
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.content, ItemContent::Folder)
    }
}

/// Input to [`ItemRepository::create`]: everything except the generated
/// identifier and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub parent_id: Option<ItemId>,
    pub name: String,
    pub content: ItemContent,
}

impl NewItem {
    pub fn new(name: impl Into<String>, content: ItemContent) -> Self {
        Self {
            parent_id: None,
            name: name.into(),
            content,
        }
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self::new(name, ItemContent::Folder)
    }

    pub fn note(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, ItemContent::Note { text: text.into() })
    }

    pub fn link(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(name, ItemContent::Link { url: url.into() })
    }

    pub fn file(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self::new(name, ItemContent::File { data: data.into() })
    }

    /// Place the item inside `parent_id` (or at root for `None`).
    pub fn under(mut self, parent_id: Option<ItemId>) -> Self {
        self.parent_id = parent_id;
        self
    }
}

/// On-disk record shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: ItemId,
    #[serde(default)]
    parent_id: Option<ItemId>,
    #[serde(rename = "type")]
    kind: ItemKind,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    created_at: Timestamp,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Item {
            id: record.id,
            parent_id: record.parent_id,
            name: record.name,
            content: ItemContent::from_parts(record.kind, record.content),
            created_at: record.created_at,
        }
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        let kind = item.kind();
        let content = item.content.payload().map(str::to_string);
        ItemRecord {
            id: item.id,
            parent_id: item.parent_id,
            kind,
            name: item.name,
            content,
            created_at: item.created_at,
        }
    }
}
