use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id_generator::generate_block_id;

/// Field name → value payload of a block. Its shape depends on the block kind.
pub type BlockContent = Map<String, Value>;

/// The closed set of block kinds offered by the block library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Menu,
    Header,
    Text,
    Features,
    Article,
    Image,
    ImageVideo,
    Gallery,
    People,
    Contact,
    Social,
    Footer,
    Form,
    List,
    Numbers,
    Pricing,
    News,
    Chat,
    Html,
    Extensions,
}

impl BlockKind {
    pub const ALL: [BlockKind; 20] = [
        BlockKind::Menu,
        BlockKind::Header,
        BlockKind::Text,
        BlockKind::Features,
        BlockKind::Article,
        BlockKind::Image,
        BlockKind::ImageVideo,
        BlockKind::Gallery,
        BlockKind::People,
        BlockKind::Contact,
        BlockKind::Social,
        BlockKind::Footer,
        BlockKind::Form,
        BlockKind::List,
        BlockKind::Numbers,
        BlockKind::Pricing,
        BlockKind::News,
        BlockKind::Chat,
        BlockKind::Html,
        BlockKind::Extensions,
    ];

    /// The serialized name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Menu => "menu",
            BlockKind::Header => "header",
            BlockKind::Text => "text",
            BlockKind::Features => "features",
            BlockKind::Article => "article",
            BlockKind::Image => "image",
            BlockKind::ImageVideo => "image-video",
            BlockKind::Gallery => "gallery",
            BlockKind::People => "people",
            BlockKind::Contact => "contact",
            BlockKind::Social => "social",
            BlockKind::Footer => "footer",
            BlockKind::Form => "form",
            BlockKind::List => "list",
            BlockKind::Numbers => "numbers",
            BlockKind::Pricing => "pricing",
            BlockKind::News => "news",
            BlockKind::Chat => "chat",
            BlockKind::Html => "html",
            BlockKind::Extensions => "extensions",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user picks from the block library: a kind plus initial content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTemplate {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub content: BlockContent,
}

impl BlockTemplate {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            content: BlockContent::new(),
        }
    }

    /// Builder-style helper to seed one content field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.insert(key.into(), value.into());
        self
    }
}

/// A single content unit on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub content: BlockContent,
}

impl Block {
    /// Instantiate a template with a freshly generated id
    pub fn from_template(template: BlockTemplate) -> Self {
        Self {
            id: generate_block_id(),
            kind: template.kind,
            content: template.content,
        }
    }

    /// Deep copy of this block under a new id
    pub fn duplicate(&self) -> Self {
        Self {
            id: generate_block_id(),
            kind: self.kind,
            content: self.content.clone(),
        }
    }

    /// Shallow merge: top-level keys of `partial` overwrite existing ones.
    /// Returns true if anything changed.
    pub fn merge_content(&mut self, partial: &BlockContent) -> bool {
        let mut changed = false;
        for (key, value) in partial {
            if self.content.get(key) != Some(value) {
                self.content.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }
}
