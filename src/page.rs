use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockContent};
use crate::id_generator::generate_page_id;

/// Shared, copy-on-write handle to a block
pub type BlockRef = Arc<Block>;

/// One renderable page: an ordered list of blocks plus page settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<BlockRef>,
    #[serde(default = "default_page_url")]
    pub page_url: String,
    #[serde(default)]
    pub page_description: String,
    #[serde(default = "default_true")]
    pub social_sharing_enabled: bool,
    #[serde(default)]
    pub social_sharing_image_url: String,
    #[serde(default)]
    pub head_code: String,
    #[serde(default)]
    pub body_end_code: String,
    #[serde(default)]
    pub before_doctype_code: String,
}

fn default_page_url() -> String {
    "index.html".to_string()
}

fn default_true() -> bool {
    true
}

/// Derive a page file name: lowercase, whitespace runs become `-`, `.html` appended.
/// A blank name falls back to `page.html`.
pub fn slugify(name: &str) -> String {
    let slug = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        return "page.html".to_string();
    }
    format!("{}.html", slug)
}

/// Partial page fields. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageUpdate {
    pub name: Option<String>,
    pub page_url: Option<String>,
    pub page_description: Option<String>,
    pub social_sharing_enabled: Option<bool>,
    pub social_sharing_image_url: Option<String>,
    pub head_code: Option<String>,
    pub body_end_code: Option<String>,
    pub before_doctype_code: Option<String>,
}

impl PageUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

fn assign<T: PartialEq + Clone>(slot: &mut T, value: &Option<T>) -> bool {
    match value {
        Some(v) if slot != v => {
            *slot = v.clone();
            true
        }
        _ => false,
    }
}

impl Page {
    /// A new empty page with a slug derived from its name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: generate_page_id(),
            page_url: slugify(&name),
            name,
            blocks: Vec::new(),
            page_description: String::new(),
            social_sharing_enabled: true,
            social_sharing_image_url: String::new(),
            head_code: String::new(),
            body_end_code: String::new(),
            before_doctype_code: String::new(),
        }
    }

    /// The default landing page of a site, always served as `index.html`
    pub fn home(name: impl Into<String>) -> Self {
        Self {
            page_url: default_page_url(),
            ..Self::new(name)
        }
    }

    pub fn block(&self, block_id: &str) -> Option<&BlockRef> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    pub fn block_index(&self, block_id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == block_id)
    }

    /// Deep copy under a new id; every block gets a fresh id too.
    pub fn duplicate(&self) -> Self {
        let name = format!("{} Copy", self.name);
        Self {
            id: generate_page_id(),
            page_url: slugify(&name),
            name,
            blocks: self
                .blocks
                .iter()
                .map(|b| Arc::new(b.duplicate()))
                .collect(),
            ..self.clone()
        }
    }

    /// Append a block, or insert it at `index` (clamped to the end).
    pub fn insert_block(&mut self, index: Option<usize>, block: BlockRef) {
        match index {
            Some(i) if i < self.blocks.len() => self.blocks.insert(i, block),
            _ => self.blocks.push(block),
        }
    }

    pub fn remove_block(&mut self, block_id: &str) -> Option<BlockRef> {
        let index = self.block_index(block_id)?;
        Some(self.blocks.remove(index))
    }

    /// Shallow-merge content into a block. Only the touched block is copied.
    pub fn update_block(&mut self, block_id: &str, partial: &BlockContent) -> bool {
        let Some(index) = self.block_index(block_id) else {
            return false;
        };
        let block = &mut self.blocks[index];
        let needs_change = partial
            .iter()
            .any(|(key, value)| block.content.get(key) != Some(value));
        if !needs_change {
            return false;
        }
        Arc::make_mut(block).merge_content(partial)
    }

    /// Splice semantics: remove at `from`, insert at `to`.
    /// Callers are responsible for bounds checking.
    pub fn move_block(&mut self, from: usize, to: usize) {
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
    }

    pub fn apply_update(&mut self, update: &PageUpdate) -> bool {
        let mut changed = false;
        changed |= assign(&mut self.name, &update.name);
        changed |= assign(&mut self.page_url, &update.page_url);
        changed |= assign(&mut self.page_description, &update.page_description);
        changed |= assign(&mut self.social_sharing_enabled, &update.social_sharing_enabled);
        changed |= assign(&mut self.social_sharing_image_url, &update.social_sharing_image_url);
        changed |= assign(&mut self.head_code, &update.head_code);
        changed |= assign(&mut self.body_end_code, &update.body_end_code);
        changed |= assign(&mut self.before_doctype_code, &update.before_doctype_code);
        changed
    }

    /// True when no two blocks share an id
    pub fn has_unique_block_ids(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.blocks.iter().all(|b| seen.insert(b.id.as_str()))
    }
}
