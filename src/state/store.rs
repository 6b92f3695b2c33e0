//! The document store: single source of truth for sites, pages and blocks.
//!
//! Every mutation is expressed as a [`Command`] and funneled through
//! [`DocumentStore::execute`], which
//! 1. applies the command to the live document,
//! 2. records a history snapshot if the command is undoable and changed
//!    something,
//! 3. emits the matching [`StoreEvent`]s.
//!
//! Removals that would invalidate the active selection repair it inside the
//! same command, so no caller can observe a selection pointing at a removed
//! site or page.
//!
//! # Example
//!
//! ```rust
//! use site_builder::{BlockKind, BlockTemplate, DocumentStore};
//!
//! let mut store = DocumentStore::default();
//! let page = store.active_page_key();
//! let block = store.add_block(&page, BlockTemplate::new(BlockKind::Header)).unwrap();
//! assert_eq!(store.page(&page).unwrap().blocks[0].id, block.id);
//!
//! store.undo();
//! assert!(store.page(&page).unwrap().blocks.is_empty());
//! ```
use std::sync::Arc;

use crate::block::{Block, BlockContent, BlockTemplate};
use crate::command::{Command, History};
use crate::config::StoreConfig;
use crate::document::{Document, PageKey, SiteRef};
use crate::error::{StoreError, StoreResult};
use crate::event::{DocumentEvent, EventBus, EventHandler, StoreEvent};
use crate::page::{BlockRef, Page, PageUpdate};
use crate::site::{PageRef, Site, SiteStyles, SiteUpdate};

#[derive(Debug)]
pub struct DocumentStore {
    document: Document,
    history: History,
    event_bus: EventBus,
    config: StoreConfig,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl DocumentStore {
    /// A store holding one site with one empty page, named per `config`
    pub fn new(config: StoreConfig) -> Self {
        let document = Document::new(&config.default_site_name, &config.default_page_name);
        Self::with_document(document, config)
    }

    /// A store starting from an existing document, e.g. a loaded project
    pub fn with_document(document: Document, config: StoreConfig) -> Self {
        Self {
            history: History::new(document.clone(), config.max_history),
            document,
            event_bus: EventBus::new(),
            config,
        }
    }

    // ---- read surface ----

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// A cheap, independent copy of the current document
    pub fn snapshot(&self) -> Document {
        self.document.clone()
    }

    pub fn sites(&self) -> &[SiteRef] {
        self.document.sites()
    }

    pub fn site(&self, site_id: &str) -> Option<&SiteRef> {
        self.document.site(site_id)
    }

    pub fn page(&self, key: &PageKey) -> Option<&PageRef> {
        self.document.page(key)
    }

    pub fn active_site(&self) -> &SiteRef {
        self.document.active_site()
    }

    pub fn active_page(&self) -> &PageRef {
        self.document.active_page()
    }

    pub fn active_page_key(&self) -> PageKey {
        self.document.active_page_key()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.event_bus.subscribe(handler);
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // ---- command execution ----

    /// Execute a command against the live document.
    ///
    /// Returns whether the document changed. A rejected command leaves the
    /// document and history untouched.
    pub fn execute(&mut self, command: Command) -> StoreResult<bool> {
        let selection_before = self.document.active_page_key();

        let changed = match command.execute(&mut self.document) {
            Ok(changed) => changed,
            Err(err) => {
                log::warn!("Rejected {:?}: {}", command, err);
                return Err(err);
            }
        };
        if !changed {
            log::debug!("No-op {:?}", command);
            return Ok(false);
        }
        debug_assert!(self.document.selection_is_valid());
        log::debug!("Executed {:?}", command);

        if let Some(event) = command.event() {
            self.event_bus.emit(event);
        }
        let selection_after = self.document.active_page_key();
        if selection_after != selection_before {
            self.event_bus.emit(StoreEvent::SelectionChanged(selection_after));
        }

        if command.can_undo() {
            self.history.record(self.document.clone());
            self.emit_history_changed();
        } else {
            // Navigation is not a history entry; carry the selection into
            // the snapshot under the cursor.
            self.history.replace_current(self.document.clone());
        }
        Ok(true)
    }

    fn emit_history_changed(&self) {
        self.event_bus.emit(StoreEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    // ---- blocks ----

    /// Append a new block built from `template` to the page.
    pub fn add_block(&mut self, page: &PageKey, template: BlockTemplate) -> StoreResult<BlockRef> {
        let block: BlockRef = Arc::new(Block::from_template(template));
        self.execute(Command::InsertBlock {
            page: page.clone(),
            index: None,
            block: block.clone(),
        })?;
        Ok(block)
    }

    /// Remove a block. Unknown ids are ignored.
    pub fn remove_block(&mut self, page: &PageKey, block_id: &str) -> StoreResult<()> {
        self.execute(Command::RemoveBlock {
            page: page.clone(),
            block_id: block_id.to_string(),
        })?;
        Ok(())
    }

    /// Shallow-merge `content` into a block's content. Unknown ids are ignored.
    pub fn update_block(
        &mut self,
        page: &PageKey,
        block_id: &str,
        content: BlockContent,
    ) -> StoreResult<()> {
        self.execute(Command::UpdateBlock {
            page: page.clone(),
            block_id: block_id.to_string(),
            content,
        })?;
        Ok(())
    }

    /// Move the block at `from` to `to`.
    ///
    /// # Errors
    ///
    /// `StoreError::InvalidIndex` if either index is outside the page's
    /// block list.
    pub fn reorder_blocks(&mut self, page: &PageKey, from: usize, to: usize) -> StoreResult<()> {
        self.execute(Command::ReorderBlocks {
            page: page.clone(),
            from,
            to,
        })?;
        Ok(())
    }

    /// Clone a block under a new id, directly after the original.
    pub fn duplicate_block(&mut self, page: &PageKey, block_id: &str) -> StoreResult<BlockRef> {
        let (index, source) = self
            .document
            .page(page)
            .and_then(|p| Some((p.block_index(block_id)?, p.block(block_id)?.clone())))
            .ok_or_else(|| StoreError::NotFound(format!("block {}", block_id)))?;

        let copy: BlockRef = Arc::new(source.duplicate());
        self.execute(Command::InsertBlock {
            page: page.clone(),
            index: Some(index + 1),
            block: copy.clone(),
        })?;
        Ok(copy)
    }

    // ---- pages ----

    /// Append an empty page to a site.
    pub fn add_page(&mut self, site_id: &str, name: &str) -> StoreResult<PageRef> {
        let page: PageRef = Arc::new(Page::new(name));
        self.execute(Command::InsertPage {
            site_id: site_id.to_string(),
            page: page.clone(),
        })?;
        log::info!("Added page {:?} ({}) to site {}", page.name, page.page_url, site_id);
        Ok(page)
    }

    /// Remove a page. If it was active, the site's first remaining page
    /// becomes active.
    ///
    /// # Errors
    ///
    /// `StoreError::LastPage` if it is the site's only page.
    pub fn remove_page(&mut self, site_id: &str, page_id: &str) -> StoreResult<()> {
        if self.execute(Command::RemovePage {
            site_id: site_id.to_string(),
            page_id: page_id.to_string(),
        })? {
            log::info!("Removed page {} from site {}", page_id, site_id);
        }
        Ok(())
    }

    /// Deep-clone a page (fresh page and block ids) and append it.
    pub fn duplicate_page(&mut self, site_id: &str, page_id: &str) -> StoreResult<PageRef> {
        let source = self
            .document
            .site(site_id)
            .and_then(|s| s.page(page_id))
            .ok_or_else(|| StoreError::NotFound(format!("page {}", page_id)))?;

        let copy: PageRef = Arc::new(source.duplicate());
        self.execute(Command::InsertPage {
            site_id: site_id.to_string(),
            page: copy.clone(),
        })?;
        log::info!("Duplicated page {} as {:?}", page_id, copy.name);
        Ok(copy)
    }

    /// Merge the given page fields. Unknown ids are ignored.
    pub fn update_page(&mut self, site_id: &str, page_id: &str, update: PageUpdate) -> StoreResult<()> {
        self.execute(Command::UpdatePage {
            page: PageKey::new(site_id, page_id),
            update,
        })?;
        Ok(())
    }

    // ---- sites ----

    /// Create an unpublished site with one landing page. The active
    /// selection does not move.
    pub fn add_site(&mut self, name: &str) -> StoreResult<SiteRef> {
        let site: SiteRef = Arc::new(Site::new(name, &self.config.default_page_name));
        self.execute(Command::InsertSite { site: site.clone() })?;
        log::info!("Added site {:?} ({})", site.name, site.id);
        Ok(site)
    }

    /// Remove a site. If it was active, the first remaining site and its
    /// first page become active.
    ///
    /// # Errors
    ///
    /// `StoreError::LastSite` if it is the only site.
    pub fn remove_site(&mut self, site_id: &str) -> StoreResult<()> {
        if self.execute(Command::RemoveSite {
            site_id: site_id.to_string(),
        })? {
            log::info!("Removed site {}", site_id);
        }
        Ok(())
    }

    /// Rename a site or change its publish status. Unknown ids are ignored.
    pub fn update_site(&mut self, site_id: &str, update: SiteUpdate) -> StoreResult<()> {
        self.execute(Command::UpdateSite {
            site_id: site_id.to_string(),
            update,
        })?;
        Ok(())
    }

    /// Replace a site's style settings. Unknown ids are ignored.
    pub fn update_site_styles(&mut self, site_id: &str, styles: SiteStyles) -> StoreResult<()> {
        self.execute(Command::SetSiteStyles {
            site_id: site_id.to_string(),
            styles,
        })?;
        Ok(())
    }

    // ---- navigation ----

    /// Make a site active, together with its first page.
    /// Returns false if the site does not exist or is already active.
    pub fn switch_site(&mut self, site_id: &str) -> bool {
        let switched = self
            .execute(Command::SwitchSite {
                site_id: site_id.to_string(),
            })
            .unwrap_or(false);
        if !switched && self.document.site(site_id).is_none() {
            log::warn!("Cannot switch to unknown site {}", site_id);
        }
        switched
    }

    /// Make a page of the active site active.
    /// Returns false if it is not a page of the active site or already active.
    pub fn switch_page(&mut self, page_id: &str) -> bool {
        let switched = self
            .execute(Command::SwitchPage {
                page_id: page_id.to_string(),
            })
            .unwrap_or(false);
        if !switched && self.document.active_site().page(page_id).is_none() {
            log::warn!("Page {} is not part of the active site", page_id);
        }
        switched
    }

    // ---- history ----

    /// Restore the previous snapshot. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        let selection_before = self.document.active_page_key();
        self.document = snapshot.clone();
        log::debug!("Undo to history index {}", self.history.index());
        self.emit_replaced(selection_before);
        true
    }

    /// Re-apply the next snapshot. Returns false when there is none.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        let selection_before = self.document.active_page_key();
        self.document = snapshot.clone();
        log::debug!("Redo to history index {}", self.history.index());
        self.emit_replaced(selection_before);
        true
    }

    /// Install a whole document (e.g. a loaded project) and reset history to it.
    pub fn replace_document(&mut self, document: Document) {
        log::info!(
            "Replacing document: {} sites, {} pages",
            document.sites().len(),
            document.total_pages()
        );
        let selection_before = self.document.active_page_key();
        self.history.reset(document.clone());
        self.document = document;
        self.emit_replaced(selection_before);
    }

    fn emit_replaced(&self, selection_before: PageKey) {
        self.event_bus.emit(StoreEvent::DocumentChanged(DocumentEvent::Replaced));
        let selection_after = self.document.active_page_key();
        if selection_after != selection_before {
            self.event_bus.emit(StoreEvent::SelectionChanged(selection_after));
        }
        self.emit_history_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use parking_lot::Mutex;

    #[test]
    fn no_op_does_not_record_history() {
        let mut store = DocumentStore::default();
        let page = store.active_page_key();
        store.remove_block(&page, "missing").unwrap();
        store.update_page(&page.site_id, "missing", PageUpdate::name("x")).unwrap();
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn navigation_is_not_undoable() {
        let mut store = DocumentStore::default();
        let site_id = store.active_site().id.clone();
        let about = store.add_page(&site_id, "About").unwrap();
        let len = store.history_len();

        assert!(store.switch_page(&about.id));
        assert_eq!(store.history_len(), len);
        assert!(!store.switch_page(&about.id));
        assert!(!store.switch_page("missing"));
    }

    #[test]
    fn events_follow_commands() {
        let store_events = Arc::new(Mutex::new(Vec::<StoreEvent>::new()));
        let sink = store_events.clone();

        let mut store = DocumentStore::default();
        store.subscribe(Box::new(move |event: &StoreEvent| sink.lock().push(event.clone())));

        let page = store.active_page_key();
        let block = store.add_block(&page, BlockTemplate::new(BlockKind::Menu)).unwrap();

        let events = store_events.lock();
        assert_eq!(
            events[0],
            StoreEvent::BlockChanged(crate::event::BlockEvent::Added {
                page: page.clone(),
                block_id: block.id.clone(),
            })
        );
        assert_eq!(
            events[1],
            StoreEvent::HistoryChanged {
                can_undo: true,
                can_redo: false,
            }
        );
    }
}
