use super::CommandResult;
use crate::block::BlockContent;
use crate::document::{Document, PageKey, SiteRef};
use crate::error::StoreError;
use crate::event::{BlockEvent, PageEvent, SiteEvent, StoreEvent};
use crate::page::{BlockRef, PageUpdate};
use crate::site::{PageRef, SiteStyles, SiteUpdate};

/// Document mutations. Every change to a [`Document`] goes through one of these.
///
/// Values that need fresh ids (blocks, pages, sites) are built before the
/// command is created, so executing a command is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Insert a block at `index`, or append when `index` is `None`
    InsertBlock {
        page: PageKey,
        index: Option<usize>,
        block: BlockRef,
    },

    RemoveBlock {
        page: PageKey,
        block_id: String,
    },

    /// Shallow-merge `content` into a block's content
    UpdateBlock {
        page: PageKey,
        block_id: String,
        content: BlockContent,
    },

    /// Move the block at `from` to position `to`
    ReorderBlocks {
        page: PageKey,
        from: usize,
        to: usize,
    },

    InsertPage {
        site_id: String,
        page: PageRef,
    },

    RemovePage {
        site_id: String,
        page_id: String,
    },

    UpdatePage {
        page: PageKey,
        update: PageUpdate,
    },

    InsertSite {
        site: SiteRef,
    },

    RemoveSite {
        site_id: String,
    },

    UpdateSite {
        site_id: String,
        update: SiteUpdate,
    },

    SetSiteStyles {
        site_id: String,
        styles: SiteStyles,
    },

    /// Select a site and its first page
    SwitchSite {
        site_id: String,
    },

    /// Select a page of the active site
    SwitchPage {
        page_id: String,
    },
}

impl Command {
    /// Apply the command to `doc`.
    ///
    /// Returns `Ok(true)` if the document changed, `Ok(false)` for a no-op
    /// (stale ids, unchanged values). On `Err` the document is untouched.
    pub fn execute(&self, doc: &mut Document) -> CommandResult {
        match self {
            Command::InsertBlock { page, index, block } => {
                let target = doc
                    .page_mut(page)
                    .ok_or_else(|| StoreError::NotFound(format!("page {}", page.page_id)))?;
                target.insert_block(*index, block.clone());
                touch_site(doc, &page.site_id);
                Ok(true)
            }

            Command::RemoveBlock { page, block_id } => {
                if doc.page(page).and_then(|p| p.block(block_id)).is_none() {
                    return Ok(false);
                }
                let removed = doc
                    .page_mut(page)
                    .and_then(|p| p.remove_block(block_id))
                    .is_some();
                if removed {
                    touch_site(doc, &page.site_id);
                }
                Ok(removed)
            }

            Command::UpdateBlock {
                page,
                block_id,
                content,
            } => {
                if doc.page(page).and_then(|p| p.block(block_id)).is_none() {
                    return Ok(false);
                }
                let changed = doc
                    .page_mut(page)
                    .is_some_and(|p| p.update_block(block_id, content));
                if changed {
                    touch_site(doc, &page.site_id);
                }
                Ok(changed)
            }

            Command::ReorderBlocks { page, from, to } => {
                let Some(len) = doc.page(page).map(|p| p.blocks.len()) else {
                    return Ok(false);
                };
                if *from >= len || *to >= len {
                    return Err(StoreError::InvalidIndex {
                        from: *from,
                        to: *to,
                        len,
                    });
                }
                if from == to {
                    return Ok(false);
                }
                if let Some(target) = doc.page_mut(page) {
                    target.move_block(*from, *to);
                }
                touch_site(doc, &page.site_id);
                Ok(true)
            }

            Command::InsertPage { site_id, page } => {
                let site = doc
                    .site_mut(site_id)
                    .ok_or_else(|| StoreError::NotFound(format!("site {}", site_id)))?;
                site.pages.push(page.clone());
                site.touch();
                Ok(true)
            }

            Command::RemovePage { site_id, page_id } => {
                let Some(site) = doc.site(site_id) else {
                    return Ok(false);
                };
                if site.page(page_id).is_none() {
                    return Ok(false);
                }
                if site.pages.len() == 1 {
                    return Err(StoreError::LastPage {
                        site_id: site_id.clone(),
                    });
                }

                if let Some(site) = doc.site_mut(site_id) {
                    site.pages.retain(|p| p.id != *page_id);
                    site.touch();
                }
                if doc.active_site_id() == site_id && doc.active_page_id() == page_id {
                    doc.select_site(site_id);
                }
                Ok(true)
            }

            Command::UpdatePage { page, update } => {
                if doc.page(page).is_none() {
                    return Ok(false);
                }
                let changed = doc.page_mut(page).is_some_and(|p| p.apply_update(update));
                if changed {
                    touch_site(doc, &page.site_id);
                }
                Ok(changed)
            }

            Command::InsertSite { site } => {
                doc.push_site(site.clone());
                Ok(true)
            }

            Command::RemoveSite { site_id } => {
                let Some(index) = doc.site_index(site_id) else {
                    return Ok(false);
                };
                if doc.sites().len() == 1 {
                    return Err(StoreError::LastSite);
                }

                doc.remove_site_at(index);
                if doc.active_site_id() == site_id {
                    let first = doc.sites()[0].id.clone();
                    doc.select_site(&first);
                }
                Ok(true)
            }

            Command::UpdateSite { site_id, update } => {
                let Some(site) = doc.site(site_id) else {
                    return Ok(false);
                };
                let differs = update.name.as_ref().is_some_and(|n| *n != site.name)
                    || update.status.is_some_and(|s| s != site.status);
                if !differs {
                    return Ok(false);
                }
                if let Some(site) = doc.site_mut(site_id) {
                    site.apply_update(update);
                    site.touch();
                }
                Ok(true)
            }

            Command::SetSiteStyles { site_id, styles } => {
                match doc.site(site_id) {
                    Some(site) if site.site_styles != *styles => {}
                    _ => return Ok(false),
                }
                if let Some(site) = doc.site_mut(site_id) {
                    site.site_styles = styles.clone();
                    site.touch();
                }
                Ok(true)
            }

            Command::SwitchSite { site_id } => {
                if doc.active_site_id() == site_id {
                    return Ok(false);
                }
                Ok(doc.select_site(site_id))
            }

            Command::SwitchPage { page_id } => {
                if doc.active_page_id() == page_id {
                    return Ok(false);
                }
                Ok(doc.select_page(page_id))
            }
        }
    }

    /// Returns true if the command is recorded in the undo history.
    ///
    /// Every document edit is undoable; navigation is not.
    pub fn can_undo(&self) -> bool {
        match self {
            Command::InsertBlock { .. } => true,
            Command::RemoveBlock { .. } => true,
            Command::UpdateBlock { .. } => true,
            Command::ReorderBlocks { .. } => true,
            Command::InsertPage { .. } => true,
            Command::RemovePage { .. } => true,
            Command::UpdatePage { .. } => true,
            Command::InsertSite { .. } => true,
            Command::RemoveSite { .. } => true,
            Command::UpdateSite { .. } => true,
            Command::SetSiteStyles { .. } => true,
            Command::SwitchSite { .. } => false,
            Command::SwitchPage { .. } => false,
        }
    }

    /// The change notification for a successfully executed edit.
    /// Navigation is reported by the store as a selection change instead.
    pub fn event(&self) -> Option<StoreEvent> {
        let event = match self {
            Command::InsertBlock { page, block, .. } => StoreEvent::BlockChanged(BlockEvent::Added {
                page: page.clone(),
                block_id: block.id.clone(),
            }),
            Command::RemoveBlock { page, block_id } => {
                StoreEvent::BlockChanged(BlockEvent::Removed {
                    page: page.clone(),
                    block_id: block_id.clone(),
                })
            }
            Command::UpdateBlock { page, block_id, .. } => {
                StoreEvent::BlockChanged(BlockEvent::Updated {
                    page: page.clone(),
                    block_id: block_id.clone(),
                })
            }
            Command::ReorderBlocks { page, from, to } => {
                StoreEvent::BlockChanged(BlockEvent::Reordered {
                    page: page.clone(),
                    old_index: *from,
                    new_index: *to,
                })
            }
            Command::InsertPage { site_id, page } => StoreEvent::PageChanged(PageEvent::Added {
                page: PageKey::new(site_id, &page.id),
            }),
            Command::RemovePage { site_id, page_id } => {
                StoreEvent::PageChanged(PageEvent::Removed {
                    page: PageKey::new(site_id, page_id),
                })
            }
            Command::UpdatePage { page, .. } => {
                StoreEvent::PageChanged(PageEvent::Updated { page: page.clone() })
            }
            Command::InsertSite { site } => StoreEvent::SiteChanged(SiteEvent::Added {
                site_id: site.id.clone(),
            }),
            Command::RemoveSite { site_id } => StoreEvent::SiteChanged(SiteEvent::Removed {
                site_id: site_id.clone(),
            }),
            Command::UpdateSite { site_id, .. } => StoreEvent::SiteChanged(SiteEvent::Updated {
                site_id: site_id.clone(),
            }),
            Command::SetSiteStyles { site_id, .. } => {
                StoreEvent::SiteChanged(SiteEvent::StylesUpdated {
                    site_id: site_id.clone(),
                })
            }
            Command::SwitchSite { .. } | Command::SwitchPage { .. } => return None,
        };
        Some(event)
    }
}

fn touch_site(doc: &mut Document, site_id: &str) {
    if let Some(site) = doc.site_mut(site_id) {
        site.touch();
    }
}
