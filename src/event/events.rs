use crate::document::PageKey;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    BlockChanged(BlockEvent),
    PageChanged(PageEvent),
    SiteChanged(SiteEvent),
    /// The active selection now points at this page
    SelectionChanged(PageKey),
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },
    DocumentChanged(DocumentEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockEvent {
    Added { page: PageKey, block_id: String },
    Removed { page: PageKey, block_id: String },
    Updated { page: PageKey, block_id: String },
    Reordered {
        page: PageKey,
        old_index: usize,
        new_index: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Added { page: PageKey },
    Removed { page: PageKey },
    Updated { page: PageKey },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SiteEvent {
    Added { site_id: String },
    Removed { site_id: String },
    Updated { site_id: String },
    StylesUpdated { site_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    /// Undo, redo or a load swapped the whole document
    Replaced,
    Saved,
    Loaded,
}
