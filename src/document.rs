use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::page::Page;
use crate::site::{PageRef, Site};

/// Shared, copy-on-write handle to a site
pub type SiteRef = Arc<Site>;

/// Addresses a page: the site that owns it and the page id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageKey {
    pub site_id: String,
    pub page_id: String,
}

impl PageKey {
    pub fn new(site_id: impl Into<String>, page_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            page_id: page_id.into(),
        }
    }
}

/// All sites plus the active selection.
///
/// Cloning a document is cheap: sites, pages and blocks sit behind `Arc`
/// and are copied only when a mutation reaches them (`Arc::make_mut`), so
/// history snapshots share every untouched node.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    sites: Vec<SiteRef>,
    active_site_id: String,
    active_page_id: String,
}

impl Document {
    /// A document holding one site with one empty page
    pub fn new(site_name: &str, page_name: &str) -> Self {
        Self::from_site(Site::new(site_name, page_name))
    }

    fn from_site(site: Site) -> Self {
        let active_site_id = site.id.clone();
        let active_page_id = site.first_page_id().unwrap_or_default().to_string();
        Self {
            sites: vec![Arc::new(site)],
            active_site_id,
            active_page_id,
        }
    }

    /// Assemble a document from loaded sites.
    ///
    /// Returns `None` when there is no site or a site has no page. A
    /// selection that does not resolve falls back to the first site and its
    /// first page.
    pub fn from_parts(
        sites: Vec<SiteRef>,
        active_site_id: Option<&str>,
        active_page_id: Option<&str>,
    ) -> Option<Self> {
        if sites.is_empty() || sites.iter().any(|s| s.pages.is_empty()) {
            return None;
        }
        let site = active_site_id
            .and_then(|id| sites.iter().find(|s| s.id == id))
            .unwrap_or(&sites[0]);
        let page_id = match active_page_id.and_then(|id| site.page(id)) {
            Some(page) => page.id.clone(),
            None => site.first_page_id()?.to_string(),
        };
        Some(Self {
            active_site_id: site.id.clone(),
            active_page_id: page_id,
            sites,
        })
    }

    pub fn sites(&self) -> &[SiteRef] {
        &self.sites
    }

    pub fn active_site_id(&self) -> &str {
        &self.active_site_id
    }

    pub fn active_page_id(&self) -> &str {
        &self.active_page_id
    }

    pub fn active_page_key(&self) -> PageKey {
        PageKey::new(&self.active_site_id, &self.active_page_id)
    }

    pub fn active_site(&self) -> &SiteRef {
        self.site(&self.active_site_id).unwrap_or(&self.sites[0])
    }

    pub fn active_page(&self) -> &PageRef {
        let site = self.active_site();
        site.page(&self.active_page_id).unwrap_or(&site.pages[0])
    }

    pub fn site(&self, site_id: &str) -> Option<&SiteRef> {
        self.sites.iter().find(|s| s.id == site_id)
    }

    pub fn site_index(&self, site_id: &str) -> Option<usize> {
        self.sites.iter().position(|s| s.id == site_id)
    }

    pub fn page(&self, key: &PageKey) -> Option<&PageRef> {
        self.site(&key.site_id)?.page(&key.page_id)
    }

    /// Mutable access to a site, copying it out of any shared snapshot
    pub fn site_mut(&mut self, site_id: &str) -> Option<&mut Site> {
        self.sites
            .iter_mut()
            .find(|s| s.id == site_id)
            .map(Arc::make_mut)
    }

    /// Mutable access to a page; copies only the site and page on the path
    pub fn page_mut(&mut self, key: &PageKey) -> Option<&mut Page> {
        // Check first so a miss does not detach the site from shared snapshots.
        self.page(key)?;
        self.site_mut(&key.site_id)?.page_mut(&key.page_id)
    }

    pub fn total_pages(&self) -> usize {
        self.sites.iter().map(|s| s.pages.len()).sum()
    }

    pub(crate) fn push_site(&mut self, site: SiteRef) {
        self.sites.push(site);
    }

    pub(crate) fn remove_site_at(&mut self, index: usize) -> SiteRef {
        self.sites.remove(index)
    }

    /// Point the selection at a site and its first page
    pub(crate) fn select_site(&mut self, site_id: &str) -> bool {
        let Some(page_id) = self
            .site(site_id)
            .and_then(|s| s.first_page_id())
            .map(str::to_string)
        else {
            return false;
        };
        self.active_page_id = page_id;
        self.active_site_id = site_id.to_string();
        true
    }

    /// Point the selection at a page of the active site
    pub(crate) fn select_page(&mut self, page_id: &str) -> bool {
        if self.active_site().page(page_id).is_none() {
            return false;
        }
        self.active_page_id = page_id.to_string();
        true
    }

    /// True when the selection resolves to an existing site and one of its pages
    pub fn selection_is_valid(&self) -> bool {
        self.site(&self.active_site_id)
            .is_some_and(|s| s.page(&self.active_page_id).is_some())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("My Site", "Home")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_selects_home() {
        let doc = Document::default();
        assert_eq!(doc.sites().len(), 1);
        assert_eq!(doc.active_site().name, "My Site");
        assert_eq!(doc.active_page().name, "Home");
        assert!(doc.selection_is_valid());
    }

    #[test]
    fn page_mut_copies_on_write() {
        let mut doc = Document::default();
        let snapshot = doc.clone();
        let key = doc.active_page_key();

        doc.page_mut(&key).unwrap().name = "Start".into();

        assert_eq!(doc.active_page().name, "Start");
        assert_eq!(snapshot.active_page().name, "Home");
    }

    #[test]
    fn untouched_sites_stay_shared() {
        let mut doc = Document::default();
        doc.push_site(Arc::new(Site::new("Second", "Home")));
        let snapshot = doc.clone();
        let first_id = doc.sites()[0].id.clone();

        doc.site_mut(&first_id).unwrap().name = "Renamed".into();

        assert!(!Arc::ptr_eq(&doc.sites()[0], &snapshot.sites()[0]));
        assert!(Arc::ptr_eq(&doc.sites()[1], &snapshot.sites()[1]));
    }

    #[test]
    fn from_parts_repairs_stale_selection() {
        let site = Arc::new(Site::new("A", "Home"));
        let doc = Document::from_parts(vec![site.clone()], Some("gone"), Some("gone")).unwrap();
        assert_eq!(doc.active_site_id(), site.id);
        assert_eq!(doc.active_page_id(), site.pages[0].id);
        assert!(Document::from_parts(Vec::new(), None, None).is_none());
    }
}
