use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::DocumentStore;
use crate::config::PersistenceConfig;
use crate::document::{Document, SiteRef};
use crate::event::{DocumentEvent, StoreEvent};
use crate::util::time;

/// Version tag written into every project file
pub const PROJECT_FORMAT_VERSION: &str = "1.0";

const APP_NAME: &str = "Mobirise Builder Clone";
const AUTOSAVE_PREFIX: &str = "autosave_";

/// Errors that can occur during project persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Invalid project JSON: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write project: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read project file: {0}")]
    ReadError(String),

    #[error("Invalid project data: {0}")]
    InvalidState(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub app_name: String,
    pub total_sites: usize,
    pub total_pages: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_site_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_page_id: Option<String>,
}

/// The whole-project save format:
/// `{ version, exportDate, sites, metadata }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub sites: Vec<SiteRef>,
    pub metadata: ProjectMetadata,
}

impl ProjectFile {
    /// Capture a document, including its active selection
    pub fn from_document(doc: &Document) -> Self {
        Self {
            version: PROJECT_FORMAT_VERSION.to_string(),
            export_date: Utc::now(),
            sites: doc.sites().to_vec(),
            metadata: ProjectMetadata {
                app_name: APP_NAME.to_string(),
                total_sites: doc.sites().len(),
                total_pages: doc.total_pages(),
                active_site_id: Some(doc.active_site_id().to_string()),
                active_page_id: Some(doc.active_page_id().to_string()),
            },
        }
    }

    /// Validate and turn the file back into a document.
    ///
    /// A missing or stale active selection falls back to the first site and
    /// its first page.
    pub fn into_document(self) -> PersistenceResult<Document> {
        if self.version != PROJECT_FORMAT_VERSION {
            log::warn!(
                "Project version {} differs from current version {}",
                self.version,
                PROJECT_FORMAT_VERSION
            );
        }
        validate_sites(&self.sites)?;

        Document::from_parts(
            self.sites,
            self.metadata.active_site_id.as_deref(),
            self.metadata.active_page_id.as_deref(),
        )
        .ok_or_else(|| PersistenceError::InvalidState("project has no usable site".to_string()))
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn validate_sites(sites: &[SiteRef]) -> PersistenceResult<()> {
    if sites.is_empty() {
        return Err(PersistenceError::InvalidState("project has no sites".to_string()));
    }

    let mut site_ids = HashSet::new();
    for site in sites {
        if !site_ids.insert(site.id.as_str()) {
            return Err(PersistenceError::InvalidState(format!(
                "duplicate site id {}",
                site.id
            )));
        }
        if site.pages.is_empty() {
            return Err(PersistenceError::InvalidState(format!(
                "site {} has no pages",
                site.id
            )));
        }

        let mut page_ids = HashSet::new();
        for page in &site.pages {
            if !page_ids.insert(page.id.as_str()) {
                return Err(PersistenceError::InvalidState(format!(
                    "duplicate page id {} in site {}",
                    page.id, site.id
                )));
            }
            if !page.has_unique_block_ids() {
                return Err(PersistenceError::InvalidState(format!(
                    "duplicate block id in page {}",
                    page.id
                )));
            }
        }
    }
    Ok(())
}

/// Download name used by the export dialog: `proiect.<site name>.mbp`
/// with whitespace runs replaced by `_`.
pub fn export_file_name(site_name: &str) -> String {
    format!("proiect.{}.mbp", site_name.split_whitespace().collect::<Vec<_>>().join("_"))
}

/// Manages project files and autosaves in one directory
#[derive(Debug, Clone)]
pub struct ProjectPersistence {
    /// Directory where project files are stored
    state_dir: PathBuf,
    /// Maximum number of auto-save files to keep
    max_autosaves: usize,
    /// Interval between auto-saves in seconds
    autosave_interval: u64,
    /// Last auto-save timestamp
    last_autosave: u64,
}

impl ProjectPersistence {
    pub fn new(config: &PersistenceConfig) -> Self {
        Self {
            state_dir: PathBuf::from(&config.state_dir),
            max_autosaves: config.max_autosaves,
            autosave_interval: config.autosave_interval_secs,
            last_autosave: 0,
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn project_path(&self, name: &str) -> PathBuf {
        self.state_dir.join(format!("{}.json", name))
    }

    /// Save the store's current document as `<name>.json`
    pub fn save_project(&self, store: &DocumentStore, name: &str) -> PersistenceResult<PathBuf> {
        let project = ProjectFile::from_document(store.document());
        let path = self.project_path(name);

        // Create state directory if it doesn't exist
        fs::create_dir_all(&self.state_dir)?;
        fs::write(&path, project.to_json()?)?;

        log::info!(
            "Saved project {} ({} sites, {} pages)",
            path.display(),
            project.metadata.total_sites,
            project.metadata.total_pages
        );
        store
            .event_bus()
            .emit(StoreEvent::DocumentChanged(DocumentEvent::Saved));
        Ok(path)
    }

    /// Load and validate `<name>.json`
    pub fn load_project(&self, name: &str) -> PersistenceResult<Document> {
        let path = self.project_path(name);
        let json = fs::read_to_string(&path)
            .map_err(|e| PersistenceError::ReadError(format!("{}: {}", path.display(), e)))?;

        let document = ProjectFile::from_json(&json)?.into_document()?;
        log::info!("Loaded project {}", path.display());
        Ok(document)
    }

    /// Load `<name>.json` into a store, replacing its document and history
    pub fn load_into(&self, store: &mut DocumentStore, name: &str) -> PersistenceResult<()> {
        let document = self.load_project(name)?;
        store.replace_document(document);
        store
            .event_bus()
            .emit(StoreEvent::DocumentChanged(DocumentEvent::Loaded));
        Ok(())
    }

    /// Check if we should auto-save based on the interval
    pub fn should_autosave(&self) -> bool {
        let now = time::timestamp_secs();
        now.saturating_sub(self.last_autosave) >= self.autosave_interval
    }

    /// Perform auto-save if needed. Returns the written file, if any.
    pub fn try_autosave(&mut self, store: &DocumentStore) -> PersistenceResult<Option<PathBuf>> {
        if !self.should_autosave() {
            return Ok(None);
        }
        let now = time::timestamp_millis();

        // Save with timestamp
        let path = self.save_project(store, &format!("{}{}", AUTOSAVE_PREFIX, now))?;
        self.last_autosave = now / 1000;

        // Cleanup old autosaves
        self.cleanup_old_autosaves()?;
        Ok(Some(path))
    }

    fn autosave_entries(&self) -> PersistenceResult<Vec<(String, PathBuf)>> {
        let mut autosaves: Vec<(String, PathBuf)> = fs::read_dir(&self.state_dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                name.starts_with(AUTOSAVE_PREFIX)
                    .then(|| (name, entry.path()))
            })
            .collect();

        // Oldest first; the name carries the millisecond timestamp
        autosaves.sort_by_key(|(name, _)| autosave_stamp(name));
        Ok(autosaves)
    }

    /// Clean up old auto-save files
    fn cleanup_old_autosaves(&self) -> PersistenceResult<()> {
        let autosaves = self.autosave_entries()?;
        let excess = autosaves.len().saturating_sub(self.max_autosaves);
        for (name, path) in autosaves.into_iter().take(excess) {
            log::debug!("Removing old autosave {}", name);
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Name (without `.json`) of the most recent auto-save, if any
    pub fn find_latest_autosave(&self) -> PersistenceResult<Option<String>> {
        if !self.state_dir.exists() {
            return Ok(None);
        }
        Ok(self
            .autosave_entries()?
            .pop()
            .map(|(name, _)| name.trim_end_matches(".json").to_string()))
    }
}

fn autosave_stamp(file_name: &str) -> u64 {
    file_name
        .trim_start_matches(AUTOSAVE_PREFIX)
        .trim_end_matches(".json")
        .parse()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_name_replaces_whitespace() {
        assert_eq!(export_file_name("My  Cool Site"), "proiect.My_Cool_Site.mbp");
    }

    #[test]
    fn metadata_counts_pages() {
        let mut store = DocumentStore::default();
        let site_id = store.active_site().id.clone();
        store.add_page(&site_id, "About").unwrap();
        store.add_site("Second").unwrap();

        let project = ProjectFile::from_document(store.document());
        assert_eq!(project.version, "1.0");
        assert_eq!(project.metadata.total_sites, 2);
        assert_eq!(project.metadata.total_pages, 3);
    }

    #[test]
    fn autosave_stamp_parses_names() {
        assert_eq!(autosave_stamp("autosave_1700000000123.json"), 1700000000123);
        assert_eq!(autosave_stamp("autosave_garbage.json"), 0);
    }
}
