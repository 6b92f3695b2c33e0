use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id_generator::generate_site_id;
use crate::page::Page;

/// Shared, copy-on-write handle to a page
pub type PageRef = Arc<Page>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    #[default]
    Unpublished,
    Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub size: f32,
}

impl FontConfig {
    fn inter_tight(size: f32) -> Self {
        Self {
            family: "Inter Tight".to_string(),
            size,
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self::inter_tight(1.4)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteColors {
    pub primary: String,
    pub buttons_and_links: Vec<String>,
}

impl Default for SiteColors {
    fn default() -> Self {
        Self {
            primary: "#4CAF50".to_string(),
            buttons_and_links: ["#FF69B4", "#8B4513", "#8B0000", "#48D1CC", "#FFFFFF"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteFonts {
    pub title1: FontConfig,
    pub title2: FontConfig,
    pub title3: FontConfig,
    pub text: FontConfig,
    pub menu: FontConfig,
}

impl Default for SiteFonts {
    fn default() -> Self {
        Self {
            title1: FontConfig::inter_tight(5.0),
            title2: FontConfig::inter_tight(4.0),
            title3: FontConfig::inter_tight(2.0),
            text: FontConfig::inter_tight(1.4),
            menu: FontConfig::inter_tight(1.4),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteOptions {
    pub rounded_corners: bool,
    pub rounded_buttons: bool,
    pub large_buttons: bool,
    pub underlined_links: bool,
    pub animation_on_scroll: bool,
}

/// Site-wide look: palette, typography, toggles and custom CSS
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteStyles {
    pub colors: SiteColors,
    pub fonts: SiteFonts,
    pub options: SiteOptions,
    #[serde(rename = "customCSS")]
    pub custom_css: String,
}

/// Partial site fields. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteUpdate {
    pub name: Option<String>,
    pub status: Option<SiteStatus>,
}

/// One publishable project: an ordered list of pages plus styles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: SiteStatus,
    pub pages: Vec<PageRef>,
    #[serde(default)]
    pub site_styles: SiteStyles,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Site {
    /// A new unpublished site with one landing page
    pub fn new(name: impl Into<String>, home_page_name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: generate_site_id(),
            name: name.into(),
            status: SiteStatus::Unpublished,
            pages: vec![Arc::new(Page::home(home_page_name))],
            site_styles: SiteStyles::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn page(&self, page_id: &str) -> Option<&PageRef> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn page_index(&self, page_id: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.id == page_id)
    }

    pub fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .map(Arc::make_mut)
    }

    pub fn first_page_id(&self) -> Option<&str> {
        self.pages.first().map(|p| p.id.as_str())
    }

    pub fn apply_update(&mut self, update: &SiteUpdate) -> bool {
        let mut changed = false;
        if let Some(name) = &update.name {
            if *name != self.name {
                self.name = name.clone();
                changed = true;
            }
        }
        if let Some(status) = update.status {
            if status != self.status {
                self.status = status;
                changed = true;
            }
        }
        changed
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
