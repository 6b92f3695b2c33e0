#![warn(clippy::all, rust_2018_idioms)]

pub mod block;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod id_generator;
pub mod page;
pub mod site;
pub mod state;
pub mod util;

pub use block::{Block, BlockContent, BlockKind, BlockTemplate};
pub use command::{Command, History};
pub use config::{Config, PersistenceConfig, StoreConfig};
pub use document::{Document, PageKey, SiteRef};
pub use error::{StoreError, StoreResult};
pub use event::{EventBus, EventHandler, StoreEvent};
pub use page::{BlockRef, Page, PageUpdate};
pub use site::{PageRef, Site, SiteStatus, SiteStyles, SiteUpdate};
pub use state::{DocumentStore, ProjectFile, ProjectPersistence, StoreHandle};
