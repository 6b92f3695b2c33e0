mod handle;
mod persistence;
mod store;

pub use handle::StoreHandle;
pub use persistence::{
    export_file_name,
    PersistenceError,
    PersistenceResult,
    ProjectFile,
    ProjectMetadata,
    ProjectPersistence,
    PROJECT_FORMAT_VERSION,
};
pub use store::DocumentStore;
