//! Workspace discovery of translation catalogs.
pub mod types;
pub mod workspace;

pub use types::IndexerError;
pub use workspace::{
    CatalogIndexer,
    default_num_threads,
    localizer_for,
};
