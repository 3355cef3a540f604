//! Loading catalogs from disk.
pub mod translation;

pub use translation::{
    CatalogFile,
    LoadError,
    detect_language_from_path,
    load_catalog_file,
    read_catalog_file,
};
