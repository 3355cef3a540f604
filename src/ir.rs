//! Lookup-oriented representation of translation data.

pub mod table;

pub use table::{
    Conflict,
    TableEntry,
    TableOptions,
    TranslationTable,
};
