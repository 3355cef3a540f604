//! ts-translator
//!
//! Qt Linguist `.ts` 翻訳カタログの読み書き、翻訳ルックアップ、検査を行うライブラリ

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod format;
pub mod global;
pub mod indexer;
pub mod input;
pub mod ir;
pub mod plural;
pub mod stats;
mod test_utils;
pub mod translator;
pub mod ts;
pub mod types;

pub use global::{
    InstallError,
    install,
    installed,
    tr,
    tr_args,
    tr_n,
};
pub use translator::{
    Localizer,
    Translator,
};
